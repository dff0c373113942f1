//! Terminal editor state and key handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;

use super::event::{Event, EventHandler};
use super::list_view;
use super::ui::Terminal;
use crate::domain::{Priority, State, Task, TaskId};
use crate::storage::StateStore;

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    AddTitle(String),
    AddPriority { title: String, buffer: String },
    EditTitle { id: TaskId, buffer: String },
    EditPriority { id: TaskId, buffer: String },
}

impl InputMode {
    fn buffer_mut(&mut self) -> Option<&mut String> {
        match self {
            InputMode::Normal => None,
            InputMode::AddTitle(buffer)
            | InputMode::AddPriority { buffer, .. }
            | InputMode::EditTitle { buffer, .. }
            | InputMode::EditPriority { buffer, .. } => Some(buffer),
        }
    }
}

/// Application state
pub struct App<'a> {
    /// Tasks being edited
    state: State,

    /// Where every change is written immediately
    store: &'a StateStore,

    /// Selected row in display order
    selected: usize,

    /// Input mode
    input_mode: InputMode,

    /// One-shot message shown in the footer
    status_message: Option<String>,

    /// Whether anything was changed and saved
    changed: bool,

    /// Whether to quit
    should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(state: State, store: &'a StateStore) -> Self {
        Self {
            state,
            store,
            selected: 0,
            input_mode: InputMode::Normal,
            status_message: None,
            changed: false,
            should_quit: false,
        }
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal, events: &EventHandler) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key)?,
                Event::Resize(_, _) | Event::Tick => {}
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        list_view::draw(frame, self);
    }

    /// Tasks in display order
    pub fn tasks(&self) -> Vec<&Task> {
        self.state.sorted()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn input_mode(&self) -> &InputMode {
        &self.input_mode
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn into_state(self) -> State {
        self.state
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.tasks().get(self.selected).map(|t| t.id.clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.state.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn select_id(&mut self, id: &TaskId) {
        if let Some(idx) = self.tasks().iter().position(|t| &t.id == id) {
            self.selected = idx;
        }
    }

    fn persist(&mut self) -> Result<()> {
        self.store.save(&self.state)?;
        self.changed = true;
        Ok(())
    }

    /// Handle key events
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        self.status_message = None;

        if self.input_mode == InputMode::Normal {
            self.handle_normal_key(key)
        } else {
            self.handle_input_key(key)
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }

            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < self.state.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }

            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    self.state.toggle_task(&id);
                    self.persist()?;
                    // Toggling can move the task; keep it under the cursor
                    self.select_id(&id);
                }
            }

            KeyCode::Char('d') | KeyCode::Delete | KeyCode::Backspace => {
                if let Some(id) = self.selected_id() {
                    if self.state.delete_task(&id) {
                        self.persist()?;
                        self.clamp_selection();
                    }
                }
            }

            KeyCode::Char('c') | KeyCode::Char('C') => {
                if !self.state.is_empty() {
                    if self.state.clear_completed() {
                        self.persist()?;
                    } else {
                        self.status_message = Some("No completed tasks".to_string());
                    }
                    self.selected = 0;
                }
            }

            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.input_mode = InputMode::AddTitle(String::new());
            }

            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(id) = self.selected_id() {
                    self.input_mode = InputMode::EditTitle {
                        id,
                        buffer: String::new(),
                    };
                }
            }

            _ => {}
        }
        Ok(())
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                let mode = std::mem::take(&mut self.input_mode);
                self.submit(mode)?;
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.input_mode.buffer_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = self.input_mode.buffer_mut() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Completes one prompt, moving to the next or back to normal mode
    fn submit(&mut self, mode: InputMode) -> Result<()> {
        match mode {
            InputMode::Normal => {}

            InputMode::AddTitle(title) => {
                if !title.trim().is_empty() {
                    self.input_mode = InputMode::AddPriority {
                        title,
                        buffer: String::new(),
                    };
                }
            }

            InputMode::AddPriority { title, buffer } => {
                let priority = Priority::parse_input(&buffer);
                if let Some(id) = self.state.add_task(&title, priority) {
                    self.persist()?;
                    self.select_id(&id);
                }
            }

            InputMode::EditTitle { id, buffer } => {
                if self.state.edit_task(&id, Some(&buffer), None) {
                    self.persist()?;
                }
                self.input_mode = InputMode::EditPriority {
                    id,
                    buffer: String::new(),
                };
            }

            InputMode::EditPriority { id, buffer } => {
                let raw = buffer.trim();
                if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
                    let priority = Priority::parse_input(raw);
                    if self
                        .state
                        .edit_task(&id, None, Some(i64::from(priority.get())))
                    {
                        self.persist()?;
                    }
                }
                self.select_id(&id);
            }
        }
        Ok(())
    }
}
