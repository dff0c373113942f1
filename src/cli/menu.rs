//! Launcher-driven manage menu
//!
//! The menu lists every task plus a few actions. Input is collected through
//! a [`MenuProvider`]: the first available dmenu-style launcher (wofi, rofi,
//! ...) or, when none is installed, plain line input on the terminal.
//! A launcher that exits non-zero or returns nothing counts as a cancel.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::domain::{menu_entry_id, render_menu_entry, reset_cycle, Priority, State};

/// Prompt shown on the main menu
pub const MENU_PROMPT: &str = "Todo";

/// Prompt for a new task title
pub const TITLE_PROMPT: &str = "New todo";

/// Prompt for a new task priority
pub const PRIORITY_PROMPT: &str = "Priority 1-5 (1=high)";

pub const SEPARATOR: &str = "---";
pub const ADD_ENTRY: &str = "[+] Add task";
pub const CLEAR_ENTRY: &str = "[!] Clear completed";
pub const RESET_ENTRY: &str = "[0] Reset view";

/// Source of menu selections and free-text answers
pub trait MenuProvider {
    /// Short name for diagnostics
    fn name(&self) -> &str;

    /// Lets the user pick one of `options`; `None` means cancelled
    fn choose(&mut self, options: &[String], prompt: &str) -> Result<Option<String>>;

    /// Asks for free text; `None` means cancelled
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// An external dmenu-style launcher
#[derive(Debug, Clone)]
pub struct Launcher {
    program: String,
}

impl Launcher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments that put the launcher in dmenu mode with a prompt
    pub fn args(&self, prompt: &str) -> Vec<String> {
        match self.program.as_str() {
            "wofi" => vec!["--dmenu".into(), "--prompt".into(), prompt.into()],
            "rofi" => vec!["-dmenu".into(), "-p".into(), prompt.into()],
            _ => vec!["-p".into(), prompt.into()],
        }
    }

    fn run(&self, input: &str, prompt: &str) -> Result<Option<String>> {
        let mut child = match Command::new(&self.program)
            .args(self.args(prompt))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to spawn launcher: {}", self.program))
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input.as_bytes()) {
                Ok(()) => {}
                // Launcher quit without reading; its exit status decides
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to write to launcher: {}", self.program))
                }
            }
            // stdin is closed here so the launcher sees EOF
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for launcher: {}", self.program))?;

        if !output.status.success() {
            return Ok(None);
        }

        let answer = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!answer.is_empty()).then_some(answer))
    }
}

impl MenuProvider for Launcher {
    fn name(&self) -> &str {
        &self.program
    }

    fn choose(&mut self, options: &[String], prompt: &str) -> Result<Option<String>> {
        self.run(&options.join("\n"), prompt)
    }

    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        self.run("", prompt)
    }
}

/// Plain line input, used when no launcher is installed
///
/// Options are listed with numbers on the writer; the answer may be the
/// number or the start of an option's text.
pub struct LineInput<R, W> {
    reader: R,
    writer: W,
}

impl LineInput<io::StdinLock<'static>, io::Stderr> {
    /// Reads stdin, writes prompts to stderr
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn read_answer(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.writer, "{}: ", prompt).context("Failed to write prompt")?;
        self.writer.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> MenuProvider for LineInput<R, W> {
    fn name(&self) -> &str {
        "line input"
    }

    fn choose(&mut self, options: &[String], prompt: &str) -> Result<Option<String>> {
        for (i, option) in options.iter().enumerate() {
            writeln!(self.writer, "{:>3}. {}", i + 1, option).context("Failed to write menu")?;
        }

        let Some(answer) = self.read_answer(prompt)? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(None);
        }

        if let Ok(n) = answer.parse::<usize>() {
            return Ok(n.checked_sub(1).and_then(|i| options.get(i)).cloned());
        }
        Ok(options.iter().find(|o| o.starts_with(&answer)).cloned())
    }

    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        self.read_answer(prompt)
    }
}

/// Finds a program on `PATH`
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// First launcher from `candidates` that is installed
pub fn detect_launcher(candidates: &[String]) -> Option<Launcher> {
    candidates
        .iter()
        .find(|name| find_in_path(name).is_some())
        .map(|name| Launcher::new(name.clone()))
}

/// Picks a launcher if one is installed, otherwise line input
pub fn provider(candidates: &[String]) -> Box<dyn MenuProvider> {
    match detect_launcher(candidates) {
        Some(launcher) => Box::new(launcher),
        None => Box::new(LineInput::stdio()),
    }
}

/// What a menu selection asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Add,
    ClearCompleted,
    ResetView,
    Toggle(String),
    Nothing,
}

impl MenuAction {
    pub fn parse(choice: &str) -> Self {
        let choice = choice.trim();
        if choice.starts_with("[+]") {
            MenuAction::Add
        } else if choice.starts_with("[!]") {
            MenuAction::ClearCompleted
        } else if choice.starts_with("[0]") {
            MenuAction::ResetView
        } else if let Some(id) = menu_entry_id(choice) {
            MenuAction::Toggle(id.to_string())
        } else {
            MenuAction::Nothing
        }
    }
}

/// Menu options for the current state
pub fn menu_options(state: &State) -> Vec<String> {
    let mut options: Vec<String> = state.sorted().into_iter().map(render_menu_entry).collect();
    if !options.is_empty() {
        options.push(SEPARATOR.to_string());
    }
    options.extend([ADD_ENTRY, CLEAR_ENTRY, RESET_ENTRY].map(String::from));
    options
}

/// Runs the manage menu once; returns true if the state changed
pub fn manage(state: &mut State, menu: &mut dyn MenuProvider) -> Result<bool> {
    let options = menu_options(state);
    let Some(choice) = menu.choose(&options, MENU_PROMPT)? else {
        return Ok(false);
    };

    match MenuAction::parse(&choice) {
        MenuAction::Add => {
            let Some(title) = menu.prompt(TITLE_PROMPT)? else {
                return Ok(false);
            };
            if title.trim().is_empty() {
                return Ok(false);
            }
            let priority = menu
                .prompt(PRIORITY_PROMPT)?
                .map(|raw| Priority::parse_input(&raw))
                .unwrap_or_default();
            Ok(state.add_task(&title, priority).is_some())
        }
        MenuAction::ClearCompleted => {
            let cleared = state.clear_completed();
            let reset = reset_cycle(state);
            Ok(cleared || reset)
        }
        MenuAction::ResetView => Ok(reset_cycle(state)),
        MenuAction::Toggle(short_id) => {
            let Some(id) = state.resolve_id(&short_id) else {
                return Ok(false);
            };
            let toggled = state.toggle_task(&id);
            if toggled {
                reset_cycle(state);
            }
            Ok(toggled)
        }
        MenuAction::Nothing => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskId, SEED_MANAGE_ID, SEED_QUICKSTART_ID};
    use chrono::{TimeZone, Utc};
    use std::collections::VecDeque;
    use std::io::Cursor;

    /// Replays canned answers and records what was offered
    struct Scripted {
        answers: VecDeque<Option<String>>,
        offered: Vec<String>,
    }

    impl Scripted {
        fn new(answers: &[Option<&str>]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.map(String::from)).collect(),
                offered: Vec::new(),
            }
        }
    }

    impl MenuProvider for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn choose(&mut self, options: &[String], _prompt: &str) -> Result<Option<String>> {
            self.offered = options.to_vec();
            Ok(self.answers.pop_front().flatten())
        }

        fn prompt(&mut self, _prompt: &str) -> Result<Option<String>> {
            Ok(self.answers.pop_front().flatten())
        }
    }

    fn seeded() -> State {
        State::seeded(Utc.timestamp_opt(0, 0).unwrap())
    }

    fn id(s: &str) -> TaskId {
        s.parse().unwrap()
    }

    #[test]
    fn options_list_tasks_then_actions() {
        let options = menu_options(&seeded());
        assert_eq!(
            options,
            vec![
                "[ ] P1 Part 6  #seed-q",
                "[ ] P3 Right click to edit or add  #seed-m",
                SEPARATOR,
                ADD_ENTRY,
                CLEAR_ENTRY,
                RESET_ENTRY,
            ]
        );
    }

    #[test]
    fn options_without_tasks_skip_separator() {
        assert_eq!(menu_options(&State::new()), vec![ADD_ENTRY, CLEAR_ENTRY, RESET_ENTRY]);
    }

    #[test]
    fn parse_actions() {
        assert_eq!(MenuAction::parse(ADD_ENTRY), MenuAction::Add);
        assert_eq!(MenuAction::parse(CLEAR_ENTRY), MenuAction::ClearCompleted);
        assert_eq!(MenuAction::parse(RESET_ENTRY), MenuAction::ResetView);
        assert_eq!(
            MenuAction::parse("[x] P2 Thing  #abc123"),
            MenuAction::Toggle("abc123".to_string())
        );
        assert_eq!(MenuAction::parse(SEPARATOR), MenuAction::Nothing);
    }

    #[test]
    fn cancel_changes_nothing() {
        let mut state = seeded();
        let mut menu = Scripted::new(&[None]);
        assert!(!manage(&mut state, &mut menu).unwrap());
        assert_eq!(state, seeded());
        assert_eq!(menu.offered, menu_options(&seeded()));
    }

    #[test]
    fn toggle_entry_by_short_id_resets_cursor() {
        let mut state = seeded();
        state.show_index = 1;
        let mut menu = Scripted::new(&[Some("[ ] P1 Part 6  #seed-q")]);

        assert!(manage(&mut state, &mut menu).unwrap());
        assert!(state.get(&id(SEED_QUICKSTART_ID)).unwrap().done);
        assert_eq!(state.show_index, 0);
    }

    #[test]
    fn add_with_priority() {
        let mut state = seeded();
        let mut menu = Scripted::new(&[Some(ADD_ENTRY), Some("Call mom"), Some("2")]);

        assert!(manage(&mut state, &mut menu).unwrap());
        let added = state.sorted().into_iter().find(|t| t.title == "Call mom").unwrap();
        assert_eq!(added.priority.get(), 2);
    }

    #[test]
    fn add_with_bad_priority_defaults() {
        let mut state = State::new();
        let mut menu = Scripted::new(&[Some(ADD_ENTRY), Some("Stretch"), Some("soon")]);

        assert!(manage(&mut state, &mut menu).unwrap());
        assert_eq!(state.sorted()[0].priority, Priority::DEFAULT);
    }

    #[test]
    fn add_cancelled_at_title() {
        let mut state = State::new();
        let mut menu = Scripted::new(&[Some(ADD_ENTRY), None]);
        assert!(!manage(&mut state, &mut menu).unwrap());
        assert!(state.is_empty());
    }

    #[test]
    fn clear_completed_from_menu() {
        let mut state = seeded();
        state.show_index = 1;
        state.toggle_task(&id(SEED_MANAGE_ID));
        let mut menu = Scripted::new(&[Some(CLEAR_ENTRY)]);

        assert!(manage(&mut state, &mut menu).unwrap());
        assert_eq!(state.len(), 1);
        assert_eq!(state.show_index, 0);
    }

    #[cfg(unix)]
    #[test]
    fn launcher_failure_exit_is_cancel() {
        let mut launcher = Launcher::new("false");
        assert_eq!(launcher.choose(&menu_options(&seeded()), MENU_PROMPT).unwrap(), None);
        assert_eq!(launcher.prompt(TITLE_PROMPT).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn launcher_empty_output_is_cancel() {
        let mut launcher = Launcher::new("true");
        assert_eq!(launcher.choose(&menu_options(&seeded()), MENU_PROMPT).unwrap(), None);
    }

    #[test]
    fn missing_launcher_is_cancel() {
        let mut launcher = Launcher::new("waybar-todo-no-such-launcher");
        assert_eq!(launcher.choose(&[ADD_ENTRY.to_string()], MENU_PROMPT).unwrap(), None);
        assert_eq!(launcher.prompt(TITLE_PROMPT).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn cancelled_launcher_leaves_state_alone() {
        for program in ["false", "true", "waybar-todo-no-such-launcher"] {
            let mut state = seeded();
            state.show_index = 1;
            let before = state.clone();

            let mut launcher = Launcher::new(program);
            assert!(!manage(&mut state, &mut launcher).unwrap(), "{}", program);
            assert_eq!(state, before, "{}", program);
        }
    }

    #[test]
    fn reset_when_already_reset_is_unchanged() {
        let mut state = seeded();
        let mut menu = Scripted::new(&[Some(RESET_ENTRY)]);
        assert!(!manage(&mut state, &mut menu).unwrap());
    }

    #[test]
    fn line_input_accepts_number_or_prefix() {
        let options = vec!["[+] Add task".to_string(), "[!] Clear completed".to_string()];

        let mut by_number = LineInput::new(Cursor::new("2\n"), Vec::new());
        assert_eq!(
            by_number.choose(&options, "Todo").unwrap(),
            Some("[!] Clear completed".to_string())
        );

        let mut by_prefix = LineInput::new(Cursor::new("[+]\n"), Vec::new());
        assert_eq!(
            by_prefix.choose(&options, "Todo").unwrap(),
            Some("[+] Add task".to_string())
        );

        let mut out_of_range = LineInput::new(Cursor::new("9\n"), Vec::new());
        assert_eq!(out_of_range.choose(&options, "Todo").unwrap(), None);
    }

    #[test]
    fn line_input_eof_is_cancel() {
        let mut input = LineInput::new(Cursor::new(""), Vec::new());
        assert_eq!(input.prompt("New todo").unwrap(), None);
    }

    #[test]
    fn line_input_lists_options() {
        let mut input = LineInput::new(Cursor::new("1\n"), Vec::new());
        input.choose(&["[+] Add task".to_string()], "Todo").unwrap();
        let written = String::from_utf8(input.writer).unwrap();
        assert!(written.contains("  1. [+] Add task"));
        assert!(written.ends_with("Todo: "));
    }

    #[test]
    fn launcher_args() {
        assert_eq!(Launcher::new("wofi").args("Todo"), vec!["--dmenu", "--prompt", "Todo"]);
        assert_eq!(Launcher::new("rofi").args("Todo"), vec!["-dmenu", "-p", "Todo"]);
        assert_eq!(Launcher::new("dmenu").args("Todo"), vec!["-p", "Todo"]);
    }

    #[test]
    fn missing_launcher_is_not_detected() {
        assert!(detect_launcher(&["definitely-not-a-launcher-xyz".to_string()]).is_none());
    }
}
