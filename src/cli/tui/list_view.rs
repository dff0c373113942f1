//! Task list screen: header, tasks in display order, footer or prompt

use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::cli::tui::app::{App, InputMode};
use crate::domain::{Task, TaskId, Urgency};

const HEADER: &str = "Todo List";
const FOOTER_HELP: &str = "[A] Add  [E] Edit  [Space] Toggle  [D] Trash  [C] Clear Done  [Q] Quit";
const EMPTY_HINT: &str = "No todos. Press [A] to add one.";

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0]);
    draw_tasks(frame, app, chunks[1]);
    draw_footer(frame, app, chunks[2]);
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(HEADER)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn task_color(task: &Task) -> Color {
    if task.done {
        return Color::Green;
    }
    match task.priority.urgency() {
        Urgency::High => Color::Red,
        Urgency::Medium => Color::Yellow,
        Urgency::Low => Color::Blue,
    }
}

fn draw_tasks(frame: &mut Frame, app: &App, area: Rect) {
    let tasks = app.tasks();
    if tasks.is_empty() {
        let hint = Paragraph::new(EMPTY_HINT).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let mark = if task.done { "[x]" } else { "[ ]" };
            ListItem::new(format!("{} P{} {}", mark, task.priority, task.title))
                .style(Style::default().fg(task_color(task)))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected().min(tasks.len() - 1)));

    frame.render_stateful_widget(list, area, &mut state);
}

fn prompt<'b>(app: &'b App<'_>) -> Option<(String, &'b str)> {
    let title_of = |id: &TaskId| {
        app.tasks()
            .into_iter()
            .find(|t| &t.id == id)
            .map(|t| (t.title.clone(), t.priority))
    };

    match app.input_mode() {
        InputMode::Normal => None,
        InputMode::AddTitle(buffer) => Some(("New task: ".to_string(), buffer.as_str())),
        InputMode::AddPriority { buffer, .. } => {
            Some(("Priority 1-5 (1=high): ".to_string(), buffer.as_str()))
        }
        InputMode::EditTitle { id, buffer } => {
            let old = title_of(id).map(|(title, _)| title).unwrap_or_default();
            Some((format!("Title [{}]: ", old), buffer.as_str()))
        }
        InputMode::EditPriority { id, buffer } => {
            let old = title_of(id)
                .map(|(_, p)| p.to_string())
                .unwrap_or_default();
            Some((format!("Priority [{}]: ", old), buffer.as_str()))
        }
    }
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    match prompt(app) {
        Some((label, buffer)) => {
            let line = Line::from(vec![
                Span::styled(label.clone(), Style::default().fg(Color::Yellow)),
                Span::raw(buffer.to_string()),
            ]);
            frame.render_widget(Paragraph::new(line), area);

            let offset = (label.chars().count() + buffer.chars().count()) as u16;
            let x = area
                .x
                .saturating_add(offset)
                .min(area.right().saturating_sub(1));
            frame.set_cursor_position(Position::new(x, area.y));
        }
        None => {
            let text = app.status_message().unwrap_or(FOOTER_HELP);
            let footer = Paragraph::new(text).style(Style::default().add_modifier(Modifier::REVERSED));
            frame.render_widget(footer, area);
        }
    }
}
