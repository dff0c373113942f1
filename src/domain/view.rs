//! Text views of the state for the status bar and menus
//!
//! Pure functions: nothing here reads the clock or touches the state.

use chrono::{DateTime, Utc};

use super::rotation::{current_task, RotationInterval};
use super::state::State;
use super::task::Task;

/// Status line text when there is nothing to show
pub const EMPTY_LINE: &str = " No todos";

/// Tooltip body when there are no tasks
pub const EMPTY_TOOLTIP: &str = "No todos yet. Right click to add one.";

/// Usage hint closing every tooltip
pub const TOOLTIP_FOOTER: &str =
    "Left click: cycle | Right click: manage | Middle click: reset view";

/// The rotating single-task status line
pub fn render_tasks_line(state: &State, now: DateTime<Utc>, interval: RotationInterval) -> String {
    match current_task(state, now, interval) {
        Some(task) => format!(" P{} {}", task.priority, task.title),
        None => EMPTY_LINE.to_string(),
    }
}

/// The hover tooltip listing every task
pub fn render_tooltip(state: &State) -> String {
    let sorted = state.sorted();
    let mut lines: Vec<String> = Vec::with_capacity(sorted.len() + 2);

    if sorted.is_empty() {
        lines.push(EMPTY_TOOLTIP.to_string());
    } else {
        for task in sorted {
            let mark = if task.done { "☑" } else { "☐" };
            lines.push(format!("{} P{} {}", mark, task.priority, task.title));
        }
    }

    lines.push(String::new());
    lines.push(TOOLTIP_FOOTER.to_string());
    lines.join("\n")
}

/// A task as a launcher menu entry, ending in its short ID
pub fn render_menu_entry(task: &Task) -> String {
    let mark = if task.done { "[x]" } else { "[ ]" };
    format!("{} P{} {}  #{}", mark, task.priority, task.title, task.id.short())
}

/// Extracts the short ID from a menu entry
pub fn menu_entry_id(entry: &str) -> Option<&str> {
    if !entry.starts_with('[') {
        return None;
    }
    let (_, id) = entry.rsplit_once('#')?;
    let id = id.trim();
    (!id.is_empty()).then_some(id)
}
