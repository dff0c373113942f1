//! In-memory todo state and its mutations
//!
//! Every mutation reports whether it changed anything. Callers use that
//! to decide whether to persist and whether to refresh the bar.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::id::TaskId;
use super::ordering::sorted_tasks;
use super::rotation::{current_task, RotationInterval};
use super::task::{Priority, Task};

/// ID of the first seed task
pub const SEED_QUICKSTART_ID: &str = "seed-quickstart";

/// ID of the second seed task
pub const SEED_MANAGE_ID: &str = "seed-manage";

/// The full todo state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    /// All tasks, keyed by ID; order is derived on demand
    pub tasks: HashMap<TaskId, Task>,

    /// Manual cycle cursor into the display pool
    pub show_index: usize,
}

impl State {
    /// Creates an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the first-run state with two seed tasks
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let mut state = Self::new();
        for (id, title, priority) in [
            (SEED_QUICKSTART_ID, "Part 6", 1),
            (SEED_MANAGE_ID, "Right click to edit or add", 3),
        ] {
            state.insert(Task::new(
                TaskId::from_static(id),
                title,
                Priority::clamped(priority),
                now,
            ));
        }
        state
    }

    /// Inserts a task, keeping any existing task with the same ID
    ///
    /// Returns false if the ID was already taken.
    pub fn insert(&mut self, task: Task) -> bool {
        if self.tasks.contains_key(&task.id) {
            return false;
        }
        self.tasks.insert(task.id.clone(), task);
        true
    }

    /// Looks up a task
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Number of tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if there are no tasks
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks in display order
    pub fn sorted(&self) -> Vec<&Task> {
        sorted_tasks(self.tasks.values())
    }

    /// Resolves a full ID or an unambiguous ID prefix
    pub fn resolve_id(&self, query: &str) -> Option<TaskId> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if let Some(id) = self.tasks.keys().find(|id| id.as_str() == query) {
            return Some(id.clone());
        }
        let mut matches = self.tasks.keys().filter(|id| id.as_str().starts_with(query));
        match (matches.next(), matches.next()) {
            (Some(id), None) => Some(id.clone()),
            _ => None,
        }
    }

    /// Adds a task created now
    pub fn add_task(&mut self, title: &str, priority: impl Into<Priority>) -> Option<TaskId> {
        self.add_task_at(title, priority, Utc::now())
    }

    /// Adds a task with an explicit creation time
    ///
    /// Blank titles are rejected. Priority is clamped into range.
    pub fn add_task_at(
        &mut self,
        title: &str,
        priority: impl Into<Priority>,
        now: DateTime<Utc>,
    ) -> Option<TaskId> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        let mut salt = 0;
        let mut id = TaskId::new(title, now);
        while self.tasks.contains_key(&id) {
            salt += 1;
            id = TaskId::with_salt(title, now, salt);
        }

        self.insert(Task::new(id.clone(), title, priority.into(), now));
        Some(id)
    }

    /// Flips the done flag of a task; false if no such task
    pub fn toggle_task(&mut self, id: &TaskId) -> bool {
        match self.tasks.get_mut(id) {
            Some(task) => {
                task.toggle();
                true
            }
            None => false,
        }
    }

    /// Toggles whichever task the status line is showing at `now`
    pub fn toggle_current_display_task(
        &mut self,
        now: DateTime<Utc>,
        interval: RotationInterval,
    ) -> bool {
        let id = match current_task(self, now, interval) {
            Some(task) => task.id.clone(),
            None => return false,
        };
        self.toggle_task(&id)
    }

    /// Removes a task; false if no such task
    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        self.tasks.remove(id).is_some()
    }

    /// Removes every completed task; true if any were removed
    pub fn clear_completed(&mut self) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|_, task| !task.done);
        self.tasks.len() != before
    }

    /// Updates title and/or priority of a task
    ///
    /// Blank titles are ignored. Returns true if any field changed.
    pub fn edit_task(&mut self, id: &TaskId, title: Option<&str>, priority: Option<i64>) -> bool {
        let Some(task) = self.tasks.get_mut(id) else {
            return false;
        };
        let renamed = title.map(|t| task.rename(t)).unwrap_or(false);
        let reprioritized = priority
            .map(|p| task.set_priority(Priority::clamped(p)))
            .unwrap_or(false);
        renamed || reprioritized
    }
}
