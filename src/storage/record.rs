//! On-disk shape of the state file
//!
//! Reading goes through optional-field records so that files written by
//! older versions, or edited by hand, still load. Defaults are filled in
//! explicitly by [`StateRecord::into_state`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{clamp_cursor, parse_timestamp, Priority, State, Task, TaskId};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("State file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("State file is not a JSON object")]
    NotAnObject,

    #[error("State file has a field of the wrong type: {0}")]
    FieldType(serde_json::Error),
}

/// Persisted task as read from disk; every field may be missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub priority: Option<i64>,
    pub done: Option<bool>,
    pub created: Option<String>,
}

/// Persisted state as read from disk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateRecord {
    pub tasks: Option<Vec<TaskRecord>>,
    pub show_index: Option<usize>,
}

/// Persisted state as written to disk
#[derive(Debug, Serialize)]
pub struct SavedState<'a> {
    pub tasks: Vec<&'a Task>,
    pub show_index: usize,
}

impl<'a> From<&'a State> for SavedState<'a> {
    fn from(state: &'a State) -> Self {
        Self {
            tasks: state.sorted(),
            show_index: state.show_index,
        }
    }
}

impl TaskRecord {
    /// Fills defaults for missing fields
    ///
    /// IDs that are missing or unusable are regenerated; timestamps that
    /// cannot be read fall back to the Unix epoch.
    fn into_task(self, state: &State) -> Task {
        let title = self.title.unwrap_or_default();
        let created = self
            .created
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let priority = self
            .priority
            .map(Priority::clamped)
            .unwrap_or(Priority::DEFAULT);

        let id = match self.id.and_then(|raw| raw.parse::<TaskId>().ok()) {
            Some(id) => id,
            None => {
                let mut salt = 0;
                let mut id = TaskId::new(&title, created);
                while state.tasks.contains_key(&id) {
                    salt += 1;
                    id = TaskId::with_salt(&title, created, salt);
                }
                id
            }
        };

        let mut task = Task::new(id, title, priority, created);
        task.done = self.done.unwrap_or(false);
        task
    }
}

impl StateRecord {
    /// Parses raw file contents
    pub fn parse(bytes: &[u8]) -> Result<Self, RecordError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        if !value.is_object() {
            return Err(RecordError::NotAnObject);
        }
        serde_json::from_value(value).map_err(RecordError::FieldType)
    }

    /// Builds the in-memory state, filling defaults
    ///
    /// The first record wins when IDs repeat.
    pub fn into_state(self) -> State {
        let mut state = State::new();
        for record in self.tasks.unwrap_or_default() {
            let task = record.into_task(&state);
            state.insert(task);
        }
        state.show_index = self.show_index.unwrap_or(0);
        clamp_cursor(&mut state);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default() {
        let state = StateRecord::parse(b"{}").unwrap().into_state();
        assert!(state.is_empty());
        assert_eq!(state.show_index, 0);
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(
            StateRecord::parse(b"[1, 2, 3]"),
            Err(RecordError::NotAnObject)
        ));
        assert!(matches!(
            StateRecord::parse(b"\"tasks\""),
            Err(RecordError::NotAnObject)
        ));
        assert!(matches!(
            StateRecord::parse(b"{not json"),
            Err(RecordError::Json(_))
        ));
    }

    #[test]
    fn wrong_field_types_are_errors() {
        assert!(matches!(
            StateRecord::parse(br#"{"tasks": "none"}"#),
            Err(RecordError::FieldType(_))
        ));
        assert!(matches!(
            StateRecord::parse(br#"{"show_index": -1}"#),
            Err(RecordError::FieldType(_))
        ));
    }

    #[test]
    fn wrong_field_type_is_not_reported_as_bad_json() {
        let json = br#"{"tasks": [{"id": "a", "title": "Keep me", "priority": "4"}]}"#;
        let err = StateRecord::parse(json).unwrap_err();
        assert!(matches!(err, RecordError::FieldType(_)));

        let message = err.to_string();
        assert!(message.contains("wrong type"));
        assert!(!message.contains("not valid JSON"));
    }

    #[test]
    fn task_fields_default() {
        let json = br#"{"tasks": [{"id": "abc", "title": "  Bare  "}]}"#;
        let state = StateRecord::parse(json).unwrap().into_state();
        let task = state.get(&"abc".parse().unwrap()).unwrap();
        assert_eq!(task.title, "Bare");
        assert_eq!(task.priority, Priority::DEFAULT);
        assert!(!task.done);
        assert_eq!(task.created, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn clamps_priority_and_generates_missing_ids() {
        let json = br#"{"tasks": [{"title": "A", "priority": 42}, {"title": "A", "priority": -1}]}"#;
        let state = StateRecord::parse(json).unwrap().into_state();
        assert_eq!(state.len(), 2);
        let priorities: Vec<u8> = state.sorted().iter().map(|t| t.priority.get()).collect();
        assert_eq!(priorities, vec![1, 5]);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let json = br#"{"tasks": [{"id": "dup", "title": "First"}, {"id": "dup", "title": "Second"}]}"#;
        let state = StateRecord::parse(json).unwrap().into_state();
        assert_eq!(state.len(), 1);
        assert_eq!(state.get(&"dup".parse().unwrap()).unwrap().title, "First");
    }

    #[test]
    fn cursor_is_clamped_to_pool() {
        let json = br#"{"tasks": [{"id": "a", "title": "A"}], "show_index": 7}"#;
        let state = StateRecord::parse(json).unwrap().into_state();
        assert_eq!(state.show_index, 0);
    }

    #[test]
    fn reads_legacy_naive_timestamps() {
        let json = br#"{
            "tasks": [
                {"id": "seed-quickstart", "title": "Part 6", "priority": 1, "done": false,
                 "created": "2025-03-01T09:15:42.123456"}
            ],
            "show_index": 0
        }"#;
        let state = StateRecord::parse(json).unwrap().into_state();
        let task = state.get(&"seed-quickstart".parse().unwrap()).unwrap();
        assert_ne!(task.created, DateTime::<Utc>::UNIX_EPOCH);
    }
}
