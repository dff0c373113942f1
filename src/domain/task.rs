//! Task domain model
//!
//! A task is a titled item with a priority and a done flag. Tasks carry
//! their creation time, which breaks ties between equal priorities.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

use super::id::TaskId;

/// Task priority, 1 = most urgent, 5 = least
///
/// Always within [`Priority::MIN`]..=[`Priority::MAX`]; every constructor
/// clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const DEFAULT: Priority = Priority(3);

    /// Clamps any integer into the valid range
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    /// Interprets free-text input from a prompt
    ///
    /// Anything that isn't a plain run of digits falls back to the default.
    pub fn parse_input(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
            return Self::DEFAULT;
        }
        // Digits only, so the only parse failure left is overflow
        input
            .parse::<i64>()
            .map(Self::clamped)
            .unwrap_or(Priority(Self::MAX))
    }

    /// Returns the numeric value
    pub fn get(self) -> u8 {
        self.0
    }

    /// Returns the urgency band used for coloring
    pub fn urgency(self) -> Urgency {
        match self.0 {
            1 | 2 => Urgency::High,
            3 => Urgency::Medium,
            _ => Urgency::Low,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i64> for Priority {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Self::clamped(value as i64)
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse urgency grouping of priorities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    High,
    Medium,
    Low,
}

/// Parses a stored creation timestamp
///
/// Accepts RFC 3339 and, for files written before offsets were recorded,
/// naive ISO-8601 timestamps which are read as local time.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A single todo item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Human-readable title, trimmed
    pub title: String,

    /// Urgency, 1 = highest
    pub priority: Priority,

    /// Whether the task is completed
    pub done: bool,

    /// When the task was created
    pub created: DateTime<Utc>,
}

impl Task {
    /// Creates a new pending task
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        priority: Priority,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into().trim().to_string(),
            priority,
            done: false,
            created,
        }
    }

    /// Flips the done flag
    pub fn toggle(&mut self) {
        self.done = !self.done;
    }

    /// Replaces the title; empty titles are ignored
    ///
    /// Returns true if the title changed.
    pub fn rename(&mut self, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() || title == self.title {
            return false;
        }
        self.title = title.to_string();
        true
    }

    /// Sets the priority, returning true if it changed
    pub fn set_priority(&mut self, priority: Priority) -> bool {
        if self.priority == priority {
            return false;
        }
        self.priority = priority;
        true
    }
}
