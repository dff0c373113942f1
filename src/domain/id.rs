//! Task identifiers
//!
//! ID Format:
//! - Generated IDs: 10 lowercase hex chars (e.g., `7f2b4c19d0`)
//! - Seed IDs: readable slugs (e.g., `seed-quickstart`)
//!
//! IDs are opaque once created. Any non-empty string without whitespace
//! is accepted when parsing, so files written by older versions keep
//! their IDs untouched.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of a generated ID
pub const ID_LEN: usize = 10;

/// Length of the short form shown in menus
pub const SHORT_ID_LEN: usize = 6;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Task ID must not be empty")]
    Empty,

    #[error("Task ID must not contain whitespace, got '{0}'")]
    Whitespace(String),
}

/// Generates a hex hash from title, timestamp and a collision salt
fn generate_hash(title: &str, timestamp: DateTime<Utc>, salt: u32) -> String {
    let input = format!(
        "{}{}{}",
        title,
        timestamp.timestamp_nanos_opt().unwrap_or(0),
        salt
    );
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..ID_LEN].to_string()
}

/// Opaque task identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Creates a new ID from title and timestamp
    pub fn new(title: &str, timestamp: DateTime<Utc>) -> Self {
        Self::with_salt(title, timestamp, 0)
    }

    /// Creates a new ID, mixing in a salt to step past collisions
    pub fn with_salt(title: &str, timestamp: DateTime<Utc>, salt: u32) -> Self {
        Self(generate_hash(title, timestamp, salt))
    }

    /// Wraps a fixed slug known to be valid
    pub(crate) fn from_static(slug: &'static str) -> Self {
        Self(slug.to_string())
    }

    /// Returns the full ID
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the short form used in menu entries
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(SHORT_ID_LEN) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        if s.chars().any(char::is_whitespace) {
            return Err(IdError::Whitespace(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}
