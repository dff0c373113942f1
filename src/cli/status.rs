//! Waybar status payload

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{render_tasks_line, render_tooltip, RotationInterval, State};

/// JSON object read by a waybar `custom` module with `return-type: json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusPayload {
    pub text: String,
    pub tooltip: String,
    pub class: String,
}

impl StatusPayload {
    /// Renders the payload for the given instant
    pub fn build(
        state: &State,
        now: DateTime<Utc>,
        interval: RotationInterval,
        class: &str,
    ) -> Self {
        Self {
            text: render_tasks_line(state, now, interval),
            tooltip: render_tooltip(state),
            class: class.to_string(),
        }
    }
}
