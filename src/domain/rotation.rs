//! Display rotation
//!
//! The status line shows one task at a time. Which one is derived purely
//! from the wall clock: every [`RotationInterval`] the index into the
//! display pool advances by one. Separate invocations at the same instant
//! therefore agree on the current task without sharing any cursor.
//!
//! `State::show_index` is a second, manual cursor driven by the `cycle`
//! and `reset` commands. The status line does not read it; it is kept for
//! explicit advance semantics and compatibility with existing state files.

use chrono::{DateTime, Utc};

use super::ordering::{pending_tasks, sorted_tasks};
use super::state::State;
use super::task::Task;

/// Seconds each task stays on the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationInterval(u64);

/// Default rotation step
pub const ROTATION_INTERVAL: RotationInterval = RotationInterval(2);

impl RotationInterval {
    /// Creates an interval, rejecting zero
    pub fn from_secs(secs: u64) -> Option<Self> {
        (secs > 0).then_some(Self(secs))
    }

    /// Returns the interval in seconds
    pub fn secs(self) -> u64 {
        self.0
    }
}

impl Default for RotationInterval {
    fn default() -> Self {
        ROTATION_INTERVAL
    }
}

/// Tasks eligible for display
///
/// Pending tasks in display order, or every task when all are done so the
/// bar never goes blank while tasks exist.
pub fn display_pool(state: &State) -> Vec<&Task> {
    let sorted = sorted_tasks(state.tasks.values());
    let pending = pending_tasks(&sorted);
    if pending.is_empty() {
        sorted
    } else {
        pending
    }
}

/// Index into a pool of `len` tasks selected at `now`
pub fn rotation_index(len: usize, now: DateTime<Utc>, interval: RotationInterval) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let step = now.timestamp().div_euclid(interval.secs() as i64);
    Some(step.rem_euclid(len as i64) as usize)
}

/// The task shown on the status line at `now`
pub fn current_task(state: &State, now: DateTime<Utc>, interval: RotationInterval) -> Option<&Task> {
    let pool = display_pool(state);
    rotation_index(pool.len(), now, interval).map(|idx| pool[idx])
}

/// Advances the manual cursor, returning true if it moved
pub fn cycle_task(state: &mut State) -> bool {
    let len = display_pool(state).len();
    let before = state.show_index;
    state.show_index = if len == 0 {
        0
    } else {
        (state.show_index + 1) % len
    };
    state.show_index != before
}

/// Resets the manual cursor, returning true if it moved
pub fn reset_cycle(state: &mut State) -> bool {
    let before = state.show_index;
    state.show_index = 0;
    before != 0
}

/// Pulls the manual cursor back inside the current pool
pub fn clamp_cursor(state: &mut State) {
    let len = display_pool(state).len();
    if state.show_index >= len {
        state.show_index = len.saturating_sub(1);
    }
}
