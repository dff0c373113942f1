//! Domain models for waybar-todo
//!
//! Contains the task state machine and the rotation logic without any
//! I/O concerns.

mod id;
mod ordering;
mod rotation;
mod state;
mod task;
mod view;

pub use id::{IdError, TaskId, ID_LEN, SHORT_ID_LEN};
pub use ordering::{compare, pending_tasks, sorted_tasks};
pub use rotation::{
    clamp_cursor, current_task, cycle_task, display_pool, reset_cycle, rotation_index,
    RotationInterval, ROTATION_INTERVAL,
};
pub use state::{State, SEED_MANAGE_ID, SEED_QUICKSTART_ID};
pub use task::{parse_timestamp, Priority, Task, Urgency};
pub use view::{
    menu_entry_id, render_menu_entry, render_tasks_line, render_tooltip, EMPTY_LINE,
    EMPTY_TOOLTIP, TOOLTIP_FOOTER,
};
