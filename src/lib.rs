//! waybar-todo - a small todo list for a waybar custom module
//!
//! The bar shows one pending task at a time, rotating through them by
//! priority. Tasks live in a single JSON file and are edited through the
//! CLI, a wofi/rofi menu, or a terminal editor.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{Priority, State, Task, TaskId};
pub use storage::{Config, StateStore};
