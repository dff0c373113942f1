//! # Storage Layer
//!
//! Persistence for waybar-todo.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | State | JSON object | `~/.local/share/waybar-todo/tasks.json` |
//! | Corrupt state | as found | `~/.local/share/waybar-todo/tasks.json.bak` |
//! | Config | TOML | `~/.config/waybar-todo/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - All writes are atomic (uniquely named temp file + rename)
//! - Reads and writes take `fs2` advisory locks on `tasks.json.lock` for
//!   their own duration
//! - A whole load-modify-save cycle is not locked; the last writer wins
//!
//! ## Key Types
//!
//! - [`StateStore`] - Load/save the state with corruption recovery
//! - [`Config`] - User configuration

mod config;
mod record;
mod state_store;

pub use config::{Config, ConfigError, APP_NAME};
pub use record::{RecordError, SavedState, StateRecord, TaskRecord};
pub use state_store::{LoadOrigin, LoadOutcome, StateStore, STATE_FILE_NAME};
