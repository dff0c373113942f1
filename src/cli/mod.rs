//! # Command-Line Interface
//!
//! Waybar calls the binary on every poll and click; every command loads the
//! state, applies at most one mutation, saves, and signals the bar.
//!
//! ## Commands
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Bar | Module `exec` and click handlers | `status`, `cycle`, `reset`, `toggle-current` |
//! | Tasks | Scriptable edits | `add`, `toggle`, `edit`, `delete`, `clear`, `list` |
//! | Interactive | Launcher menu and terminal editor | `menu`, `tui` |
//!
//! ## Output Formats
//!
//! `status`, `cycle` and `reset` always print the waybar JSON payload. Other
//! commands honour `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for diagnostics on stderr:
//! ```bash
//! waybar-todo --verbose cycle --signal 8
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod menu;
mod output;
mod signal;
mod status;
mod tui;

pub use app::{run, Cli, Commands};
pub use menu::{Launcher, LineInput, MenuAction, MenuProvider};
pub use output::{Output, OutputFormat};
pub use status::StatusPayload;
