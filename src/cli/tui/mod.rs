//! Full-screen task editor
//!
//! Every change is saved as soon as it is made, so quitting (or a crash)
//! never loses edits. The caller only needs to know whether anything
//! changed to decide on a bar refresh.

mod app;
mod event;
mod list_view;
mod ui;

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};

use super::Output;
use crate::domain::State;
use crate::storage::StateStore;
use app::App;
use event::EventHandler;

const POLL_MS: u64 = 250;

/// Runs the editor until the user quits
///
/// Returns the final state and whether any change was saved.
pub fn run(output: &Output, store: &StateStore, state: State) -> Result<(State, bool)> {
    output.verbose_ctx("tui", "Initializing terminal editor");

    let mut terminal = ui::init_terminal()?;
    let mut app = App::new(state, store);
    let events = EventHandler::new(POLL_MS);

    // Terminal must be restored even if the app panics
    let result = panic::catch_unwind(AssertUnwindSafe(|| app.run(&mut terminal, &events)));
    let restore_result = ui::restore_terminal();

    match result {
        Ok(inner) => {
            restore_result?;
            inner?;
            let changed = app.changed();
            output.verbose_ctx("tui", &format!("Editor closed (changed: {})", changed));
            Ok((app.into_state(), changed))
        }
        Err(payload) => {
            let _ = restore_result;
            if let Some(s) = payload.downcast_ref::<&str>() {
                Err(anyhow!("Editor panicked: {}", s))
            } else if let Some(s) = payload.downcast_ref::<String>() {
                Err(anyhow!("Editor panicked: {}", s))
            } else {
                Err(anyhow!("Editor panicked with unknown error"))
            }
        }
    }
}
