//! Terminal setup and teardown

use std::io::{self, stdout, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

pub type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Switches to raw mode on the alternate screen
pub fn init_terminal() -> Result<Terminal> {
    enable_raw_mode().context("Failed to enable raw mode; is stdin a terminal?")?;
    let mut stdout = stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e).context("Failed to enter alternate screen");
    }
    let terminal = ratatui::Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// Leaves raw mode and the alternate screen
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}
