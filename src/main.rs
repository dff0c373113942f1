//! waybar-todo - rotating todo list for waybar

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = waybar_todo::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
