//! Waybar refresh signal
//!
//! Waybar re-runs a custom module's `exec` when it receives `SIGRTMIN+N`,
//! where `N` is the module's `signal` setting. A failed signal only means
//! the bar refreshes on its own interval, so failures are logged, not raised.

use std::process::{Command, Stdio};

use super::output::Output;

/// Process name the signal is delivered to
pub const BAR_PROCESS: &str = "waybar";

/// Builds the `pkill` invocation for a signal number
pub fn refresh_command(signal: u8) -> Command {
    let mut cmd = Command::new("pkill");
    cmd.arg(format!("-RTMIN+{}", signal))
        .arg(BAR_PROCESS)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

/// Asks the bar to refresh; no-op without a configured signal
pub fn send_refresh(signal: Option<u8>, output: &Output) {
    let Some(signal) = signal else {
        output.verbose_ctx("signal", "No signal configured, skipping refresh");
        return;
    };

    match refresh_command(signal).status() {
        Ok(status) if status.success() => {
            output.verbose_ctx("signal", &format!("Sent RTMIN+{} to {}", signal, BAR_PROCESS));
        }
        Ok(status) => {
            output.verbose_ctx(
                "signal",
                &format!("pkill exited with {:?}; is {} running?", status.code(), BAR_PROCESS),
            );
        }
        Err(e) => {
            output.verbose_ctx("signal", &format!("Failed to run pkill: {}", e));
        }
    }
}
