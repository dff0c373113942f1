//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use super::menu;
use super::output::{Output, OutputFormat};
use super::signal;
use super::status::StatusPayload;
use super::tui;
use crate::domain::{cycle_task, reset_cycle, RotationInterval, State};
use crate::storage::{Config, LoadOrigin, StateStore};

#[derive(Parser)]
#[command(name = "waybar-todo")]
#[command(author, version, about = "Rotating todo list for a waybar custom module")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Waybar signal number to send (SIGRTMIN+N) after a change
    #[arg(long, global = true)]
    pub signal: Option<u8>,

    /// Directory holding tasks.json
    #[arg(long, global = true, env = "WAYBAR_TODO_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true, env = "WAYBAR_TODO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the waybar status JSON (default)
    Status,

    /// Advance the manual cycle cursor and refresh the bar
    Cycle,

    /// Reset the manual cycle cursor and refresh the bar
    Reset,

    /// Toggle the task currently shown on the bar
    #[command(alias = "toggle-top")]
    ToggleCurrent,

    /// Toggle a task by ID (or unique ID prefix)
    Toggle {
        #[arg(long)]
        id: String,
    },

    /// Add a task
    Add {
        #[arg(long)]
        title: String,

        /// 1 (high) to 5 (low); out-of-range values are clamped
        #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
        priority: i64,
    },

    /// Change a task's title and/or priority
    Edit {
        #[arg(long)]
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        priority: Option<i64>,
    },

    /// Delete a task
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Remove all completed tasks
    Clear,

    /// List tasks in display order
    List,

    /// Manage tasks through wofi/rofi
    Menu,

    /// Full-screen terminal editor
    Tui,
}

/// What a command did to the loaded state
#[derive(Debug, Default, Clone, Copy)]
struct Effect {
    /// State was mutated and needs saving
    changed: bool,
    /// State was already written by the command itself
    saved: bool,
    /// Refresh the bar even without a change
    refresh: bool,
    /// Print the status payload afterwards
    status: bool,
}

impl Effect {
    fn changed(changed: bool) -> Self {
        Self {
            changed,
            ..Self::default()
        }
    }

    fn status() -> Self {
        Self {
            status: true,
            ..Self::default()
        }
    }
}

/// Shared inputs for command execution
struct Context<'a> {
    output: &'a Output,
    config: &'a Config,
    store: &'a StateStore,
    interval: RotationInterval,
    now: DateTime<Utc>,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("waybar-todo starting");

    let config = Config::load(cli.config.as_deref())?;
    let data_dir = config.resolve_data_dir(cli.data_dir.as_deref())?;
    let store = StateStore::in_dir(&data_dir);
    output.verbose_ctx("store", &format!("State file: {}", store.path().display()));

    let outcome = store.load_outcome()?;
    match &outcome.origin {
        LoadOrigin::Existing => {
            output.verbose_ctx("store", &format!("Loaded {} tasks", outcome.state.len()))
        }
        LoadOrigin::Seeded => output.verbose_ctx("store", "No state file, wrote starter tasks"),
        LoadOrigin::Recovered { backup, reason } => output.verbose_ctx(
            "store",
            &format!(
                "State file was unreadable ({}); moved to {} and reseeded",
                reason,
                backup.display()
            ),
        ),
    }
    let mut state = outcome.state;

    let ctx = Context {
        output: &output,
        config: &config,
        store: &store,
        interval: config.rotation(),
        now: Utc::now(),
    };

    let command = cli.command.unwrap_or(Commands::Status);
    let effect = execute(command, &mut state, &ctx)?;

    if effect.changed && !effect.saved {
        output.verbose_ctx("store", "Saving state");
        store.save(&state)?;
    }

    if effect.changed || effect.refresh {
        signal::send_refresh(cli.signal.or(config.signal), &output);
    }

    if effect.status {
        output.data(&StatusPayload::build(&state, ctx.now, ctx.interval, &config.class));
    }

    Ok(())
}

fn execute(command: Commands, state: &mut State, ctx: &Context) -> Result<Effect> {
    let output = ctx.output;

    let effect = match command {
        Commands::Status => Effect::status(),

        Commands::Cycle => {
            let moved = cycle_task(state);
            output.verbose_ctx("cycle", &format!("Cursor now {}", state.show_index));
            Effect {
                changed: moved,
                refresh: true,
                status: true,
                ..Effect::default()
            }
        }

        Commands::Reset => {
            let moved = reset_cycle(state);
            Effect {
                changed: moved,
                refresh: true,
                status: true,
                ..Effect::default()
            }
        }

        Commands::ToggleCurrent => {
            let changed = state.toggle_current_display_task(ctx.now, ctx.interval);
            if changed {
                output.success("Toggled current task");
            } else {
                output.unchanged("No todos to toggle");
            }
            Effect::changed(changed)
        }

        Commands::Toggle { id } => {
            let changed = match state.resolve_id(&id) {
                Some(id) => state.toggle_task(&id),
                None => false,
            };
            if changed {
                output.success(&format!("Toggled task {}", id));
            } else {
                output.unchanged(&format!("No task matching '{}'", id));
            }
            Effect::changed(changed)
        }

        Commands::Add { title, priority } => match state.add_task(&title, priority) {
            Some(id) => {
                output.verbose_ctx("add", &format!("Assigned id {}", id));
                if output.is_json() {
                    output.data(&serde_json::json!({ "success": true, "id": id }));
                } else {
                    output.success(&format!("Added task {}", id));
                }
                Effect::changed(true)
            }
            None => {
                output.unchanged("Title is empty; nothing added");
                Effect::default()
            }
        },

        Commands::Edit {
            id,
            title,
            priority,
        } => {
            let changed = match state.resolve_id(&id) {
                Some(id) => state.edit_task(&id, title.as_deref(), priority),
                None => false,
            };
            if changed {
                output.success(&format!("Updated task {}", id));
            } else {
                output.unchanged(&format!("Task '{}' unchanged", id));
            }
            Effect::changed(changed)
        }

        Commands::Delete { id } => {
            let changed = match state.resolve_id(&id) {
                Some(id) => state.delete_task(&id),
                None => false,
            };
            if changed {
                output.success(&format!("Deleted task {}", id));
            } else {
                output.unchanged(&format!("No task matching '{}'", id));
            }
            Effect::changed(changed)
        }

        Commands::Clear => {
            let before = state.len();
            let changed = state.clear_completed();
            if changed {
                output.success(&format!("Cleared {} completed tasks", before - state.len()));
            } else {
                output.unchanged("No completed tasks");
            }
            Effect::changed(changed)
        }

        Commands::List => {
            output.tasks(&state.sorted());
            Effect::default()
        }

        Commands::Menu => {
            let mut provider = menu::provider(&ctx.config.launchers);
            output.verbose_ctx("menu", &format!("Using {}", provider.name()));
            Effect::changed(menu::manage(state, provider.as_mut())?)
        }

        Commands::Tui => {
            let (edited, changed) = tui::run(output, ctx.store, std::mem::take(state))?;
            *state = edited;
            Effect {
                changed,
                saved: true,
                ..Effect::default()
            }
        }
    };

    Ok(effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_command_means_status() {
        let cli = Cli::try_parse_from(["waybar-todo"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn toggle_top_is_an_alias() {
        let cli = Cli::try_parse_from(["waybar-todo", "toggle-top"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::ToggleCurrent)));
    }

    #[test]
    fn add_accepts_out_of_range_priority() {
        let cli =
            Cli::try_parse_from(["waybar-todo", "add", "--title", "x", "--priority", "-3"]).unwrap();
        match cli.command {
            Some(Commands::Add { title, priority }) => {
                assert_eq!(title, "x");
                assert_eq!(priority, -3);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["waybar-todo", "cycle", "--signal", "8", "-v"]).unwrap();
        assert_eq!(cli.signal, Some(8));
        assert!(cli.verbose);
    }
}
