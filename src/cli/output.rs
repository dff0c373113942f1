//! Output formatting for CLI commands
//!
//! Stdout carries command output only (status JSON for waybar, listings,
//! confirmations). Diagnostics go to stderr and only with `--verbose`.

use serde::Serialize;

use crate::domain::{render_menu_entry, Task};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a confirmation message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Reports that a command ran but had nothing to change
    pub fn unchanged(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "changed": false,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data as compact JSON
    pub fn data<T: Serialize>(&self, data: &T) {
        match serde_json::to_string(data) {
            Ok(json) => println!("{}", json),
            Err(e) => self.verbose_ctx("output", &format!("Failed to serialize output: {}", e)),
        }
    }

    /// Prints tasks in display order
    pub fn tasks(&self, tasks: &[&Task]) {
        match self.format {
            OutputFormat::Json => self.data(&tasks),
            OutputFormat::Text if tasks.is_empty() => println!("No todos"),
            OutputFormat::Text => {
                for task in tasks {
                    println!("{}  ({})", render_menu_entry(task), task.id);
                }
            }
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}
