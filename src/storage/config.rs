//! Configuration handling for waybar-todo
//!
//! Configuration is read from `~/.config/waybar-todo/config.toml` (or the
//! file named by `--config` / `$WAYBAR_TODO_CONFIG`). Every key is optional.
//!
//! ```toml
//! data_dir = "/home/me/.local/share/waybar-todo"
//! rotation_interval = 2
//! signal = 8
//! class = "todo"
//! launchers = ["wofi", "rofi"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{RotationInterval, ROTATION_INTERVAL};

/// Application name used for config and data directories
pub const APP_NAME: &str = "waybar-todo";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `tasks.json`
    pub data_dir: Option<PathBuf>,

    /// Seconds each task stays on the status line
    pub rotation_interval: u64,

    /// Waybar `RTMIN+N` signal to send after changes
    pub signal: Option<u8>,

    /// CSS class reported to waybar
    pub class: String,

    /// Launcher programs to try, in order
    pub launchers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            rotation_interval: ROTATION_INTERVAL.secs(),
            signal: None,
            class: "todo".to_string(),
            launchers: vec!["wofi".to_string(), "rofi".to_string()],
        }
    }
}

impl Config {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    /// Returns the default config file location
    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Returns the default data directory
    pub fn default_data_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Loads configuration from `path`, or the default location
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to load config: {}", config_path.display()))
    }

    /// Parses and validates TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rotation_interval == 0 {
            return Err(ConfigError::Invalid(
                "rotation_interval must be at least 1 second".to_string(),
            ));
        }
        if self.class.trim().is_empty() {
            return Err(ConfigError::Invalid("class must not be empty".to_string()));
        }
        if self.launchers.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "launchers must not contain empty names".to_string(),
            ));
        }
        Ok(())
    }

    /// Rotation step as a domain value
    pub fn rotation(&self) -> RotationInterval {
        RotationInterval::from_secs(self.rotation_interval).unwrap_or(ROTATION_INTERVAL)
    }

    /// Resolves the data directory: explicit override, then config, then default
    pub fn resolve_data_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        Self::default_data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
    }
}
