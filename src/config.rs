//! Configuration management for ticktally

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How the user is told a Pomodoro phase finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMethod {
    /// Ring the terminal bell
    #[default]
    Bell,
    /// Stay quiet
    None,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Pomodoro focus phase length in minutes (default: 25)
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u64,

    /// Pomodoro break phase length in minutes (default: 5)
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u64,

    /// Directory the default history files live in (default: ~/.ticktally)
    #[serde(default = "config_dir")]
    pub history_dir: PathBuf,

    /// Stopwatch history file name, relative to `history_dir`
    #[serde(default = "default_stopwatch_history_file")]
    pub stopwatch_history_file: String,

    /// Pomodoro history file name, relative to `history_dir`
    #[serde(default = "default_pomodoro_history_file")]
    pub pomodoro_history_file: String,

    /// Invalid or duplicate labels accepted before a save gives up (default: 3)
    #[serde(default = "default_max_label_attempts")]
    pub max_label_attempts: u32,

    /// Notification on phase completion: "bell" or "none"
    #[serde(default)]
    pub notification_method: NotificationMethod,

    /// Spacing between timer ticks in milliseconds (default: 1000)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_focus_minutes() -> u64 {
    25
}

fn default_break_minutes() -> u64 {
    5
}

fn default_stopwatch_history_file() -> String {
    "stopwatch_history.txt".to_string()
}

fn default_pomodoro_history_file() -> String {
    "pomodoro_history.txt".to_string()
}

fn default_max_label_attempts() -> u32 {
    3
}

fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
            history_dir: config_dir(),
            stopwatch_history_file: default_stopwatch_history_file(),
            pomodoro_history_file: default_pomodoro_history_file(),
            max_label_attempts: default_max_label_attempts(),
            notification_method: NotificationMethod::default(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Config {
    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific file, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Focus phase length in seconds
    pub fn focus_secs(&self) -> u64 {
        self.focus_minutes * 60
    }

    /// Break phase length in seconds
    pub fn break_secs(&self) -> u64 {
        self.break_minutes * 60
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Full path of the default stopwatch history file
    pub fn stopwatch_history_path(&self) -> PathBuf {
        self.history_dir.join(&self.stopwatch_history_file)
    }

    /// Full path of the default Pomodoro history file
    pub fn pomodoro_history_path(&self) -> PathBuf {
        self.history_dir.join(&self.pomodoro_history_file)
    }

    pub fn rings_bell(&self) -> bool {
        self.notification_method == NotificationMethod::Bell
    }
}

/// Expand a leading `~` in a user-entered path
pub fn expand_path(input: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(input.trim()).into_owned())
}

/// Get the base configuration directory (~/.ticktally)
/// Falls back to ./.ticktally if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".ticktally")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".ticktally"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Ensure all required directories exist
pub fn ensure_directories(config: &Config) -> Result<()> {
    std::fs::create_dir_all(config_dir()).context("Failed to create config directory")?;

    std::fs::create_dir_all(&config.history_dir)
        .context("Failed to create history directory")?;

    std::fs::create_dir_all(logs_dir()).context("Failed to create logs directory")?;

    Ok(())
}
