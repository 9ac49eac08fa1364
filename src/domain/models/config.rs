use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Main configuration structure for promptgate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Trigger thresholds
    #[serde(default)]
    pub coordinator: CoordinatorConfig,

    /// Persisted dismissal storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Trigger coordinator thresholds
///
/// The load prompt delay is fixed, see `LOAD_PROMPT_DELAY`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CoordinatorConfig {
    /// Share of the scrollable height (0-100] that arms the scroll trigger
    #[serde(default = "default_scroll_threshold_percent")]
    pub scroll_threshold_percent: f64,

    /// Idle time in milliseconds before the inactivity trigger fires
    #[serde(default = "default_inactivity_timeout_ms")]
    pub inactivity_timeout_ms: u64,

    /// Grace period in milliseconds between exit-intent and the exit prompt
    #[serde(default = "default_exit_delay_ms")]
    pub exit_delay_ms: u64,
}

const fn default_scroll_threshold_percent() -> f64 {
    50.0
}

const fn default_inactivity_timeout_ms() -> u64 {
    60_000
}

const fn default_exit_delay_ms() -> u64 {
    1000
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            scroll_threshold_percent: default_scroll_threshold_percent(),
            inactivity_timeout_ms: default_inactivity_timeout_ms(),
            exit_delay_ms: default_exit_delay_ms(),
        }
    }
}

impl CoordinatorConfig {
    pub fn with_scroll_threshold_percent(mut self, percent: f64) -> Self {
        self.scroll_threshold_percent = percent;
        self
    }

    pub fn with_inactivity_timeout_ms(mut self, ms: u64) -> Self {
        self.inactivity_timeout_ms = ms;
        self
    }

    pub fn with_exit_delay_ms(mut self, ms: u64) -> Self {
        self.exit_delay_ms = ms;
        self
    }

    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_millis(self.inactivity_timeout_ms)
    }

    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.exit_delay_ms)
    }
}

/// Dismissal storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    /// When false, nothing is remembered between sessions
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Path to the JSON dismissal record
    #[serde(default = "default_storage_path")]
    pub path: String,
}

const fn default_true() -> bool {
    true
}

fn default_storage_path() -> String {
    ".promptgate/dismissal.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_storage_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rotated log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
