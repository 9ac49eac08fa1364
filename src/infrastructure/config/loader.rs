use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid scroll_threshold_percent: {0}. Must be greater than 0 and at most 100")]
    InvalidScrollThreshold(f64),

    #[error("Invalid inactivity_timeout_ms: {0}. Must be at least 1")]
    InvalidInactivityTimeout(u64),

    #[error("Storage path cannot be empty when storage is enabled")]
    EmptyStoragePath,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .promptgate/config.yaml (project config)
    /// 3. .promptgate/local.yaml (project local overrides, optional)
    /// 4. Environment variables (PROMPTGATE_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            // 1. Start with programmatic defaults
            .merge(Serialized::defaults(Config::default()))
            // 2. Merge project config
            .merge(Yaml::file(".promptgate/config.yaml"))
            // 3. Merge project local overrides (optional, for dev/test overrides)
            .merge(Yaml::file(".promptgate/local.yaml"))
            // 4. Merge environment variables (highest priority)
            .merge(Env::prefixed("PROMPTGATE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("PROMPTGATE_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let threshold = config.coordinator.scroll_threshold_percent;
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 100.0 {
            return Err(ConfigError::InvalidScrollThreshold(threshold));
        }

        if config.coordinator.inactivity_timeout_ms == 0 {
            return Err(ConfigError::InvalidInactivityTimeout(
                config.coordinator.inactivity_timeout_ms,
            ));
        }

        // exit_delay_ms of 0 is valid: exit-intent fires on the next tick

        if config.storage.enabled && config.storage.path.trim().is_empty() {
            return Err(ConfigError::EmptyStoragePath);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{CoordinatorConfig, LoggingConfig, StorageConfig};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!((config.coordinator.scroll_threshold_percent - 50.0).abs() < f64::EPSILON);
        assert_eq!(config.coordinator.inactivity_timeout_ms, 60_000);
        assert_eq!(config.coordinator.exit_delay_ms, 1000);
        assert_eq!(config.storage.path, ".promptgate/dismissal.json");
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
coordinator:
  scroll_threshold_percent: 75.0
  inactivity_timeout_ms: 30000
  exit_delay_ms: 500
storage:
  enabled: true
  path: /var/lib/promptgate/dismissal.json
logging:
  level: debug
  format: json
  rotation: hourly
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert!((config.coordinator.scroll_threshold_percent - 75.0).abs() < f64::EPSILON);
        assert_eq!(config.coordinator.inactivity_timeout_ms, 30_000);
        assert_eq!(config.coordinator.exit_delay_ms, 500);
        assert_eq!(config.storage.path, "/var/lib/promptgate/dismissal.json");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.rotation, "hourly");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config {
            coordinator: CoordinatorConfig {
                scroll_threshold_percent: 100.0,
                inactivity_timeout_ms: 1,
                exit_delay_ms: 0,
            },
            storage: StorageConfig {
                enabled: false,
                path: String::new(),
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
                format: "pretty".to_string(),
                log_dir: None,
                rotation: "never".to_string(),
            },
        };
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_scroll_threshold_bounds() {
        for bad in [0.0, -10.0, 100.5, f64::NAN] {
            let mut config = Config::default();
            config.coordinator.scroll_threshold_percent = bad;
            assert!(matches!(
                ConfigLoader::validate(&config),
                Err(ConfigError::InvalidScrollThreshold(_))
            ));
        }
    }

    #[test]
    fn test_validate_zero_inactivity_timeout() {
        let mut config = Config::default();
        config.coordinator.inactivity_timeout_ms = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidInactivityTimeout(0))
        ));
    }

    #[test]
    fn test_validate_empty_storage_path() {
        let mut config = Config::default();
        config.storage.path = "  ".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyStoragePath)
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogFormat(format)) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogRotation(_))
        ));
    }

    #[test]
    fn test_env_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "coordinator:\n  exit_delay_ms: 500").unwrap();
        file.flush().unwrap();

        temp_env::with_vars(
            [
                ("PROMPTGATE_COORDINATOR__EXIT_DELAY_MS", Some("250")),
                ("PROMPTGATE_LOGGING__LEVEL", Some("debug")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.coordinator.exit_delay_ms, 250, "Env should win");
                assert_eq!(config.logging.level, "debug");
                assert_eq!(config.coordinator.inactivity_timeout_ms, 60_000);
            },
        );
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "coordinator:\n  scroll_threshold_percent: 150").unwrap();
        file.flush().unwrap();

        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_hierarchical_merging() {
        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "coordinator:\n  exit_delay_ms: 800\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(
            override_file,
            "coordinator:\n  exit_delay_ms: 200\nlogging:\n  level: debug"
        )
        .unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.coordinator.exit_delay_ms, 200, "Override should win");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
    }
}
