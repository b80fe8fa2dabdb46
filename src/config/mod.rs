//! Configuration module for walk-forward validation runs

mod template;

use crate::forecast::ModelConfig;
use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;

pub use template::{commented_config_template, generate_commented_config_template, generate_config_template};

/// Default configuration file name looked up by [`Config::load`]
pub const DEFAULT_CONFIG_FILE: &str = "walkforward.toml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration file version
    pub version: String,

    /// Walk-forward window settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Forecaster to evaluate
    #[serde(default)]
    pub model: ModelConfig,

    /// Input series settings
    #[serde(default)]
    pub data: DataConfig,

    /// Report destinations
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Walk-forward window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Observations given to the model for each fit
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Steps forecast and held out per window; also the stride between windows
    #[serde(default = "default_horizon")]
    pub horizon: usize,

    /// Log per-window inspection output at info level
    #[serde(default)]
    pub debug: bool,

    /// Stop after this many windows (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_windows: Option<usize>,

    /// Evaluate windows on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,

    /// Keep every window's fitted values in the report
    #[serde(default)]
    pub collect_fitted: bool,
}

/// Input series settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file holding the series (optional, may be given on the command line)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Column holding the observations
    #[serde(default = "default_column")]
    pub column: String,

    /// Column holding timestamp labels (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_column: Option<String>,
}

/// Report destinations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON report path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,

    /// Per-window CSV path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_path: Option<String>,

    /// Concatenated fitted values CSV path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitted_path: Option<String>,

    /// Run metrics in Prometheus text format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            validation: ValidationConfig::default(),
            model: ModelConfig::default(),
            data: DataConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            horizon: default_horizon(),
            debug: false,
            max_windows: None,
            parallel: false,
            collect_fitted: false,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { path: None, column: default_column(), timestamp_column: None }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

// --------- Helper default functions for serde ---------
fn default_window_size() -> usize {
    120
}
fn default_horizon() -> usize {
    7
}
fn default_column() -> String {
    "close".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl ValidationConfig {
    /// Reject settings that make the run meaningless before any window is processed
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::ConfigError("window_size must be > 0".to_string()));
        }
        if self.horizon == 0 {
            return Err(Error::ConfigError("horizon must be > 0".to_string()));
        }
        if self.max_windows == Some(0) {
            return Err(Error::ConfigError("max_windows must be > 0 when set".to_string()));
        }
        Ok(())
    }
}

impl Config {
    /// Serialize default config to TOML string
    pub fn default_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    /// Load configuration from a specific file path
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::ConfigError(format!("Failed to read config file {:?}: {}", path.as_ref(), e))
        })?;
        let mut cfg: Self = toml::from_str(&content)?;
        cfg.merge_env()?;
        Ok(cfg)
    }

    /// Save the configuration to a file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::ConfigError(format!("Failed to create directory {:?}: {}", parent, e))
            })?;
        }
        std::fs::write(path, content).map_err(|e| {
            Error::ConfigError(format!("Failed to write config file {:?}: {}", path, e))
        })?;
        Ok(())
    }

    /// Validate the configuration for required fields and reasonable values
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(Error::ConfigError(
                "Config version must be set (e.g., '0.1.0')".to_string(),
            ));
        }
        self.validation.validate()?;
        self.model.validate()?;
        if self.data.column.trim().is_empty() {
            return Err(Error::ConfigError("data.column must be set".to_string()));
        }
        Ok(())
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        // Try to load from current directory
        if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_file(DEFAULT_CONFIG_FILE);
        }

        // Try to load from user config directory
        if let Some(mut path) = dirs::config_dir() {
            path.push("walkforward");
            path.push(DEFAULT_CONFIG_FILE);
            if path.exists() {
                return Self::from_file(path);
            }
        }

        // Return default config if no config file found
        let mut config = Self::default();
        config.merge_env()?;
        Ok(config)
    }

    /// Merge environment variables into the configuration
    pub fn merge_env(&mut self) -> Result<()> {
        if let Ok(window_size) = env::var("WALKFORWARD_WINDOW_SIZE") {
            self.validation.window_size = parse_env("WALKFORWARD_WINDOW_SIZE", &window_size)?;
        }

        if let Ok(horizon) = env::var("WALKFORWARD_HORIZON") {
            self.validation.horizon = parse_env("WALKFORWARD_HORIZON", &horizon)?;
        }

        if let Ok(debug) = env::var("WALKFORWARD_DEBUG") {
            self.validation.debug = matches!(debug.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Ok(path) = env::var("WALKFORWARD_DATA") {
            self.data.path = Some(path);
        }

        if let Ok(level) = env::var("WALKFORWARD_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::ConfigError(format!("{} has invalid value '{}': {}", name, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.validation.window_size, 120);
        assert_eq!(config.validation.horizon, 7);
        assert!(!config.validation.debug);
        assert_eq!(config.model, ModelConfig::Ses { alpha: 0.3 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("walkforward.toml");

        let mut config = Config::default();
        config.validation.horizon = 14;
        config.validation.max_windows = Some(5);
        config.model = ModelConfig::Autoregressive { order: 3, differences: 1 };

        config.save(&config_path).unwrap();

        let loaded_config = temp_env::with_vars_unset(
            vec!["WALKFORWARD_WINDOW_SIZE", "WALKFORWARD_HORIZON", "WALKFORWARD_DEBUG"],
            || Config::from_file(&config_path).unwrap(),
        );
        assert_eq!(loaded_config.validation.horizon, 14);
        assert_eq!(loaded_config.validation.max_windows, Some(5));
        assert_eq!(loaded_config.model, ModelConfig::Autoregressive { order: 3, differences: 1 });
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            version = "0.1.0"
            [model]
            kind = "naive"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.validation, ValidationConfig::default());
        assert_eq!(cfg.model, ModelConfig::Naive);
        assert_eq!(cfg.data.column, "close");
    }

    #[test]
    fn test_malformed_file_is_toml_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[validation\nwindow_size = 60\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert_matches!(err, Error::TomlError(_));
        assert!(err.to_string().starts_with("TOML error:"));
    }

    #[test]
    fn test_default_toml_round_trips() {
        let text = Config::default_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let mut config = Config::default();
        config.validation.horizon = 0;
        assert_matches!(config.validate(), Err(Error::ConfigError(_)));

        let mut config = Config::default();
        config.validation.window_size = 0;
        assert_matches!(config.validate(), Err(Error::ConfigError(_)));

        let mut config = Config::default();
        config.model = ModelConfig::Holt { alpha: 0.5, beta: 2.0 };
        assert_matches!(config.validate(), Err(Error::ConfigError(_)));
    }

    #[test]
    fn test_negative_horizon_is_rejected_at_parse_time() {
        let parsed: std::result::Result<Config, _> = toml::from_str(
            r#"
            version = "0.1.0"
            [validation]
            horizon = -7
            "#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_merge_env() {
        temp_env::with_vars(
            vec![
                ("WALKFORWARD_WINDOW_SIZE", Some("60")),
                ("WALKFORWARD_HORIZON", Some("3")),
                ("WALKFORWARD_DEBUG", Some("true")),
                ("WALKFORWARD_DATA", Some("series.csv")),
            ],
            || {
                let mut config = Config::default();
                config.merge_env().unwrap();

                assert_eq!(config.validation.window_size, 60);
                assert_eq!(config.validation.horizon, 3);
                assert!(config.validation.debug);
                assert_eq!(config.data.path.as_deref(), Some("series.csv"));
            },
        );
    }

    #[test]
    fn test_merge_env_rejects_garbage() {
        temp_env::with_var("WALKFORWARD_HORIZON", Some("seven"), || {
            let mut config = Config::default();
            assert_matches!(config.merge_env(), Err(Error::ConfigError(_)));
        });
    }
}
