//! Configuration template generation

use crate::config::Config;
use crate::utils::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Generate a default configuration file at the specified path
pub fn generate_config_template<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = Config::default();
    config
        .save(path)
        .map_err(|e| Error::ConfigError(e.to_string()))
}

/// Default configuration with comments explaining each field
pub fn commented_config_template() -> &'static str {
    r#"# Walk-forward validation configuration
# Every section is optional; missing values fall back to the defaults shown.

version = "0.1.0"

[validation]
# Observations given to the model for each fit
window_size = 120

# Steps forecast per window; windows also advance by this many steps
horizon = 7

# Log per-window details (train/test ranges, forecasts, scores) at info level
debug = false

# Stop after this many windows
# max_windows = 10

# Evaluate windows in parallel; the report is identical to a sequential run
parallel = false

# Keep the concatenated fitted values of every window in the report
collect_fitted = false

[model]
# One of: naive, mean, constant, seasonal_naive, ses, holt, autoregressive
#   constant:        value = 0.0
#   seasonal_naive:  period = 7
#   holt:            alpha = 0.3, beta = 0.1
#   autoregressive:  order = 2, differences = 1
kind = "ses"
alpha = 0.3

[data]
# CSV file with a header row
# path = "data/series.csv"

# Column holding the observations
column = "close"

# Column holding timestamp labels, used for display only
# timestamp_column = "timestamp"

[output]
# report_path = "report.json"
# records_path = "windows.csv"
# fitted_path = "fitted.csv"
# metrics_path = "metrics.prom"

[logging]
# error, warn, info, debug, trace
level = "info"
"#
}

/// Generate a configuration file with comments explaining each field
pub fn generate_commented_config_template<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, commented_config_template())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commented_template_matches_defaults() {
        let parsed: Config = toml::from_str(commented_config_template()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_generate_templates() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.toml");
        let commented = dir.path().join("sub").join("commented.toml");

        generate_config_template(&plain).unwrap();
        generate_commented_config_template(&commented).unwrap();

        let a: Config = toml::from_str(&fs::read_to_string(plain).unwrap()).unwrap();
        let b: Config = toml::from_str(&fs::read_to_string(commented).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
