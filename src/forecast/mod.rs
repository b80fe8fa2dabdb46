//! Forecasting models consumed by the walk-forward runner.
//!
//! The runner only sees the [`Forecaster`] / [`FittedModel`] pair. Model
//! specific settings (smoothing weights, lag orders, seasonal periods) are
//! fixed when a forecaster is constructed, usually from a [`ModelConfig`].

mod autoregressive;
mod naive;
mod smoothing;

pub use autoregressive::AutoregressiveForecaster;
pub use naive::{ConstantForecaster, MeanForecaster, NaiveForecaster, SeasonalNaiveForecaster};
pub use smoothing::{HoltForecaster, SimpleExponentialSmoothing};

use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A forecasting method that can be fitted to a training slice.
pub trait Forecaster: Send + Sync {
    /// Short identifier used in logs and reports
    fn name(&self) -> &str;

    /// Fit a fresh model to `train`. Errors are reported per window by the runner.
    fn fit(&self, train: &[f64]) -> Result<Box<dyn FittedModel>>;
}

/// Handle to a model fitted on one training slice.
pub trait FittedModel: Send {
    /// In-sample one-step-ahead predictions, aligned to the tail of the
    /// training slice. May be shorter than the slice when the model needs a
    /// warm-up (e.g. naive drops the first observation).
    fn fitted_values(&self) -> &[f64];

    /// Predict the `horizon` values immediately following the training slice.
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;
}

// Allow Box<dyn Forecaster> to itself satisfy Forecaster by delegating
impl<T: Forecaster + ?Sized> Forecaster for Box<T> {
    fn name(&self) -> &str { (**self).name() }
    fn fit(&self, train: &[f64]) -> Result<Box<dyn FittedModel>> { (**self).fit(train) }
}

/// Serializable description of a forecaster, as found in the `[model]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelConfig {
    /// Repeat the last observation
    Naive,
    /// Predict the training mean
    Mean,
    /// Always predict a fixed value
    Constant { value: f64 },
    /// Repeat the last full season
    SeasonalNaive { period: usize },
    /// Simple exponential smoothing
    Ses { alpha: f64 },
    /// Holt's linear trend method
    Holt { alpha: f64, beta: f64 },
    /// AR(order) on the `differences`-times differenced series
    Autoregressive {
        order: usize,
        #[serde(default)]
        differences: usize,
    },
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig::Ses { alpha: 0.3 }
    }
}

impl ModelConfig {
    /// Model kinds accepted by [`ModelConfig::from_name`]
    pub const KINDS: [&'static str; 7] =
        ["naive", "mean", "constant", "seasonal_naive", "ses", "holt", "autoregressive"];

    /// Build a model description with default parameters from its kind name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "naive" => Ok(ModelConfig::Naive),
            "mean" => Ok(ModelConfig::Mean),
            "constant" => Ok(ModelConfig::Constant { value: 0.0 }),
            "seasonal_naive" | "snaive" => Ok(ModelConfig::SeasonalNaive { period: 7 }),
            "ses" => Ok(ModelConfig::Ses { alpha: 0.3 }),
            "holt" => Ok(ModelConfig::Holt { alpha: 0.3, beta: 0.1 }),
            "autoregressive" | "ar" => Ok(ModelConfig::Autoregressive { order: 2, differences: 1 }),
            other => Err(Error::ConfigError(format!(
                "Unknown model kind '{}', expected one of: {}",
                other,
                Self::KINDS.join(", ")
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelConfig::Naive => "naive",
            ModelConfig::Mean => "mean",
            ModelConfig::Constant { .. } => "constant",
            ModelConfig::SeasonalNaive { .. } => "seasonal_naive",
            ModelConfig::Ses { .. } => "ses",
            ModelConfig::Holt { .. } => "holt",
            ModelConfig::Autoregressive { .. } => "autoregressive",
        }
    }

    /// Check parameter ranges without building the forecaster
    pub fn validate(&self) -> Result<()> {
        ForecasterFactory::create(self).map(|_| ())
    }
}

/// Forecaster factory
pub struct ForecasterFactory;

impl ForecasterFactory {
    /// Create a forecaster from its configuration
    pub fn create(config: &ModelConfig) -> Result<Box<dyn Forecaster>> {
        let forecaster: Box<dyn Forecaster> = match *config {
            ModelConfig::Naive => Box::new(NaiveForecaster),
            ModelConfig::Mean => Box::new(MeanForecaster),
            ModelConfig::Constant { value } => Box::new(ConstantForecaster::new(value)?),
            ModelConfig::SeasonalNaive { period } => Box::new(SeasonalNaiveForecaster::new(period)?),
            ModelConfig::Ses { alpha } => Box::new(SimpleExponentialSmoothing::new(alpha)?),
            ModelConfig::Holt { alpha, beta } => Box::new(HoltForecaster::new(alpha, beta)?),
            ModelConfig::Autoregressive { order, differences } => {
                Box::new(AutoregressiveForecaster::new(order, differences)?)
            }
        };
        Ok(forecaster)
    }
}

/// Validate a smoothing weight, which must lie strictly between 0 and 1.
pub(crate) fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if !(0.0 < value && value < 1.0) {
        return Err(Error::ConfigError(format!(
            "{} must be between 0 and 1 (exclusive), got {}",
            name, value
        )));
    }
    Ok(())
}

/// Fail with `InsufficientData` when `train` has fewer than `required` values.
pub(crate) fn require_len(train: &[f64], required: usize) -> Result<()> {
    if train.len() < required {
        return Err(Error::InsufficientData { required, actual: train.len() });
    }
    Ok(())
}
