//! Exponential smoothing forecasters.
//!
//! - **Simple (SES)**: level only, flat forecast
//! - **Holt**: level plus linear trend

use super::{check_unit_interval, require_len, FittedModel, Forecaster};
use crate::utils::error::Result;

/// Simple exponential smoothing.
///
/// `S_t = α * Y_t + (1 - α) * S_{t-1}`, initialised with the first observation.
#[derive(Debug, Clone, Copy)]
pub struct SimpleExponentialSmoothing {
    alpha: f64,
}

impl SimpleExponentialSmoothing {
    /// `alpha` must lie in (0, 1); higher values track recent observations more closely.
    pub fn new(alpha: f64) -> Result<Self> {
        check_unit_interval("alpha", alpha)?;
        Ok(Self { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

#[derive(Debug, Clone)]
struct SesFit {
    fitted: Vec<f64>,
    level: f64,
}

impl FittedModel for SesFit {
    fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok(vec![self.level; horizon])
    }
}

impl Forecaster for SimpleExponentialSmoothing {
    fn name(&self) -> &str {
        "ses"
    }

    fn fit(&self, train: &[f64]) -> Result<Box<dyn FittedModel>> {
        require_len(train, 2)?;
        let mut level = train[0];
        let mut fitted = Vec::with_capacity(train.len() - 1);
        for &value in &train[1..] {
            fitted.push(level);
            level = self.alpha * value + (1.0 - self.alpha) * level;
        }
        Ok(Box::new(SesFit { fitted, level }))
    }
}

/// Holt's linear trend method (double exponential smoothing).
#[derive(Debug, Clone, Copy)]
pub struct HoltForecaster {
    alpha: f64,
    beta: f64,
}

impl HoltForecaster {
    /// `alpha` smooths the level, `beta` the trend; both must lie in (0, 1).
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        check_unit_interval("alpha", alpha)?;
        check_unit_interval("beta", beta)?;
        Ok(Self { alpha, beta })
    }
}

#[derive(Debug, Clone)]
struct HoltFit {
    fitted: Vec<f64>,
    level: f64,
    trend: f64,
}

impl FittedModel for HoltFit {
    fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok((1..=horizon).map(|h| self.level + h as f64 * self.trend).collect())
    }
}

impl Forecaster for HoltForecaster {
    fn name(&self) -> &str {
        "holt"
    }

    fn fit(&self, train: &[f64]) -> Result<Box<dyn FittedModel>> {
        require_len(train, 2)?;
        let mut level = train[0];
        let mut trend = train[1] - train[0];
        let mut fitted = Vec::with_capacity(train.len() - 1);
        for &value in &train[1..] {
            let predicted = level + trend;
            fitted.push(predicted);
            let new_level = self.alpha * value + (1.0 - self.alpha) * predicted;
            trend = self.beta * (new_level - level) + (1.0 - self.beta) * trend;
            level = new_level;
        }
        Ok(Box::new(HoltFit { fitted, level, trend }))
    }
}
