//! Benchmark forecasters: naive persistence, training mean, fixed value and
//! seasonal naive.

use super::{require_len, FittedModel, Forecaster};
use crate::utils::error::{Error, Result};
use statrs::statistics::Statistics;

/// Fitted model whose forecast cycles through a fixed pattern.
#[derive(Debug, Clone)]
struct RepeatingFit {
    fitted: Vec<f64>,
    pattern: Vec<f64>,
}

impl FittedModel for RepeatingFit {
    fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok(self.pattern.iter().copied().cycle().take(horizon).collect())
    }
}

/// Persistence forecast: every future value equals the last observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveForecaster;

impl Forecaster for NaiveForecaster {
    fn name(&self) -> &str {
        "naive"
    }

    fn fit(&self, train: &[f64]) -> Result<Box<dyn FittedModel>> {
        require_len(train, 2)?;
        let n = train.len();
        Ok(Box::new(RepeatingFit { fitted: train[..n - 1].to_vec(), pattern: vec![train[n - 1]] }))
    }
}

/// Predicts the arithmetic mean of the training slice.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanForecaster;

impl Forecaster for MeanForecaster {
    fn name(&self) -> &str {
        "mean"
    }

    fn fit(&self, train: &[f64]) -> Result<Box<dyn FittedModel>> {
        require_len(train, 1)?;
        let mean = train.iter().mean();
        Ok(Box::new(RepeatingFit { fitted: vec![mean; train.len()], pattern: vec![mean] }))
    }
}

/// Always predicts the same value, regardless of the data.
#[derive(Debug, Clone, Copy)]
pub struct ConstantForecaster {
    value: f64,
}

impl ConstantForecaster {
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::ConfigError(format!("constant value must be finite, got {}", value)));
        }
        Ok(Self { value })
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Forecaster for ConstantForecaster {
    fn name(&self) -> &str {
        "constant"
    }

    fn fit(&self, train: &[f64]) -> Result<Box<dyn FittedModel>> {
        require_len(train, 1)?;
        Ok(Box::new(RepeatingFit { fitted: vec![self.value; train.len()], pattern: vec![self.value] }))
    }
}

/// Repeats the most recent full season of `period` observations.
#[derive(Debug, Clone, Copy)]
pub struct SeasonalNaiveForecaster {
    period: usize,
}

impl SeasonalNaiveForecaster {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(Error::ConfigError("seasonal period must be > 0".to_string()));
        }
        Ok(Self { period })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Forecaster for SeasonalNaiveForecaster {
    fn name(&self) -> &str {
        "seasonal_naive"
    }

    fn fit(&self, train: &[f64]) -> Result<Box<dyn FittedModel>> {
        require_len(train, self.period.saturating_add(1))?;
        let n = train.len();
        Ok(Box::new(RepeatingFit {
            fitted: train[..n - self.period].to_vec(),
            pattern: train[n - self.period..].to_vec(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_drops_first_observation() {
        let model = NaiveForecaster.fit(&[1.0, 2.0, 4.0]).unwrap();
        assert_eq!(model.fitted_values(), &[1.0, 2.0]);
        assert_eq!(model.forecast(3).unwrap(), vec![4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_naive_needs_two_points() {
        assert!(matches!(
            NaiveForecaster.fit(&[1.0]),
            Err(Error::InsufficientData { required: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_mean_forecast() {
        let model = MeanForecaster.fit(&[2.0, 4.0, 6.0]).unwrap();
        assert_eq!(model.fitted_values(), &[4.0, 4.0, 4.0]);
        assert_eq!(model.forecast(2).unwrap(), vec![4.0, 4.0]);
    }

    #[test]
    fn test_constant_ignores_data() {
        let model = ConstantForecaster::new(6.0).unwrap().fit(&[5.0; 10]).unwrap();
        assert_eq!(model.fitted_values().len(), 10);
        assert_eq!(model.forecast(7).unwrap(), vec![6.0; 7]);
    }

    #[test]
    fn test_seasonal_naive_cycles_last_season() {
        let train = [1.0, 2.0, 3.0, 10.0, 20.0, 30.0];
        let model = SeasonalNaiveForecaster::new(3).unwrap().fit(&train).unwrap();
        assert_eq!(model.fitted_values(), &[1.0, 2.0, 3.0]);
        assert_eq!(model.forecast(5).unwrap(), vec![10.0, 20.0, 30.0, 10.0, 20.0]);
    }

    #[test]
    fn test_seasonal_naive_needs_more_than_one_season() {
        let f = SeasonalNaiveForecaster::new(4).unwrap();
        assert!(f.fit(&[1.0, 2.0, 3.0, 4.0]).is_err());
    }

    #[test]
    fn test_seasonal_naive_huge_period_is_insufficient() {
        let f = SeasonalNaiveForecaster::new(usize::MAX).unwrap();
        assert!(matches!(
            f.fit(&[1.0, 2.0]),
            Err(Error::InsufficientData { required: usize::MAX, actual: 2 })
        ));
    }
}
