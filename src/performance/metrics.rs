use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median};

/// Result of scoring one predicted sequence against ground truth.
///
/// `value` is `None` when every point had an undefined percentage error
/// (zero or non-finite actual), which is distinct from a perfect score of 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub value: Option<f64>,
    /// Points that contributed to the median
    pub scored: usize,
    /// Points dropped because their actual value was zero or non-finite
    pub excluded: usize,
}

impl ScoreOutcome {
    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }
}

/// Absolute percentage error of a single point, or `None` when the actual
/// value makes the ratio undefined.
pub fn absolute_percentage_error(actual: f64, predicted: f64) -> Option<f64> {
    if actual == 0.0 || !actual.is_finite() {
        return None;
    }
    Some((actual - predicted).abs() / actual.abs() * 100.0)
}

/// Median Absolute Percentage Error.
///
/// `median(|actual[i] - predicted[i]| / |actual[i]|) * 100`, with zero-valued
/// actuals excluded from the median and counted in `excluded`.
pub fn mdape(actual: &[f64], predicted: &[f64]) -> Result<ScoreOutcome> {
    if actual.len() != predicted.len() {
        return Err(Error::InvalidArgument(format!(
            "actual has {} values but predicted has {}",
            actual.len(),
            predicted.len()
        )));
    }
    if actual.is_empty() {
        return Err(Error::InvalidArgument("cannot score an empty sequence".to_string()));
    }
    if let Some(i) = predicted.iter().position(|p| !p.is_finite()) {
        return Err(Error::InvalidArgument(format!("predicted value at {} is not finite", i)));
    }

    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .filter_map(|(&a, &p)| absolute_percentage_error(a, p))
        .collect();
    let scored = errors.len();
    let excluded = actual.len() - scored;

    let value = if errors.is_empty() { None } else { Some(Data::new(errors).median()) };
    Ok(ScoreOutcome { value, scored, excluded })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_forecast_scores_zero() {
        let x = [3.0, 1.5, 8.0, 2.25, 7.0];
        let outcome = mdape(&x, &x).unwrap();
        assert_eq!(outcome.value, Some(0.0));
        assert_eq!(outcome.scored, 5);
        assert_eq!(outcome.excluded, 0);
    }

    #[test]
    fn test_constant_overshoot() {
        let actual = [5.0; 7];
        let predicted = [6.0; 7];
        let outcome = mdape(&actual, &predicted).unwrap();
        assert!((outcome.value.unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_median_of_even_count_averages_middle_pair() {
        // errors: 10%, 20%, 30%, 40%
        let actual = [100.0, 100.0, 100.0, 100.0];
        let predicted = [110.0, 80.0, 130.0, 60.0];
        let outcome = mdape(&actual, &predicted).unwrap();
        assert!((outcome.value.unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_median_ignores_outlier() {
        let actual = [10.0, 10.0, 10.0];
        let predicted = [11.0, 9.0, 1000.0];
        let outcome = mdape(&actual, &predicted).unwrap();
        assert!((outcome.value.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_invariant_but_not_shift_invariant() {
        let actual = [4.0, 9.0, 2.0, 7.5, 3.0];
        let predicted = [5.0, 8.0, 2.5, 7.0, 3.3];
        let base = mdape(&actual, &predicted).unwrap().value.unwrap();

        let scaled_a: Vec<f64> = actual.iter().map(|v| v * 17.5).collect();
        let scaled_p: Vec<f64> = predicted.iter().map(|v| v * 17.5).collect();
        let scaled = mdape(&scaled_a, &scaled_p).unwrap().value.unwrap();
        assert!((base - scaled).abs() < 1e-9);

        let shifted_a: Vec<f64> = actual.iter().map(|v| v + 100.0).collect();
        let shifted_p: Vec<f64> = predicted.iter().map(|v| v + 100.0).collect();
        let shifted = mdape(&shifted_a, &shifted_p).unwrap().value.unwrap();
        assert!((base - shifted).abs() > 1e-3);
    }

    #[test]
    fn test_zero_actual_is_excluded() {
        let actual = [10.0, 0.0, 10.0];
        let predicted = [12.0, 1.0, 12.0];
        let outcome = mdape(&actual, &predicted).unwrap();
        assert!((outcome.value.unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(outcome.scored, 2);
        assert_eq!(outcome.excluded, 1);
    }

    #[test]
    fn test_all_zero_actuals_are_undefined() {
        let outcome = mdape(&[0.0, 0.0], &[1.0, 2.0]).unwrap();
        assert_eq!(outcome.value, None);
        assert!(!outcome.is_defined());
        assert_eq!(outcome.excluded, 2);
    }

    #[test]
    fn test_negative_actuals_give_positive_error() {
        let outcome = mdape(&[-10.0], &[-12.0]).unwrap();
        assert!((outcome.value.unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_precondition_violations() {
        assert!(matches!(mdape(&[1.0, 2.0], &[1.0]), Err(Error::InvalidArgument(_))));
        assert!(matches!(mdape(&[], &[]), Err(Error::InvalidArgument(_))));
        assert!(matches!(mdape(&[1.0], &[f64::NAN]), Err(Error::InvalidArgument(_))));
    }
}
