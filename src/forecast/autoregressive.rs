//! Autoregressive forecaster on a differenced series, i.e. ARIMA(p, d, 0).
//!
//! Coefficients and intercept are estimated by ordinary least squares through
//! the normal equations. Near-constant slices make the system singular, which
//! surfaces as a `ModelError` for that window.

use super::{FittedModel, Forecaster};
use crate::utils::error::{Error, Result};

/// Relative pivot threshold below which the normal equations count as singular.
const SINGULAR_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy)]
pub struct AutoregressiveForecaster {
    order: usize,
    differences: usize,
}

impl AutoregressiveForecaster {
    pub fn new(order: usize, differences: usize) -> Result<Self> {
        if order == 0 {
            return Err(Error::ConfigError("autoregressive order must be > 0".to_string()));
        }
        if differences > 2 {
            return Err(Error::ConfigError(format!(
                "at most 2 differences are supported, got {}",
                differences
            )));
        }
        Ok(Self { order, differences })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn differences(&self) -> usize {
        self.differences
    }

    /// Smallest training slice that leaves more regression rows than parameters.
    pub fn min_train_len(&self) -> usize {
        self.order.saturating_mul(2).saturating_add(self.differences + 2)
    }
}

#[derive(Debug, Clone)]
struct ArFit {
    intercept: f64,
    /// `coefficients[k]` multiplies the value `k + 1` steps back
    coefficients: Vec<f64>,
    /// Tail of the differenced series, long enough to seed the recursion
    history: Vec<f64>,
    /// Last value of each differencing level, `last[0]` being the raw series
    last: Vec<f64>,
    fitted: Vec<f64>,
}

impl ArFit {
    fn predict_next(&self, history: &[f64]) -> f64 {
        let n = history.len();
        self.intercept
            + self
                .coefficients
                .iter()
                .enumerate()
                .map(|(k, phi)| phi * history[n - 1 - k])
                .sum::<f64>()
    }
}

impl FittedModel for ArFit {
    fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let mut history = self.history.clone();
        let mut last = self.last.clone();
        let mut out = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let next = self.predict_next(&history);
            history.push(next);
            // integrate back through each differencing level
            let mut value = next;
            for level in last.iter_mut().rev() {
                value += *level;
                *level = value;
            }
            out.push(value);
        }
        Ok(out)
    }
}

impl Forecaster for AutoregressiveForecaster {
    fn name(&self) -> &str {
        "autoregressive"
    }

    fn fit(&self, train: &[f64]) -> Result<Box<dyn FittedModel>> {
        let required = self.min_train_len();
        if train.len() < required {
            return Err(Error::InsufficientData { required, actual: train.len() });
        }

        let mut levels = vec![train.to_vec()];
        for _ in 0..self.differences {
            let prev = levels.last().map(|l| difference(l)).unwrap_or_default();
            levels.push(prev);
        }
        let z = levels.pop().unwrap_or_default();
        let last: Vec<f64> = levels.iter().filter_map(|l| l.last().copied()).collect();

        let p = self.order;
        let params = p + 1;
        let mut xtx = vec![vec![0.0; params]; params];
        let mut xty = vec![0.0; params];
        for t in p..z.len() {
            let row = design_row(&z, t, p);
            for i in 0..params {
                xty[i] += row[i] * z[t];
                for j in 0..params {
                    xtx[i][j] += row[i] * row[j];
                }
            }
        }
        let beta = solve(xtx, xty)?;

        let mut fit = ArFit {
            intercept: beta[0],
            coefficients: beta[1..].to_vec(),
            history: z[z.len() - p..].to_vec(),
            last,
            fitted: Vec::with_capacity(z.len() - p),
        };

        // One-step-ahead fitted value on the original scale is the observed value
        // shifted by the residual on the differenced scale.
        let offset = self.differences;
        for t in p..z.len() {
            let predicted = fit.predict_next(&z[..t]);
            fit.fitted.push(train[t + offset] + (predicted - z[t]));
        }
        if fit.fitted.iter().any(|v| !v.is_finite()) {
            return Err(Error::ModelError("autoregressive fit produced non-finite values".to_string()));
        }
        Ok(Box::new(fit))
    }
}

fn difference(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

fn design_row(z: &[f64], t: usize, p: usize) -> Vec<f64> {
    let mut row = Vec::with_capacity(p + 1);
    row.push(1.0);
    row.extend((1..=p).map(|k| z[t - k]));
    row
}

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    let scale = a.iter().flatten().fold(0.0_f64, |m, v| m.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return Err(Error::ModelError("design matrix is degenerate".to_string()));
    }

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot_row][col].abs() <= SINGULAR_TOLERANCE * scale {
            return Err(Error::ModelError(
                "singular normal equations (series has too little variance)".to_string(),
            ));
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}
