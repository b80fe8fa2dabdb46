//! Walk-forward validation harness.
//! Fits a fresh model on every window's training slice, scores the in-sample
//! fit and the out-of-sample forecast, and aggregates the per-window records.

use super::report::{aggregate, PerformanceRecord, ValidationReport};
use super::splitter::{Window, WindowSplitter};
use crate::config::ValidationConfig;
use crate::forecast::Forecaster;
use crate::performance::{mdape, ScoreOutcome};
use crate::utils::types::TimeSeries;
use crate::{Error, Result};
use log::{debug, info, log, warn, Level};
use rayon::prelude::*;
use std::time::Instant;

/// Drives one forecaster over every window of a series.
#[derive(Debug)]
pub struct ValidationRunner<F> {
    forecaster: F,
    config: ValidationConfig,
}

/// Everything produced for one window
struct WindowOutcome {
    record: PerformanceRecord,
    fitted: Vec<f64>,
}

/// Scores and model output of a window whose fit succeeded
struct WindowScores {
    train: ScoreOutcome,
    test: ScoreOutcome,
    fitted: Vec<f64>,
    forecast: Vec<f64>,
}

impl<F: Forecaster> ValidationRunner<F> {
    /// Fails with `ConfigError` when the window settings are invalid.
    pub fn new(forecaster: F, config: ValidationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { forecaster, config })
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn forecaster(&self) -> &F {
        &self.forecaster
    }

    /// Run the validation over `series`.
    pub fn run(&self, series: &TimeSeries) -> Result<ValidationReport> {
        self.run_with(series, |_| {})
    }

    /// Run the validation, calling `observer` as each window finishes. In
    /// parallel mode the observer sees windows in completion order; the
    /// report is always ordered by window index.
    pub fn run_with<O>(&self, series: &TimeSeries, observer: O) -> Result<ValidationReport>
    where
        O: Fn(&PerformanceRecord) + Sync,
    {
        let cfg = &self.config;
        let splitter = WindowSplitter::new(series.len(), cfg.window_size, cfg.horizon)?;
        let planned = splitter.window_count();
        if planned == 0 {
            warn!(
                "Series has {} observations, {} needed for one window (window_size={}, horizon={}): no data",
                series.len(),
                splitter.required_len(),
                cfg.window_size,
                cfg.horizon
            );
        }

        let limit = cfg.max_windows.map_or(planned, |max| max.min(planned));
        let windows: Vec<Window> = splitter.windows().take(limit).collect();
        info!(
            "Walk-forward validation of '{}': {} windows ({} available), window_size={}, horizon={}{}",
            self.forecaster.name(),
            windows.len(),
            planned,
            cfg.window_size,
            cfg.horizon,
            if cfg.parallel { ", parallel" } else { "" }
        );

        let evaluate = |window: &Window| {
            let outcome = self.evaluate_window(series, window);
            observer(&outcome.record);
            outcome
        };
        let outcomes: Vec<WindowOutcome> = if cfg.parallel {
            windows.par_iter().map(evaluate).collect()
        } else {
            windows.iter().map(evaluate).collect()
        };

        let mut fitted_trace = cfg.collect_fitted.then(Vec::new);
        let mut records = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            if let Some(trace) = fitted_trace.as_mut() {
                trace.extend(outcome.fitted);
            }
            records.push(outcome.record);
        }

        let mut report = aggregate(records, planned);
        report.fitted_trace = fitted_trace;
        info!(
            "Validation finished: {}/{} windows scored, {} failed, {} undefined",
            report.windows_scored, report.windows_attempted, report.windows_failed, report.windows_undefined
        );
        Ok(report)
    }

    fn evaluate_window(&self, series: &TimeSeries, window: &Window) -> WindowOutcome {
        let train = window.train_slice(series);
        let test = window.test_slice(series);

        match self.score_window(train, test) {
            Ok(scores) => {
                let record = PerformanceRecord::scored(window, scores.train, scores.test);
                let excluded = record.train_excluded + record.test_excluded;
                if excluded > 0 {
                    warn!(
                        "Window {}: {} zero-valued actuals excluded from MdAPE (train {}, test {})",
                        window.index, excluded, record.train_excluded, record.test_excluded
                    );
                    metrics::counter!("walkforward_points_excluded", excluded as u64);
                }
                if record.is_scored() {
                    metrics::counter!("walkforward_windows_scored", 1);
                } else {
                    warn!("Window {}: every actual value is zero, score undefined", window.index);
                    metrics::counter!("walkforward_windows_undefined", 1);
                }
                self.inspect(series, window, test, &scores, &record);
                WindowOutcome { record, fitted: scores.fitted }
            }
            Err(e) => {
                warn!("Window {} failed and is excluded from aggregates: {}", window.index, e);
                metrics::counter!("walkforward_windows_failed", 1);
                WindowOutcome { record: PerformanceRecord::failed(window, e.to_string()), fitted: Vec::new() }
            }
        }
    }

    fn score_window(&self, train: &[f64], test: &[f64]) -> Result<WindowScores> {
        let horizon = self.config.horizon;

        let started = Instant::now();
        let model = self.forecaster.fit(train)?;
        metrics::histogram!("walkforward_fit_ms", started.elapsed().as_secs_f64() * 1_000.0);

        let fitted = model.fitted_values().to_vec();
        let actual_fit = align_to_tail(train, &fitted)?;
        if fitted.iter().any(|v| !v.is_finite()) {
            return Err(Error::ModelError("fitted values contain non-finite numbers".to_string()));
        }

        let forecast = model.forecast(horizon)?;
        if forecast.len() != horizon {
            return Err(Error::ModelError(format!(
                "forecast has {} values, expected {}",
                forecast.len(),
                horizon
            )));
        }
        if forecast.iter().any(|v| !v.is_finite()) {
            return Err(Error::ModelError("forecast contains non-finite numbers".to_string()));
        }

        Ok(WindowScores {
            train: mdape(actual_fit, &fitted)?,
            test: mdape(test, &forecast)?,
            fitted,
            forecast,
        })
    }

    fn inspect(
        &self,
        series: &TimeSeries,
        window: &Window,
        test: &[f64],
        scores: &WindowScores,
        record: &PerformanceRecord,
    ) {
        let level = if self.config.debug { Level::Info } else { Level::Debug };
        if !log::log_enabled!(level) {
            return;
        }
        let label = |i: usize| series.timestamp(i).map(|t| format!(" ({})", t)).unwrap_or_default();
        log!(
            level,
            "Window {}: train [{}, {}){} test [{}, {}){} train MdAPE {} test MdAPE {}",
            window.index,
            window.train.start,
            window.train.end,
            label(window.train.start),
            window.test.start,
            window.test.end,
            label(window.test.start),
            format_score(record.train_error),
            format_score(record.test_error),
        );
        log!(level, "Window {}: actual   {:?}", window.index, test);
        log!(level, "Window {}: forecast {:?}", window.index, scores.forecast);
        debug!("Window {}: {} fitted values", window.index, scores.fitted.len());
    }
}

/// Pair fitted values with the tail of the training slice they predict.
///
/// A model that drops its first `k` observations returns `n - k` fitted values,
/// which line up with `train[k..]`.
fn align_to_tail<'a>(train: &'a [f64], fitted: &[f64]) -> Result<&'a [f64]> {
    if fitted.is_empty() || fitted.len() > train.len() {
        return Err(Error::ModelError(format!(
            "model returned {} fitted values for a training slice of {}",
            fitted.len(),
            train.len()
        )));
    }
    Ok(&train[train.len() - fitted.len()..])
}

fn format_score(score: Option<f64>) -> String {
    score.map(|s| format!("{:.4}%", s)).unwrap_or_else(|| "undefined".to_string())
}
