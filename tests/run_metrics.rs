//! Counters and histograms emitted by a validation run. Kept in its own test
//! binary because the recorder is process-global.

use assert_matches::assert_matches;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use std::collections::HashMap;
use walkforward::config::ValidationConfig;
use walkforward::forecast::{FittedModel, Forecaster};
use walkforward::validation::{ValidationRunner, WindowStatus};
use walkforward::{Error, Result, TimeSeries};

/// Predicts 6.0 everywhere; refuses training slices containing a spike.
struct SpikeAverse;

struct Flat(Vec<f64>);

impl FittedModel for Flat {
    fn fitted_values(&self) -> &[f64] {
        &self.0
    }

    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok(vec![6.0; horizon])
    }
}

impl Forecaster for SpikeAverse {
    fn name(&self) -> &str {
        "spike_averse"
    }

    fn fit(&self, train: &[f64]) -> Result<Box<dyn FittedModel>> {
        if train.iter().any(|v| *v > 100.0) {
            return Err(Error::ModelError("spike in training slice".to_string()));
        }
        Ok(Box::new(Flat(vec![6.0; train.len()])))
    }
}

#[test]
fn run_records_failures_and_excluded_points() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().unwrap();

    // window 0 trains on the spike and fails; window 1 trains on [5, 5, 5, 0]
    let series = TimeSeries::new(vec![200.0, 5.0, 5.0, 5.0, 5.0, 0.0, 5.0, 5.0]);
    let config = ValidationConfig { window_size: 4, horizon: 2, ..ValidationConfig::default() };
    let report = ValidationRunner::new(SpikeAverse, config).unwrap().run(&series).unwrap();

    assert_matches!(report.records[0].status, WindowStatus::Failed { .. });
    assert_eq!(report.records[1].status, WindowStatus::Scored);
    assert_eq!(report.points_excluded, 1);

    let values: HashMap<String, DebugValue> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(key, _, _, value)| (key.key().name().to_string(), value))
        .collect();

    assert_matches!(values.get("walkforward_windows_failed"), Some(DebugValue::Counter(1)));
    assert_matches!(values.get("walkforward_windows_scored"), Some(DebugValue::Counter(1)));
    assert_matches!(values.get("walkforward_points_excluded"), Some(DebugValue::Counter(1)));
    assert!(!values.contains_key("walkforward_windows_undefined"));
    // only the successful fit is timed
    assert_matches!(
        values.get("walkforward_fit_ms"),
        Some(DebugValue::Histogram(samples)) if samples.len() == 1
    );
}
