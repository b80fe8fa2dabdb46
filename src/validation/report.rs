//! Per-window records and the aggregated validation report.

use super::splitter::Window;
use crate::performance::ScoreOutcome;
use crate::utils::error::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, Statistics};
use std::ops::Range;
use std::path::Path;

/// Outcome of one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WindowStatus {
    /// Both train and test scores are defined
    Scored,
    /// Every point of the train or test slice had a zero actual value
    Undefined,
    /// The forecaster failed to fit or produced unusable output
    Failed { reason: String },
}

/// Scores recorded for a single walk-forward window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub window_index: usize,
    pub train_range: Range<usize>,
    pub test_range: Range<usize>,
    /// In-sample MdAPE, percent
    pub train_error: Option<f64>,
    /// Out-of-sample MdAPE, percent
    pub test_error: Option<f64>,
    pub train_excluded: usize,
    pub test_excluded: usize,
    #[serde(flatten)]
    pub status: WindowStatus,
}

impl PerformanceRecord {
    pub fn scored(window: &Window, train: ScoreOutcome, test: ScoreOutcome) -> Self {
        let status = if train.is_defined() && test.is_defined() {
            WindowStatus::Scored
        } else {
            WindowStatus::Undefined
        };
        Self {
            window_index: window.index,
            train_range: window.train.clone(),
            test_range: window.test.clone(),
            train_error: train.value,
            test_error: test.value,
            train_excluded: train.excluded,
            test_excluded: test.excluded,
            status,
        }
    }

    pub fn failed(window: &Window, reason: impl Into<String>) -> Self {
        Self {
            window_index: window.index,
            train_range: window.train.clone(),
            test_range: window.test.clone(),
            train_error: None,
            test_error: None,
            train_excluded: 0,
            test_excluded: 0,
            status: WindowStatus::Failed { reason: reason.into() },
        }
    }

    pub fn is_scored(&self) -> bool {
        self.status == WindowStatus::Scored
    }
}

/// Aggregate statistics over the successfully scored windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Summary {
    /// No window produced a defined score
    NoData,
    Scored {
        mean_train_error: f64,
        mean_test_error: f64,
        median_test_error: f64,
        /// Sample standard deviation, absent with fewer than two windows
        test_error_std_dev: Option<f64>,
    },
}

/// Final output of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Windows the series could supply, before any caller limit
    pub windows_planned: usize,
    pub windows_attempted: usize,
    pub windows_scored: usize,
    pub windows_failed: usize,
    pub windows_undefined: usize,
    /// Points dropped from medians because their actual value was zero
    pub points_excluded: usize,
    pub summary: Summary,
    /// Records ordered by window index
    pub records: Vec<PerformanceRecord>,
    /// Concatenated fitted values of every window, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitted_trace: Option<Vec<f64>>,
}

/// Reduce per-window records to a report. Records may arrive in any order.
///
/// `windows_planned` is the number of windows the series could supply before
/// any `max_windows` limit; it is never reported below the records given.
pub fn aggregate(mut records: Vec<PerformanceRecord>, windows_planned: usize) -> ValidationReport {
    records.sort_by_key(|r| r.window_index);

    let (train_errors, test_errors): (Vec<f64>, Vec<f64>) = records
        .iter()
        .filter(|r| r.is_scored())
        .filter_map(|r| Some((r.train_error?, r.test_error?)))
        .unzip();

    let windows_failed =
        records.iter().filter(|r| matches!(r.status, WindowStatus::Failed { .. })).count();
    let windows_undefined = records.iter().filter(|r| r.status == WindowStatus::Undefined).count();
    let points_excluded: usize = records.iter().map(|r| r.train_excluded + r.test_excluded).sum();

    let summary = if test_errors.is_empty() {
        Summary::NoData
    } else {
        let test_error_std_dev =
            if test_errors.len() > 1 { Some(test_errors.iter().std_dev()) } else { None };
        Summary::Scored {
            mean_train_error: train_errors.iter().mean(),
            mean_test_error: test_errors.iter().mean(),
            median_test_error: Data::new(test_errors.clone()).median(),
            test_error_std_dev,
        }
    };

    ValidationReport {
        windows_planned: windows_planned.max(records.len()),
        windows_attempted: records.len(),
        windows_scored: test_errors.len(),
        windows_failed,
        windows_undefined,
        points_excluded,
        summary,
        records,
        fitted_trace: None,
    }
}

/// Flat row used for the per-window CSV export
#[derive(Debug, Serialize)]
struct RecordRow<'a> {
    window: usize,
    train_start: usize,
    train_end: usize,
    test_start: usize,
    test_end: usize,
    train_mdape: Option<f64>,
    test_mdape: Option<f64>,
    train_excluded: usize,
    test_excluded: usize,
    status: &'a str,
    reason: Option<&'a str>,
}

impl ValidationReport {
    pub fn is_no_data(&self) -> bool {
        self.summary == Summary::NoData
    }

    pub fn mean_train_error(&self) -> Option<f64> {
        match self.summary {
            Summary::Scored { mean_train_error, .. } => Some(mean_train_error),
            Summary::NoData => None,
        }
    }

    pub fn mean_test_error(&self) -> Option<f64> {
        match self.summary {
            Summary::Scored { mean_test_error, .. } => Some(mean_test_error),
            Summary::NoData => None,
        }
    }

    pub fn print(&self) {
        println!("{}", "===== WALK-FORWARD REPORT =====".bold());
        println!("Windows planned   : {}", self.windows_planned);
        println!("Windows attempted : {}", self.windows_attempted);
        println!("Windows scored    : {}", self.windows_scored.to_string().green());
        if self.windows_failed > 0 {
            println!("Windows failed    : {}", self.windows_failed.to_string().red());
        }
        if self.windows_undefined > 0 {
            println!("Windows undefined : {}", self.windows_undefined.to_string().yellow());
        }
        if self.points_excluded > 0 {
            println!("Zero actuals skip : {}", self.points_excluded);
        }
        match &self.summary {
            Summary::NoData => {
                println!("{}", "No successfully scored windows: no data".yellow());
            }
            Summary::Scored { mean_train_error, mean_test_error, median_test_error, test_error_std_dev } => {
                println!("Mean train MdAPE  : {:.4}%", mean_train_error);
                println!("Mean test MdAPE   : {:.4}%", mean_test_error);
                println!("Median test MdAPE : {:.4}%", median_test_error);
                if let Some(sd) = test_error_std_dev {
                    println!("Test MdAPE stddev : {:.4}", sd);
                }
            }
        }
        println!("{}", "===============================".bold());
    }

    /// Write the full report as pretty JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Write one CSV row per window
    pub fn write_records_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        for r in &self.records {
            let (status, reason) = match &r.status {
                WindowStatus::Scored => ("scored", None),
                WindowStatus::Undefined => ("undefined", None),
                WindowStatus::Failed { reason } => ("failed", Some(reason.as_str())),
            };
            wtr.serialize(RecordRow {
                window: r.window_index,
                train_start: r.train_range.start,
                train_end: r.train_range.end,
                test_start: r.test_range.start,
                test_end: r.test_range.end,
                train_mdape: r.train_error,
                test_mdape: r.test_error,
                train_excluded: r.train_excluded,
                test_excluded: r.test_excluded,
                status,
                reason,
            })?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the concatenated fitted values, one per row. Does nothing
    /// when the run did not collect them.
    pub fn write_fitted_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let Some(trace) = &self.fitted_trace else {
            return Ok(());
        };
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["position", "fitted"])?;
        for (i, v) in trace.iter().enumerate() {
            wtr.write_record([i.to_string(), v.to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
