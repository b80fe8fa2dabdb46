//! Walk-forward validation: window splitting, per-window evaluation and
//! aggregation into a [`ValidationReport`].
//!
//! ```no_run
//! use walkforward::config::ValidationConfig;
//! use walkforward::forecast::SimpleExponentialSmoothing;
//! use walkforward::validation::ValidationRunner;
//! use walkforward::TimeSeries;
//!
//! # fn main() -> walkforward::Result<()> {
//! let series: TimeSeries = (1..=400).map(f64::from).collect();
//! let runner = ValidationRunner::new(SimpleExponentialSmoothing::new(0.3)?, ValidationConfig::default())?;
//! let report = runner.run(&series)?;
//! report.print();
//! # Ok(())
//! # }
//! ```

pub mod harness;
pub mod report;
pub mod splitter;

pub use harness::ValidationRunner;
pub use report::{aggregate, PerformanceRecord, Summary, ValidationReport, WindowStatus};
pub use splitter::{split, Window, WindowSplitter, Windows};
