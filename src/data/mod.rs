//! Series loading. The validation core never reads files itself; callers
//! load a [`TimeSeries`] through a provider and hand it to the runner.

pub mod providers;

pub use providers::CsvSeriesProvider;

use crate::utils::types::TimeSeries;
use crate::Result;
use std::path::Path;

/// Trait for historical series providers
pub trait SeriesProvider {
    fn load(&self, path: &Path) -> Result<TimeSeries>;
}
