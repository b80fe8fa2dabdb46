//! Common types used throughout the validation engine.

use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// An ordered sequence of observations indexed by position.
///
/// Timestamps, when present, are display labels only; the engine never
/// interprets them. A series is read-only for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamps: Option<Vec<String>>,
}

impl TimeSeries {
    /// Create a series without timestamps
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, timestamps: None }
    }

    /// Create a series with a parallel sequence of timestamp labels
    pub fn with_timestamps(values: Vec<f64>, timestamps: Vec<String>) -> Result<Self> {
        if values.len() != timestamps.len() {
            return Err(Error::DataError(format!(
                "timestamp count {} does not match value count {}",
                timestamps.len(),
                values.len()
            )));
        }
        Ok(Self { values, timestamps: Some(timestamps) })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Timestamp label at `index`, if the series carries timestamps
    pub fn timestamp(&self, index: usize) -> Option<&str> {
        self.timestamps.as_ref().and_then(|ts| ts.get(index)).map(String::as_str)
    }

    /// Values in `range`. Panics if the range is out of bounds, like slice indexing.
    pub fn slice(&self, range: Range<usize>) -> &[f64] {
        &self.values[range]
    }
}

impl From<Vec<f64>> for TimeSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<f64> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
