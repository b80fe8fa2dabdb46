use super::SeriesProvider;
use crate::utils::types::TimeSeries;
use crate::{Error, Result};
use csv::ReaderBuilder;
use std::path::Path;

/// CSV provider reading one numeric column (and optionally a timestamp column)
/// from a file with a header row.
#[derive(Debug, Clone)]
pub struct CsvSeriesProvider {
    column: String,
    timestamp_column: Option<String>,
}

impl CsvSeriesProvider {
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into(), timestamp_column: None }
    }

    pub fn with_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.timestamp_column = Some(column.into());
        self
    }
}

impl SeriesProvider for CsvSeriesProvider {
    fn load(&self, path: &Path) -> Result<TimeSeries> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| Error::DataError(format!("CSV read error: {e}")))?;

        let headers = rdr
            .headers()
            .map_err(|e| Error::DataError(format!("CSV header error: {e}")))?
            .clone();
        let find = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                Error::DataError(format!("column '{}' not found in {}", name, path.display()))
            })
        };
        let value_idx = find(&self.column)?;
        let ts_idx = self.timestamp_column.as_deref().map(find).transpose()?;

        let mut values = Vec::new();
        let mut timestamps = Vec::new();
        for (row, rec) in rdr.records().enumerate() {
            // header is line 1
            let line = row + 2;
            let rec = rec.map_err(|e| Error::DataError(format!("CSV parse error: {e}")))?;
            let cell = rec.get(value_idx).unwrap_or("");
            let value: f64 = cell.parse().map_err(|_| {
                Error::DataError(format!("line {}: '{}' is not a number", line, cell))
            })?;
            if !value.is_finite() {
                return Err(Error::DataError(format!("line {}: value '{}' is not finite", line, cell)));
            }
            values.push(value);
            if let Some(idx) = ts_idx {
                timestamps.push(rec.get(idx).unwrap_or("").to_string());
            }
        }

        if values.is_empty() {
            return Err(Error::DataError(format!("no rows in {}", path.display())));
        }
        log::debug!("Loaded {} observations from {}", values.len(), path.display());

        match ts_idx {
            Some(_) => TimeSeries::with_timestamps(values, timestamps),
            None => Ok(TimeSeries::new(values)),
        }
    }
}
