//! Window generation for walk-forward validation.
//!
//! Window `i` trains on `[i*H, i*H + W)` and tests on `[i*H + W, i*H + W + H)`.
//! Indices are derived from the window number alone, so the sequence can be
//! re-enumerated or indexed directly without replaying earlier windows.

use crate::utils::error::{Error, Result};
use crate::utils::types::TimeSeries;
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;
use std::ops::Range;

/// One (train, test) pair over a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub index: usize,
    pub train: Range<usize>,
    pub test: Range<usize>,
}

impl Window {
    pub fn train_slice<'a>(&self, series: &'a TimeSeries) -> &'a [f64] {
        series.slice(self.train.clone())
    }

    pub fn test_slice<'a>(&self, series: &'a TimeSeries) -> &'a [f64] {
        series.slice(self.test.clone())
    }
}

/// Fixed-size sliding window layout for a series of a given length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSplitter {
    series_len: usize,
    window_size: usize,
    horizon: usize,
}

impl WindowSplitter {
    pub fn new(series_len: usize, window_size: usize, horizon: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::ConfigError("window_size must be > 0".to_string()));
        }
        if horizon == 0 {
            return Err(Error::ConfigError("horizon must be > 0".to_string()));
        }
        if window_size.checked_add(horizon).is_none() {
            return Err(Error::ConfigError("window_size + horizon overflows".to_string()));
        }
        Ok(Self { series_len, window_size, horizon })
    }

    /// Shortest series that yields a window
    pub fn required_len(&self) -> usize {
        self.window_size + self.horizon
    }

    /// `floor((N - W) / H)` when `N >= W + H`, otherwise 0.
    pub fn window_count(&self) -> usize {
        if self.series_len < self.required_len() {
            return 0;
        }
        (self.series_len - self.window_size) / self.horizon
    }

    /// The `i`-th window, or `None` past the end of the sequence.
    pub fn window(&self, index: usize) -> Option<Window> {
        if index >= self.window_count() {
            return None;
        }
        let start = index * self.horizon;
        let end = start + self.window_size;
        Some(Window { index, train: start..end, test: end..end + self.horizon })
    }

    pub fn windows(&self) -> Windows {
        Windows { splitter: *self, next: 0, end: self.window_count() }
    }
}

impl IntoIterator for WindowSplitter {
    type Item = Window;
    type IntoIter = Windows;

    fn into_iter(self) -> Windows {
        self.windows()
    }
}

/// Lazy, finite iterator over the windows of a [`WindowSplitter`].
#[derive(Debug, Clone)]
pub struct Windows {
    splitter: WindowSplitter,
    next: usize,
    end: usize,
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.next >= self.end {
            return None;
        }
        let window = self.splitter.window(self.next);
        self.next += 1;
        window
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Window> {
        self.next = self.next.saturating_add(n).min(self.end);
        self.next()
    }
}

impl DoubleEndedIterator for Windows {
    fn next_back(&mut self) -> Option<Window> {
        if self.next >= self.end {
            return None;
        }
        self.end -= 1;
        self.splitter.window(self.end)
    }
}

impl ExactSizeIterator for Windows {}
impl FusedIterator for Windows {}

/// Split `series` into walk-forward windows.
pub fn split(series: &TimeSeries, window_size: usize, horizon: usize) -> Result<Windows> {
    Ok(WindowSplitter::new(series.len(), window_size, horizon)?.windows())
}
