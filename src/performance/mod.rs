//! Forecast accuracy metrics

mod metrics;

pub use self::metrics::*;
