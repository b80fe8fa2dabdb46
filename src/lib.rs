//! # walkforward
//! Walk-forward validation of time-series forecasters.
//!
//! A series is cut into fixed-size training windows that slide forward by the
//! forecast horizon. Each window gets a freshly fitted model whose in-sample
//! fit and out-of-sample forecast are scored with the median absolute
//! percentage error (MdAPE); the per-window scores are then aggregated into a
//! [`ValidationReport`](validation::ValidationReport).

pub use crate::utils::error::{Error, Result};
pub use crate::utils::types::TimeSeries;

pub mod config;
pub mod data;
pub mod forecast;
pub mod performance;
pub mod telemetry;
pub mod utils;
pub mod validation;
