//! Prometheus recorder for the counters and histograms emitted by the
//! validation runner.
//!
//! The library only talks to the `metrics` facade. Binaries that want the
//! numbers call [`init`] once before running and [`render`] afterwards.

use crate::{Error, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROM_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder. Calling it again after a
/// successful install is a no-op.
pub fn init() -> Result<()> {
    if PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    metrics::set_boxed_recorder(Box::new(recorder))
        .map_err(|e| Error::Other(format!("failed to install metrics recorder: {}", e)))?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

/// Handle to the installed recorder, if [`init`] has run
pub fn handle() -> Option<&'static PrometheusHandle> {
    PROM_HANDLE.get()
}

/// Current metrics in the Prometheus exposition format
pub fn render() -> Option<String> {
    handle().map(PrometheusHandle::render)
}

/// Write the rendered metrics to `path`.
pub fn write_to<P: AsRef<std::path::Path>>(path: P) -> Result<()> {
    let Some(text) = render() else {
        return Err(Error::Other("metrics recorder not installed".to_string()));
    };
    std::fs::write(path, text)?;
    Ok(())
}
