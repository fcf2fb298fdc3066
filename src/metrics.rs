//! Prometheus metrics recorder for boxoffice.
//!
//! The library records counters through the `metrics` facade; they are no-ops
//! until a recorder is installed. This module installs a process-global
//! Prometheus recorder (no HTTP listener) and renders its snapshot as text.
//!
//! Counters:
//!
//! - `boxoffice_tickets_purchased_total`
//! - `boxoffice_ledger_saves_total`
//! - `boxoffice_ledger_malformed_tokens_total`
//! - `boxoffice_audit_lines_total`

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Error type for metrics installation.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// The global metrics recorder has already been installed.
    #[error("metrics recorder already installed")]
    AlreadyInstalled,

    /// The exporter refused to build or register the recorder.
    #[error("failed to install metrics recorder: {0}")]
    Build(String),
}

/// Handle to the installed Prometheus metrics recorder.
///
/// Cheap to clone.
#[derive(Clone, Debug)]
pub struct MetricsHandle {
    inner: Arc<PrometheusHandle>,
}

impl MetricsHandle {
    /// Render the current metrics snapshot in Prometheus exposition format.
    pub fn render(&self) -> String {
        self.inner.render()
    }
}

/// Guard to ensure the global recorder is installed at most once.
static RECORDER_HANDLE: OnceLock<MetricsHandle> = OnceLock::new();

/// Install the global Prometheus metrics recorder.
///
/// Call once at startup, before the first counter is touched, so no
/// increments are lost.
///
/// # Errors
///
/// Returns [`MetricsError::AlreadyInstalled`] on a second call in the same
/// process. Returns [`MetricsError::Build`] if another recorder was already
/// registered with the `metrics` facade.
pub fn install_recorder() -> Result<MetricsHandle, MetricsError> {
    if RECORDER_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInstalled);
    }

    let prom_handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::Build(e.to_string()))?;
    let handle = MetricsHandle {
        inner: Arc::new(prom_handle),
    };

    RECORDER_HANDLE
        .set(handle.clone())
        .map_err(|_| MetricsError::AlreadyInstalled)?;
    Ok(handle)
}

/// Returns the previously installed [`MetricsHandle`], if any.
///
/// Useful in tests where another test may already have installed the recorder.
pub fn get_installed_handle() -> Option<MetricsHandle> {
    RECORDER_HANDLE.get().cloned()
}
