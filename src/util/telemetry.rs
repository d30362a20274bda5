//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: batch start/complete lines and
/// task failures, but not every admission.
pub const DEFAULT_FILTER: &str = "bounded_batch=info";

/// Initialize tracing. Users can install their own subscriber; this helper
/// installs an env-filtered fmt subscriber only if none is set.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_FILTER);
}

/// Like [`init_tracing`], falling back to `default_filter` when `RUST_LOG`
/// is unset or unparsable.
pub fn init_tracing_with(default_filter: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
