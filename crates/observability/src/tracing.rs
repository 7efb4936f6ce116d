//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Level via `RUST_LOG` (default `info`). Output is JSON lines, or
/// human-readable when `COURSEHUB_LOG_PRETTY` is set for local runs.
/// Subsequent calls are no-ops, so `main` and tests can both call this.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if std::env::var_os("COURSEHUB_LOG_PRETTY").is_some() {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(false)
            .try_init();
    }
}
