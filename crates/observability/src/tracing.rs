//! Tracing subscriber configuration.
//!
//! Filtering follows `RUST_LOG` when set, then `TIERVAULT_LOG`, then "info".

use tracing_subscriber::EnvFilter;

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("TIERVAULT_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Human-readable log lines, for interactive use.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(true)
        .try_init();
}

/// Structured JSON log lines, for log capture.
pub fn init_json() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
