//! Shared tracing/logging setup for TierVault binaries and test harnesses.

pub mod tracing;

/// Initialize process-wide logging with the default (human-readable) format.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
