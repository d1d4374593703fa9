//! Gateway error model.

use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway operation error.
///
/// These are **transport/persistence errors** as opposed to domain errors
/// (validation, permission). The taxonomy matters to callers:
///
/// - `Configuration` is fatal to the call and means no I/O was attempted.
/// - `Unavailable` is a generic remote failure; surfaced as retryable (by the
///   user, there is no automatic retry) and must leave local state unchanged.
/// - `Conflict` is surfaced everywhere except the best-effort display-name
///   reconciliation, which swallows it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Missing or invalid credentials/endpoint. No I/O was attempted.
    #[error("gateway configuration error: {0}")]
    Configuration(String),

    /// Network or remote-store failure.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    /// A conflicting write was rejected by the store (e.g. unique key).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The addressed record or blob does not exist.
    #[error("not found")]
    NotFound,
}

impl GatewayError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
