//! Client-layer error model.

use thiserror::Error;

use tiervault_core::DomainError;
use tiervault_gateway::GatewayError;

/// Result type for client flows.
pub type ClientResult<T> = Result<T, ClientError>;

/// Error surfaced by an application flow.
///
/// - `PermissionDenied` is terminal: never retried, surfaced as a denial
///   message, never a crash.
/// - `Validation` means no gateway call was attempted.
/// - `Gateway` wraps transport/persistence failures; local session state is
///   unchanged when one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ClientError {
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<DomainError> for ClientError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::PermissionDenied(msg) => Self::PermissionDenied(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}
