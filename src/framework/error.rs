//! # Errors
//!
//! Two layers of errors flow through the crate:
//!
//! - [`ApiError`] originates in sub-resources (usually in the [`ItemApi`](crate::framework::ItemApi)
//!   implementation) and is passed through to listeners unchanged.
//! - [`CoordinatorError`] covers talking to a coordinator task and managing sessions.

/// Errors reported by sub-resources while attaching or loading.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ApiError {
    /// The request did not reach the service or timed out.
    #[error("Transient network error: {0}")]
    TransientNetwork(String),

    /// The service answered with a malformed or unexpected response.
    #[error("API protocol error: {0}")]
    ApiProtocol(String),

    /// The item or one of its collections does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The resource was attached with parameters it cannot serve. Never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Whether a caller-driven retry could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::TransientNetwork(_))
    }
}

/// Errors raised by the coordinator actor, its client and the retained holder.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error("Coordinator closed")]
    CoordinatorClosed,
    #[error("Coordinator dropped response channel")]
    CoordinatorDropped,
    #[error("Attach failed: {0}")]
    Attach(#[from] ApiError),
    #[error("Invalid saved bundle: {0}")]
    Bundle(#[from] serde_json::Error),
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Coordinator task failed: {0}")]
    TaskFailed(String),
}
