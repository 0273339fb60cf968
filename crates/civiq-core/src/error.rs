//! Judge error types.
//!
//! These errors represent failures when calling an external answer judge.
//! They live in `civiq-core` so batch reviewers can downcast and classify
//! failures for retry decisions.

use thiserror::Error;

/// Errors that can occur when asking an external judge for a verdict.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// The service returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (missing or invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The configured model does not exist.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The service returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl JudgeError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            JudgeError::AuthenticationFailed(_) | JudgeError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            JudgeError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}
