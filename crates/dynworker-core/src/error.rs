//! Envelope error types.

use thiserror::Error;

/// Errors raised while reading envelope types back from the wire.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The `status` field of an error message is not a numeric string.
    #[error("invalid status field: {0:?}")]
    InvalidStatus(String),

    /// JSON decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for envelope operations.
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;
