//! Model error types.

use thiserror::Error;

/// Errors raised while decoding documents or attachments.
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid attachment: {0}")]
    InvalidAttachment(String),

    #[error("invalid attachment data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for model operations.
pub type TypesResult<T> = Result<T, TypesError>;
