//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while sealing or opening documents.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid encryption key format")]
    InvalidKeyFormat,

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    #[error("missing attachment: {0}")]
    MissingAttachment(String),

    #[error("invalid key derivation parameters: {0}")]
    InvalidKdfParams(String),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
