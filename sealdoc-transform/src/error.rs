//! Transform error types.

use sealdoc_crypto::CryptoError;
use std::fmt;
use thiserror::Error;

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Error type returned by caller-supplied document hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Which side of the boundary a failure happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformErrorKind {
    /// Outward path: sealing documents bound for the remote store.
    Encryption,
    /// Inward path: opening documents coming from the remote store.
    Decryption,
}

impl fmt::Display for TransformErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformErrorKind::Encryption => write!(f, "encryption"),
            TransformErrorKind::Decryption => write!(f, "decryption"),
        }
    }
}

/// What went wrong inside an encryption or decryption step.
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error("No encryption key")]
    MissingKey,

    /// Error from the crypto capability, carried unchanged.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("document hook failed: {0}")]
    Hook(#[source] HookError),
}

/// Errors surfaced by the transform hooks and key lifecycle.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid encryption key format")]
    InvalidKeyFormat,

    #[error("encryption error: {0}")]
    Encryption(#[source] FailureCause),

    #[error("decryption error: {0}")]
    Decryption(#[source] FailureCause),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TransformError {
    pub(crate) fn new(kind: TransformErrorKind, cause: FailureCause) -> Self {
        match kind {
            TransformErrorKind::Encryption => TransformError::Encryption(cause),
            TransformErrorKind::Decryption => TransformError::Decryption(cause),
        }
    }

    pub(crate) fn missing_key(kind: TransformErrorKind) -> Self {
        Self::new(kind, FailureCause::MissingKey)
    }

    /// The direction of a transform failure; `None` for key and config errors.
    pub fn kind(&self) -> Option<TransformErrorKind> {
        match self {
            TransformError::Encryption(_) => Some(TransformErrorKind::Encryption),
            TransformError::Decryption(_) => Some(TransformErrorKind::Decryption),
            TransformError::InvalidKeyFormat | TransformError::Config(_) => None,
        }
    }

    pub fn cause(&self) -> Option<&FailureCause> {
        match self {
            TransformError::Encryption(cause) | TransformError::Decryption(cause) => Some(cause),
            TransformError::InvalidKeyFormat | TransformError::Config(_) => None,
        }
    }

    pub fn is_missing_key(&self) -> bool {
        matches!(self.cause(), Some(FailureCause::MissingKey))
    }

    /// The crypto capability's error, if that is what failed.
    pub fn crypto_error(&self) -> Option<&CryptoError> {
        match self.cause() {
            Some(FailureCause::Crypto(err)) => Some(err),
            _ => None,
        }
    }
}
