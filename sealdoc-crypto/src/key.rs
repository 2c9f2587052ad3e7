//! Session key material.
//!
//! A key is a 32-character string over the base64 alphabet. Its ASCII bytes
//! are used directly as the 256-bit AES key, so the string form is also the
//! byte form and the length check doubles as the key-size check.

use crate::error::{CryptoError, CryptoResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Length of an encoded key in characters (and AES key bytes).
pub const KEY_SIZE: usize = 32;

/// Random bytes behind a generated key; 24 bytes encode to exactly 32 base64 chars.
const KEY_ENTROPY_BYTES: usize = 24;

/// Active symmetric key with secure memory handling.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    value: String,
}

impl EncryptionKey {
    /// Validates and wraps an encoded key.
    ///
    /// The rejected value is never echoed back in the error.
    pub fn parse(value: &str) -> CryptoResult<Self> {
        if !is_valid_key_format(value) {
            return Err(CryptoError::InvalidKeyFormat);
        }
        Ok(Self {
            value: value.to_string(),
        })
    }

    /// Generates a fresh random key.
    pub fn generate() -> Self {
        let mut entropy = Zeroizing::new([0u8; KEY_ENTROPY_BYTES]);
        rand::rng().fill_bytes(&mut *entropy);
        Self {
            value: STANDARD.encode(&*entropy),
        }
    }

    /// Returns the encoded key, e.g. to persist it through a masked envelope.
    pub fn expose_secret(&self) -> &str {
        &self.value
    }

    /// Raw AES key bytes.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Canonical key format: exactly 32 characters of `[A-Za-z0-9+/=]`.
pub fn is_valid_key_format(value: &str) -> bool {
    value.len() == KEY_SIZE
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
}
