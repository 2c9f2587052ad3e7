//! Envelope forms stored inside documents.
//!
//! [`EncryptedData`] replaces the sensitive fields of a note, book or tag.
//! [`EncryptionData`] sits next to an encrypted file's metadata and describes
//! the cipher parameters of its attachment bytes (which stay in the slot).

use crate::cipher::{self, ALGORITHM, SealedBytes};
use crate::error::{CryptoError, CryptoResult};
use crate::key::EncryptionKey;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Encrypted document body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    pub algorithm: String,
    /// base64 ciphertext
    pub content: String,
    /// base64, 12 bytes
    pub iv: String,
    /// base64, 16 bytes
    pub tag: String,
}

impl EncryptedData {
    pub fn seal(key: &EncryptionKey, plaintext: &[u8]) -> CryptoResult<Self> {
        let SealedBytes { ciphertext, iv, tag } = cipher::seal(key.as_bytes(), plaintext)?;
        Ok(Self {
            algorithm: ALGORITHM.to_string(),
            content: STANDARD.encode(ciphertext),
            iv: STANDARD.encode(iv),
            tag: STANDARD.encode(tag),
        })
    }

    pub fn open(&self, key: &EncryptionKey) -> CryptoResult<Vec<u8>> {
        check_algorithm(&self.algorithm)?;
        let content = decode_field("content", &self.content)?;
        let iv = decode_field("iv", &self.iv)?;
        let tag = decode_field("tag", &self.tag)?;
        cipher::open(key.as_bytes(), &content, &iv, &tag)
    }
}

/// Cipher parameters of an encrypted attachment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionData {
    pub algorithm: String,
    /// base64, 12 bytes
    pub iv: String,
    /// base64, 16 bytes
    pub tag: String,
}

impl EncryptionData {
    /// Encrypts attachment bytes, returning the parameters and the ciphertext.
    pub fn seal(key: &EncryptionKey, bytes: &[u8]) -> CryptoResult<(Self, Vec<u8>)> {
        let SealedBytes { ciphertext, iv, tag } = cipher::seal(key.as_bytes(), bytes)?;
        let params = Self {
            algorithm: ALGORITHM.to_string(),
            iv: STANDARD.encode(iv),
            tag: STANDARD.encode(tag),
        };
        Ok((params, ciphertext))
    }

    pub fn open(&self, key: &EncryptionKey, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
        check_algorithm(&self.algorithm)?;
        let iv = decode_field("iv", &self.iv)?;
        let tag = decode_field("tag", &self.tag)?;
        cipher::open(key.as_bytes(), ciphertext, &iv, &tag)
    }
}

fn check_algorithm(algorithm: &str) -> CryptoResult<()> {
    if algorithm != ALGORITHM {
        return Err(CryptoError::UnsupportedAlgorithm(algorithm.to_string()));
    }
    Ok(())
}

fn decode_field(name: &str, value: &str) -> CryptoResult<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| CryptoError::InvalidEnvelope(format!("{name} is not valid base64: {e}")))
}
