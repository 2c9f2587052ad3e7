//! Password-masked key storage.
//!
//! The session key is wrapped with a key derived from the user's password
//! (PBKDF2-HMAC-SHA256) so it can be persisted or synced while the password
//! stays the only secret needed to reveal it.

use crate::cipher::{self, ALGORITHM, SealedBytes};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{EncryptionKey, KEY_SIZE};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

/// PBKDF2 salt size in bytes.
pub const SALT_SIZE: usize = 16;

/// PBKDF2 parameters for password-based key masking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self { iterations: 100_000 }
    }
}

impl KdfParams {
    pub fn validate(&self) -> CryptoResult<()> {
        if self.iterations == 0 {
            return Err(CryptoError::InvalidKdfParams(
                "iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A session key encrypted under a password-derived key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskedEncryptionKey {
    pub algorithm: String,
    /// base64 ciphertext of the encoded key
    pub content: String,
    pub iv: String,
    pub tag: String,
    /// base64, 16 bytes
    pub salt: String,
    pub iterations: u32,
}

fn derive_mask_key(password: &str, salt: &[u8], params: &KdfParams) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut out = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, params.iterations, &mut *out);
    out
}

/// Wraps an existing key with `password`.
pub fn mask_key(
    key: &EncryptionKey,
    password: &str,
    params: &KdfParams,
) -> CryptoResult<MaskedEncryptionKey> {
    params.validate()?;

    let mut salt = [0u8; SALT_SIZE];
    rand::rng().fill_bytes(&mut salt);

    let mask = derive_mask_key(password, &salt, params);
    let SealedBytes { ciphertext, iv, tag } = cipher::seal(&*mask, key.as_bytes())?;

    Ok(MaskedEncryptionKey {
        algorithm: ALGORITHM.to_string(),
        content: STANDARD.encode(ciphertext),
        iv: STANDARD.encode(iv),
        tag: STANDARD.encode(tag),
        salt: STANDARD.encode(salt),
        iterations: params.iterations,
    })
}

/// Generates a new session key and returns it masked with `password`.
///
/// Use [`reveal_key`] to obtain the usable key.
pub fn create_masked_key(password: &str, params: &KdfParams) -> CryptoResult<MaskedEncryptionKey> {
    mask_key(&EncryptionKey::generate(), password, params)
}

/// Unwraps a masked key. A wrong password surfaces as a decryption error.
pub fn reveal_key(password: &str, masked: &MaskedEncryptionKey) -> CryptoResult<EncryptionKey> {
    if masked.algorithm != ALGORITHM {
        return Err(CryptoError::UnsupportedAlgorithm(masked.algorithm.clone()));
    }
    let params = KdfParams {
        iterations: masked.iterations,
    };
    params.validate()?;

    let salt = STANDARD.decode(&masked.salt)?;
    let content = STANDARD.decode(&masked.content)?;
    let iv = STANDARD.decode(&masked.iv)?;
    let tag = STANDARD.decode(&masked.tag)?;

    let mask = derive_mask_key(password, &salt, &params);
    let plaintext = Zeroizing::new(cipher::open(&*mask, &content, &iv, &tag)?);

    let encoded = std::str::from_utf8(&plaintext)
        .map_err(|_| CryptoError::InvalidEnvelope("masked key is not valid UTF-8".to_string()))?;
    EncryptionKey::parse(encoded)
}

/// Re-wraps a masked key for a password change. The key itself is unchanged,
/// so everything already encrypted with it stays readable.
pub fn remask_key(
    old_password: &str,
    new_password: &str,
    masked: &MaskedEncryptionKey,
    params: &KdfParams,
) -> CryptoResult<MaskedEncryptionKey> {
    let key = reveal_key(old_password, masked)?;
    mask_key(&key, new_password, params)
}
