//! Encryption layer for sealdoc.
//!
//! Provides selective document encryption using:
//! - AES-256-GCM with a random IV and a detached authentication tag
//! - PBKDF2-HMAC-SHA256 for masking the session key with a password
//! - Secure key handling with zeroization
//!
//! # Envelope forms
//!
//! 1. **Document envelope**: the sensitive fields of a note, book or tag are
//!    serialized as one JSON object and replaced by `encryptedData`
//!    (`algorithm`, `content`, `iv`, `tag`).
//!
//! 2. **File envelope**: a file keeps its metadata in plaintext. The bytes of
//!    its `index` attachment are replaced by ciphertext and the cipher
//!    parameters are stored in `encryptionData`.
//!
//! Both forms are idempotent under re-encryption: a document that already
//! carries its envelope is returned unchanged.

mod cipher;
mod document;
pub mod encryptor;
mod envelope;
mod error;
mod file;
mod key;
pub mod masked;

pub use cipher::{ALGORITHM, IV_SIZE, SealedBytes, TAG_SIZE, open, seal};
pub use document::{EnvelopePolicy, decrypt_document, encrypt_document};
pub use encryptor::{AesGcmCipher, DocumentCipher};
pub use envelope::{EncryptedData, EncryptionData};
pub use error::{CryptoError, CryptoResult};
pub use file::{decrypt_attachment_set, encrypt_attachment_set};
pub use key::{EncryptionKey, KEY_SIZE, is_valid_key_format};
pub use masked::{
    KdfParams, MaskedEncryptionKey, SALT_SIZE, create_masked_key, mask_key, remask_key, reveal_key,
};
