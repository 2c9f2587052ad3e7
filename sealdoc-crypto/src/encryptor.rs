//! Crypto capability consumed by the transform hooks.
//!
//! Hooks depend on `Arc<dyn DocumentCipher>` and only hand it the active key;
//! they never touch cipher details. [`AesGcmCipher`] is the default
//! implementation backed by the functions in this crate.

use crate::document::{self, EnvelopePolicy};
use crate::error::CryptoResult;
use crate::file;
use crate::key::EncryptionKey;
use sealdoc_types::Document;

/// Encrypts and decrypts document bodies and file attachments.
///
/// Every operation returns a new document or an error, never a partially
/// transformed one.
pub trait DocumentCipher: Send + Sync {
    /// Replace the sensitive fields of a note, book or tag with an envelope.
    fn encrypt_document(&self, key: &EncryptionKey, doc: &Document) -> CryptoResult<Document>;

    /// Restore the fields sealed by `encrypt_document`.
    fn decrypt_document(&self, key: &EncryptionKey, doc: &Document) -> CryptoResult<Document>;

    /// Encrypt a file's attachment bytes, keeping its metadata readable.
    fn encrypt_attachment_set(&self, key: &EncryptionKey, doc: &Document)
    -> CryptoResult<Document>;

    /// Restore the attachment bytes sealed by `encrypt_attachment_set`.
    fn decrypt_attachment_set(&self, key: &EncryptionKey, doc: &Document)
    -> CryptoResult<Document>;
}

/// AES-256-GCM implementation of [`DocumentCipher`].
#[derive(Clone, Debug, Default)]
pub struct AesGcmCipher {
    policy: EnvelopePolicy,
}

impl AesGcmCipher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: EnvelopePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &EnvelopePolicy {
        &self.policy
    }
}

impl DocumentCipher for AesGcmCipher {
    fn encrypt_document(&self, key: &EncryptionKey, doc: &Document) -> CryptoResult<Document> {
        document::encrypt_document(key, doc, &self.policy)
    }

    fn decrypt_document(&self, key: &EncryptionKey, doc: &Document) -> CryptoResult<Document> {
        document::decrypt_document(key, doc)
    }

    fn encrypt_attachment_set(
        &self,
        key: &EncryptionKey,
        doc: &Document,
    ) -> CryptoResult<Document> {
        file::encrypt_attachment_set(key, doc)
    }

    fn decrypt_attachment_set(
        &self,
        key: &EncryptionKey,
        doc: &Document,
    ) -> CryptoResult<Document> {
        file::decrypt_attachment_set(key, doc)
    }
}
