//! Attachment encryption for file documents.
//!
//! File metadata (`name`, `contentType`, `publicIn`, ...) stays at the top
//! level untouched. Only the bytes of the `index` slot are replaced by their
//! ciphertext, and `encryptionData` records how to reverse that.

use crate::envelope::EncryptionData;
use crate::error::{CryptoError, CryptoResult};
use crate::key::EncryptionKey;
use sealdoc_types::{Document, ENCRYPTION_DATA_FIELD, FILE_ATTACHMENT_NAME};
use serde_json::Value;
use tracing::debug;

/// Encrypts the attachment bytes of a file document.
///
/// Stub slots are returned unchanged, as are files whose bytes already
/// authenticate under their `encryptionData`. Bytes that do not are fresh
/// plaintext and are sealed again.
pub fn encrypt_attachment_set(key: &EncryptionKey, doc: &Document) -> CryptoResult<Document> {
    let attachment = match doc.attachment(FILE_ATTACHMENT_NAME) {
        Some(attachment) => attachment,
        None if doc.has_field(ENCRYPTION_DATA_FIELD) => return Ok(doc.clone()),
        None => return Err(CryptoError::MissingAttachment(FILE_ATTACHMENT_NAME.to_string())),
    };
    let Some(bytes) = attachment.data() else {
        debug!("file {} carries a stub attachment, nothing to encrypt", doc.id);
        return Ok(doc.clone());
    };

    if let Some(raw_params) = doc.field(ENCRYPTION_DATA_FIELD) {
        if is_sealed_under(key, raw_params, bytes) {
            return Ok(doc.clone());
        }
        debug!("file {} has plaintext bytes next to stale encryptionData, sealing again", doc.id);
    }

    let (params, ciphertext) = EncryptionData::seal(key, bytes)?;

    let mut sealed = doc.clone();
    if let Some(slot) = sealed.attachment_mut(FILE_ATTACHMENT_NAME) {
        slot.replace_data(ciphertext);
    }
    sealed
        .fields
        .insert(ENCRYPTION_DATA_FIELD.to_string(), serde_json::to_value(params)?);
    Ok(sealed)
}

fn is_sealed_under(key: &EncryptionKey, raw_params: &Value, bytes: &[u8]) -> bool {
    serde_json::from_value::<EncryptionData>(raw_params.clone())
        .is_ok_and(|params| params.open(key, bytes).is_ok())
}

/// Decrypts the attachment bytes of a file document.
///
/// Files without `encryptionData`, without an `index` slot, or whose slot is
/// a stub are returned unchanged.
pub fn decrypt_attachment_set(key: &EncryptionKey, doc: &Document) -> CryptoResult<Document> {
    let Some(raw_params) = doc.field(ENCRYPTION_DATA_FIELD) else {
        return Ok(doc.clone());
    };
    let Some(ciphertext) = doc.attachment(FILE_ATTACHMENT_NAME).and_then(|a| a.data()) else {
        return Ok(doc.clone());
    };

    let params: EncryptionData = serde_json::from_value(raw_params.clone()).map_err(|e| {
        CryptoError::InvalidEnvelope(format!("malformed {ENCRYPTION_DATA_FIELD}: {e}"))
    })?;
    let plaintext = params.open(key, ciphertext)?;

    let mut opened = doc.clone();
    if let Some(slot) = opened.attachment_mut(FILE_ATTACHMENT_NAME) {
        slot.replace_data(plaintext);
    }
    opened.fields.remove(ENCRYPTION_DATA_FIELD);
    Ok(opened)
}
