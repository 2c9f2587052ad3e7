//! Body encryption for notes, books and tags.
//!
//! Sealing moves every sensitive field into a single `encryptedData`
//! envelope. Replication metadata (`_rev`, `_deleted`, any `_`-prefixed key)
//! and the policy's retained fields stay in plaintext so the store can keep
//! replicating the document without understanding it.

use crate::envelope::EncryptedData;
use crate::error::{CryptoError, CryptoResult};
use crate::key::EncryptionKey;
use sealdoc_types::{Document, ENCRYPTED_DATA_FIELD, Fields};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// Which top-level fields stay readable inside a sealed document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopePolicy {
    /// Extra fields kept in plaintext on top of `_`-prefixed metadata.
    #[serde(default)]
    pub retained_fields: BTreeSet<String>,
}

impl EnvelopePolicy {
    pub fn retaining<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            retained_fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `name` stays outside the envelope.
    pub fn is_retained(&self, name: &str) -> bool {
        name.starts_with('_') || self.retained_fields.contains(name)
    }
}

/// Seals the sensitive fields of `doc`.
///
/// A document whose only non-retained field is its envelope is already sealed
/// and is returned unchanged, so repeated sync passes never double-encrypt.
/// Plaintext fields next to an existing envelope are merged over the sealed
/// ones and everything is sealed again.
pub fn encrypt_document(
    key: &EncryptionKey,
    doc: &Document,
    policy: &EnvelopePolicy,
) -> CryptoResult<Document> {
    let mut fields = doc.fields.clone();
    if let Some(raw_envelope) = fields.remove(ENCRYPTED_DATA_FIELD) {
        if fields.keys().all(|name| policy.is_retained(name)) {
            return Ok(doc.clone());
        }
        debug!("document {} has plaintext next to its envelope, sealing again", doc.id);
        let mut merged = open_payload(key, &raw_envelope)?;
        merged.extend(fields);
        fields = merged;
    }

    let (retained, payload): (Fields, Fields) = fields
        .into_iter()
        .partition(|(name, _)| policy.is_retained(name));

    let plaintext = serde_json::to_vec(&payload)?;
    let envelope = EncryptedData::seal(key, &plaintext)?;

    let mut fields = retained;
    fields.insert(ENCRYPTED_DATA_FIELD.to_string(), serde_json::to_value(envelope)?);

    Ok(Document {
        id: doc.id.clone(),
        attachments: doc.attachments.clone(),
        fields,
    })
}

/// Opens the envelope of `doc` and merges the sealed fields back.
///
/// Documents without an envelope (public or never encrypted) pass through.
pub fn decrypt_document(key: &EncryptionKey, doc: &Document) -> CryptoResult<Document> {
    let Some(raw_envelope) = doc.field(ENCRYPTED_DATA_FIELD) else {
        return Ok(doc.clone());
    };
    let payload = open_payload(key, raw_envelope)?;

    let mut fields = doc.fields.clone();
    fields.remove(ENCRYPTED_DATA_FIELD);
    fields.extend(payload);

    Ok(Document {
        id: doc.id.clone(),
        attachments: doc.attachments.clone(),
        fields,
    })
}

/// Decrypts an `encryptedData` value into the sealed field map.
fn open_payload(key: &EncryptionKey, raw_envelope: &Value) -> CryptoResult<Fields> {
    let envelope: EncryptedData = serde_json::from_value(raw_envelope.clone())
        .map_err(|e| CryptoError::InvalidEnvelope(format!("malformed {ENCRYPTED_DATA_FIELD}: {e}")))?;
    let plaintext = envelope.open(key)?;

    match serde_json::from_slice::<Value>(&plaintext)? {
        Value::Object(map) => Ok(map),
        other => Err(CryptoError::InvalidEnvelope(format!(
            "sealed payload must be an object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
