//! Binary attachment slots.
//!
//! On the wire an attachment is either inline (`data` holds base64 bytes) or a
//! stub (`stub: true`), meaning the store returned metadata only for this
//! revision. Stubs carry nothing to decrypt and must pass through untouched.

use crate::error::TypesError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Payload of an attachment slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttachmentPayload {
    /// Raw attachment bytes materialized in this revision.
    Inline(Vec<u8>),
    /// Metadata-only placeholder.
    Stub,
}

/// A single named attachment of a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAttachment", into = "RawAttachment")]
pub struct Attachment {
    pub content_type: String,
    pub payload: AttachmentPayload,
    /// Store-computed digest, only meaningful for the bytes it was computed on.
    pub digest: Option<String>,
    pub length: Option<u64>,
    pub revpos: Option<u64>,
}

impl Attachment {
    /// Creates an inline attachment.
    pub fn inline(content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            payload: AttachmentPayload::Inline(data),
            digest: None,
            length: None,
            revpos: None,
        }
    }

    /// Creates a stub attachment.
    pub fn stub(content_type: impl Into<String>, digest: Option<String>, length: Option<u64>) -> Self {
        Self {
            content_type: content_type.into(),
            payload: AttachmentPayload::Stub,
            digest,
            length,
            revpos: None,
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self.payload, AttachmentPayload::Stub)
    }

    /// Returns the inline bytes, or `None` for a stub.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.payload {
            AttachmentPayload::Inline(data) => Some(data),
            AttachmentPayload::Stub => None,
        }
    }

    /// Replaces the inline bytes. Digest and length describe the old bytes,
    /// so both are dropped and left for the store to recompute.
    pub fn replace_data(&mut self, data: Vec<u8>) {
        self.payload = AttachmentPayload::Inline(data);
        self.digest = None;
        self.length = None;
    }
}

/// Wire representation of an attachment.
#[derive(Serialize, Deserialize)]
struct RawAttachment {
    content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    stub: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    revpos: Option<u64>,
}

impl TryFrom<RawAttachment> for Attachment {
    type Error = TypesError;

    fn try_from(raw: RawAttachment) -> Result<Self, Self::Error> {
        let payload = match (raw.stub, raw.data) {
            (true, _) => AttachmentPayload::Stub,
            (false, Some(data)) => AttachmentPayload::Inline(STANDARD.decode(data)?),
            (false, None) => {
                return Err(TypesError::InvalidAttachment(
                    "attachment has neither data nor stub marker".to_string(),
                ));
            }
        };

        Ok(Self {
            content_type: raw.content_type,
            payload,
            digest: raw.digest,
            length: raw.length,
            revpos: raw.revpos,
        })
    }
}

impl From<Attachment> for RawAttachment {
    fn from(attachment: Attachment) -> Self {
        let (data, stub) = match attachment.payload {
            AttachmentPayload::Inline(bytes) => (Some(STANDARD.encode(bytes)), false),
            AttachmentPayload::Stub => (None, true),
        };

        Self {
            content_type: attachment.content_type,
            data,
            stub,
            digest: attachment.digest,
            length: attachment.length,
            revpos: attachment.revpos,
        }
    }
}
