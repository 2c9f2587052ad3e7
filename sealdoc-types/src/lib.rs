//! Document model shared by the sealdoc crates.
//!
//! Mirrors the JSON shape of the replication protocol the transform layer sits
//! on top of: `_id` carries the namespaced document id, `_attachments` the
//! binary slots, and every other key (including `_rev` and `_deleted`) is kept
//! as an opaque field so replication metadata survives any transform.

mod attachment;
mod document;
mod error;

pub use attachment::{Attachment, AttachmentPayload};
pub use document::{
    Attachments, Document, Fields, Visibility, ENCRYPTED_DATA_FIELD, ENCRYPTION_DATA_FIELD,
    FILE_ATTACHMENT_NAME, PUBLIC_IN_FIELD, SHARE_FIELD,
};
pub use error::{TypesError, TypesResult};
