//! Replicated documents.

use crate::attachment::Attachment;
use crate::error::TypesResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Field holding the encrypted body of a note, book or tag.
pub const ENCRYPTED_DATA_FIELD: &str = "encryptedData";

/// Field holding the cipher parameters of an encrypted file attachment.
pub const ENCRYPTION_DATA_FIELD: &str = "encryptionData";

/// Visibility marker of notes, books and tags.
pub const SHARE_FIELD: &str = "share";

/// Published contexts of a file; non-empty means the file is public.
pub const PUBLIC_IN_FIELD: &str = "publicIn";

/// Attachment slot carrying a file's bytes.
pub const FILE_ATTACHMENT_NAME: &str = "index";

pub type Fields = Map<String, Value>;
pub type Attachments = BTreeMap<String, Attachment>;

/// A document as exchanged with the replicated store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_attachments", default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Attachments>,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attachments: None,
            fields: Fields::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builder-style attachment setter.
    pub fn with_attachment(mut self, name: impl Into<String>, attachment: Attachment) -> Self {
        self.attachments
            .get_or_insert_with(Attachments::new)
            .insert(name.into(), attachment);
        self
    }

    pub fn from_json(json: &str) -> TypesResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> TypesResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The type namespace of the id: everything before the first `:`.
    pub fn id_prefix(&self) -> Option<&str> {
        self.id.split_once(':').map(|(prefix, _)| prefix)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn attachment(&self, name: &str) -> Option<&Attachment> {
        self.attachments.as_ref()?.get(name)
    }

    pub fn attachment_mut(&mut self, name: &str) -> Option<&mut Attachment> {
        self.attachments.as_mut()?.get_mut(name)
    }

    /// Visibility declared in the `share` field, if it holds a known value.
    pub fn visibility(&self) -> Option<Visibility> {
        self.field(SHARE_FIELD)
            .and_then(Value::as_str)
            .and_then(Visibility::parse)
    }

    /// Whether the `publicIn` field lists at least one published context.
    pub fn is_published(&self) -> bool {
        self.field(PUBLIC_IN_FIELD)
            .and_then(Value::as_array)
            .is_some_and(|contexts| !contexts.is_empty())
    }
}

/// Sharing level of a note, book or tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
    Writable,
}

impl Visibility {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "private" => Some(Self::Private),
            "public" => Some(Self::Public),
            "writable" => Some(Self::Writable),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
            Self::Writable => "writable",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
