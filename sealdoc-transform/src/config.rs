//! Transform configuration.

use crate::error::{TransformError, TransformResult};
use serde::{Deserialize, Serialize};

/// Which documents the local-cache hook decrypts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalScope {
    /// Only file attachments. Note, book and tag bodies are expected to arrive
    /// already decrypted by the remote store's inward hook.
    #[default]
    FilesOnly,
    /// File attachments plus any note, book or tag still carrying an envelope.
    /// For hosts whose replication path writes remote documents into the local
    /// cache without running the inward hook first.
    FilesAndDocuments,
}

/// Configuration for an [`E2eeTransformer`](crate::E2eeTransformer).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub local_scope: LocalScope,
}

impl TransformConfig {
    /// Parses host-provided settings. Missing keys take their defaults.
    pub fn from_json(json: &str) -> TransformResult<Self> {
        serde_json::from_str(json).map_err(|e| TransformError::Config(e.to_string()))
    }
}
