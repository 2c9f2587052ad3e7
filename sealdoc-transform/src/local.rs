//! Hook for documents materialized into the local cache.
//!
//! Replication fetches attachment bytes separately from the document body,
//! so a file arrives here with its `index` bytes still sealed even when the
//! inward remote hook saw only a stub.

use crate::classifier::{DocumentKind, has_materialized_file};
use crate::config::LocalScope;
use crate::error::{HookError, TransformError, TransformErrorKind, TransformResult};
use crate::hook::DocumentHook;
use crate::transformer::Shared;
use sealdoc_types::Document;
use std::sync::Arc;
use tracing::debug;

// Local failures are published on the decryption stream, including the
// missing-key error, which is reported as an encryption error.
const STREAM: TransformErrorKind = TransformErrorKind::Decryption;

#[derive(Clone)]
pub struct LocalTransformer {
    shared: Arc<Shared>,
}

impl LocalTransformer {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    pub fn incoming(&self, doc: Document) -> TransformResult<Document> {
        let Some(key) = self.shared.key_gate.get_key() else {
            let err = TransformError::missing_key(TransformErrorKind::Encryption);
            return Err(self.shared.fail(STREAM, err, &doc));
        };

        let cipher = &self.shared.cipher;
        let opened = match DocumentKind::from_id(&doc.id) {
            DocumentKind::File if has_materialized_file(&doc) => {
                debug!(doc_id = %doc.id, "decrypting cached file attachment");
                cipher.decrypt_attachment_set(&key, &doc)
            }
            DocumentKind::File => return Ok(doc),
            kind if kind.has_sealed_body()
                && self.shared.config.local_scope == LocalScope::FilesAndDocuments =>
            {
                debug!(doc_id = %doc.id, "decrypting cached document");
                cipher.decrypt_document(&key, &doc)
            }
            _ => return Ok(doc),
        };
        opened.map_err(|e| self.shared.fail(STREAM, TransformError::Decryption(e.into()), &doc))
    }
}

impl DocumentHook for LocalTransformer {
    fn incoming(&self, doc: Document) -> Result<Document, HookError> {
        Ok(LocalTransformer::incoming(self, doc)?)
    }
}
