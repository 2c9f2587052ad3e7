//! Hooks between the local replica and the untrusted remote store.

use crate::classifier::{Classification, DocumentKind, has_materialized_file};
use crate::error::{FailureCause, HookError, TransformError, TransformErrorKind, TransformResult};
use crate::hook::DocumentHook;
use crate::transformer::Shared;
use sealdoc_crypto::EncryptionKey;
use sealdoc_types::Document;
use std::sync::Arc;
use tracing::debug;

const OUTWARD: TransformErrorKind = TransformErrorKind::Encryption;
const INWARD: TransformErrorKind = TransformErrorKind::Decryption;

#[derive(Clone)]
pub struct RemoteTransformer {
    shared: Arc<Shared>,
    custom: Option<Arc<dyn DocumentHook>>,
}

impl RemoteTransformer {
    pub(crate) fn new(shared: Arc<Shared>, custom: Option<Arc<dyn DocumentHook>>) -> Self {
        Self { shared, custom }
    }

    /// Outward: seals a document on its way to the remote store.
    pub fn incoming(&self, doc: Document) -> TransformResult<Document> {
        let Some(key) = self.shared.key_gate.get_key() else {
            return Err(self.shared.fail(OUTWARD, TransformError::missing_key(OUTWARD), &doc));
        };

        let doc = match &self.custom {
            Some(custom) => {
                let input = doc.clone();
                custom.incoming(doc).map_err(|e| {
                    let err = TransformError::Encryption(FailureCause::Hook(e));
                    self.shared.fail(OUTWARD, err, &input)
                })?
            }
            None => doc,
        };

        self.seal(&key, doc)
    }

    fn seal(&self, key: &EncryptionKey, doc: Document) -> TransformResult<Document> {
        let class = Classification::of(&doc);
        if !class.needs_encryption() {
            if class.is_public {
                debug!(doc_id = %doc.id, "public document, sending in cleartext");
            }
            return Ok(doc);
        }

        let cipher = &self.shared.cipher;
        let sealed = if class.kind == DocumentKind::File {
            debug!(doc_id = %doc.id, "encrypting file attachment");
            cipher.encrypt_attachment_set(key, &doc)
        } else {
            debug!(doc_id = %doc.id, "encrypting document");
            cipher.encrypt_document(key, &doc)
        };
        sealed.map_err(|e| self.shared.fail(OUTWARD, TransformError::Encryption(e.into()), &doc))
    }

    /// Inward: opens a document read back from the remote store.
    pub fn outgoing(&self, doc: Document) -> TransformResult<Document> {
        let Some(key) = self.shared.key_gate.get_key() else {
            return Err(self.shared.fail(INWARD, TransformError::missing_key(INWARD), &doc));
        };

        let Some(custom) = &self.custom else {
            return self.open(&key, doc);
        };

        // Caller-hook failures report the document as read from the remote
        // store, never its decrypted form.
        let input = doc.clone();
        let opened = self.open(&key, doc)?;
        custom.outgoing(opened).map_err(|e| {
            let err = TransformError::Decryption(FailureCause::Hook(e));
            self.shared.fail(INWARD, err, &input)
        })
    }

    fn open(&self, key: &EncryptionKey, doc: Document) -> TransformResult<Document> {
        let cipher = &self.shared.cipher;
        let opened = match DocumentKind::from_id(&doc.id) {
            DocumentKind::File if has_materialized_file(&doc) => {
                debug!(doc_id = %doc.id, "decrypting file attachment");
                cipher.decrypt_attachment_set(key, &doc)
            }
            DocumentKind::File => return Ok(doc),
            DocumentKind::Note | DocumentKind::Book | DocumentKind::Tag => {
                debug!(doc_id = %doc.id, "decrypting document");
                cipher.decrypt_document(key, &doc)
            }
            DocumentKind::Opaque => return Ok(doc),
        };
        opened.map_err(|e| self.shared.fail(INWARD, TransformError::Decryption(e.into()), &doc))
    }
}

impl DocumentHook for RemoteTransformer {
    fn incoming(&self, doc: Document) -> Result<Document, HookError> {
        Ok(RemoteTransformer::incoming(self, doc)?)
    }

    fn outgoing(&self, doc: Document) -> Result<Document, HookError> {
        Ok(RemoteTransformer::outgoing(self, doc)?)
    }
}
