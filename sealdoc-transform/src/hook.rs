//! Hook contract shared with the host's sync pipeline.

use crate::error::HookError;
use sealdoc_types::Document;
use std::sync::Arc;

/// A document transform applied by the sync engine.
///
/// `incoming` runs before a document is persisted, `outgoing` after it is
/// read back. Both default to identity so a hook may implement only one side.
pub trait DocumentHook: Send + Sync {
    fn incoming(&self, doc: Document) -> Result<Document, HookError> {
        Ok(doc)
    }

    fn outgoing(&self, doc: Document) -> Result<Document, HookError> {
        Ok(doc)
    }
}

impl<T: DocumentHook + ?Sized> DocumentHook for Arc<T> {
    fn incoming(&self, doc: Document) -> Result<Document, HookError> {
        (**self).incoming(doc)
    }

    fn outgoing(&self, doc: Document) -> Result<Document, HookError> {
        (**self).outgoing(doc)
    }
}
