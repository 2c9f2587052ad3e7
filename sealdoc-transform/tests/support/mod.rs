//! Shared helpers for transform integration tests.

#![allow(dead_code)]

use sealdoc_crypto::{AesGcmCipher, CryptoError, CryptoResult, DocumentCipher, EncryptionKey};
use sealdoc_transform::{
    DocumentHook, E2eeTransformer, HookError, TransformConfig, TransformErrorEvent,
    TransformErrorKind,
};
use sealdoc_types::{Attachment, Document, FILE_ATTACHMENT_NAME};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

static TRACING: Once = Once::new();

/// Installs a test subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A fresh key in its encoded form.
pub fn fresh_key() -> String {
    EncryptionKey::generate().expose_secret().to_string()
}

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

pub fn welcome_note() -> Document {
    Document::new("note:welcome")
        .with_field("title", "Welcome")
        .with_field("body", "# Hello\n\nFirst note.")
        .with_field("bookId", "book:inbox")
        .with_field("tags", json!(["tag:red"]))
}

pub fn png_file(id: &str) -> Document {
    Document::new(id)
        .with_field("name", "test.png")
        .with_field("contentType", "image/png")
        .with_field("contentLength", PNG_BYTES.len())
        .with_field("publicIn", json!([]))
        .with_attachment(
            FILE_ATTACHMENT_NAME,
            Attachment::inline("image/png", PNG_BYTES.to_vec()),
        )
}

/// Replaces every inline attachment with a stub, as a read without
/// attachment bodies returns it.
pub fn stub_attachments(doc: &Document) -> Document {
    let mut stubbed = doc.clone();
    if let Some(attachments) = stubbed.attachments.as_mut() {
        for slot in attachments.values_mut() {
            if !slot.is_stub() {
                let length = slot.data().map(|d| d.len() as u64);
                *slot = Attachment::stub(slot.content_type.clone(), Some("md5-test".into()), length);
            }
        }
    }
    stubbed
}

/// Wraps the AES-GCM capability and counts calls per operation.
#[derive(Default)]
pub struct CountingCipher {
    inner: AesGcmCipher,
    pub encrypt_documents: AtomicUsize,
    pub decrypt_documents: AtomicUsize,
    pub encrypt_files: AtomicUsize,
    pub decrypt_files: AtomicUsize,
}

impl CountingCipher {
    pub fn total(&self) -> usize {
        self.encrypt_documents.load(Ordering::SeqCst)
            + self.decrypt_documents.load(Ordering::SeqCst)
            + self.encrypt_files.load(Ordering::SeqCst)
            + self.decrypt_files.load(Ordering::SeqCst)
    }
}

impl DocumentCipher for CountingCipher {
    fn encrypt_document(&self, key: &EncryptionKey, doc: &Document) -> CryptoResult<Document> {
        self.encrypt_documents.fetch_add(1, Ordering::SeqCst);
        self.inner.encrypt_document(key, doc)
    }

    fn decrypt_document(&self, key: &EncryptionKey, doc: &Document) -> CryptoResult<Document> {
        self.decrypt_documents.fetch_add(1, Ordering::SeqCst);
        self.inner.decrypt_document(key, doc)
    }

    fn encrypt_attachment_set(
        &self,
        key: &EncryptionKey,
        doc: &Document,
    ) -> CryptoResult<Document> {
        self.encrypt_files.fetch_add(1, Ordering::SeqCst);
        self.inner.encrypt_attachment_set(key, doc)
    }

    fn decrypt_attachment_set(
        &self,
        key: &EncryptionKey,
        doc: &Document,
    ) -> CryptoResult<Document> {
        self.decrypt_files.fetch_add(1, Ordering::SeqCst);
        self.inner.decrypt_attachment_set(key, doc)
    }
}

/// Capability that fails every call.
pub struct FailingCipher;

impl DocumentCipher for FailingCipher {
    fn encrypt_document(&self, _: &EncryptionKey, _: &Document) -> CryptoResult<Document> {
        Err(CryptoError::Encryption("forced failure".into()))
    }

    fn decrypt_document(&self, _: &EncryptionKey, _: &Document) -> CryptoResult<Document> {
        Err(CryptoError::Decryption("forced failure".into()))
    }

    fn encrypt_attachment_set(&self, _: &EncryptionKey, _: &Document) -> CryptoResult<Document> {
        Err(CryptoError::Encryption("forced failure".into()))
    }

    fn decrypt_attachment_set(&self, _: &EncryptionKey, _: &Document) -> CryptoResult<Document> {
        Err(CryptoError::Decryption("forced failure".into()))
    }
}

/// Transformer over a counting capability with a key already set.
pub fn keyed_transformer() -> (E2eeTransformer, Arc<CountingCipher>) {
    keyed_transformer_with(TransformConfig::default())
}

pub fn keyed_transformer_with(config: TransformConfig) -> (E2eeTransformer, Arc<CountingCipher>) {
    init_tracing();
    let cipher = Arc::new(CountingCipher::default());
    let transformer = E2eeTransformer::with_config(cipher.clone(), config);
    transformer.set_key(&fresh_key()).unwrap();
    (transformer, cipher)
}

/// Event data captured from an error stream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub kind: TransformErrorKind,
    pub message: String,
    pub doc_id: String,
    pub document: Document,
}

/// Subscribes to both streams and records every event.
pub fn capture_errors(transformer: &E2eeTransformer) -> Arc<Mutex<Vec<Captured>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    for kind in [TransformErrorKind::Encryption, TransformErrorKind::Decryption] {
        let sink = Arc::clone(&log);
        transformer
            .errors()
            .subscribe(kind, move |event: &TransformErrorEvent<'_>| {
                sink.lock().unwrap().push(Captured {
                    kind: event.kind,
                    message: event.error.to_string(),
                    doc_id: event.document.id.clone(),
                    document: event.document.clone(),
                });
            });
    }
    log
}

/// Caller hook counting invocations, optionally failing.
#[derive(Default)]
pub struct RecordingHook {
    pub incoming_calls: AtomicUsize,
    pub outgoing_calls: AtomicUsize,
    pub fail: bool,
}

impl RecordingHook {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl DocumentHook for RecordingHook {
    fn incoming(&self, doc: Document) -> Result<Document, HookError> {
        self.incoming_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err("rejected by caller".into());
        }
        Ok(doc.with_field("stampedOut", true))
    }

    fn outgoing(&self, doc: Document) -> Result<Document, HookError> {
        self.outgoing_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err("rejected by caller".into());
        }
        Ok(doc.with_field("stampedIn", true))
    }
}

/// In-memory document store with an optional transform hook.
///
/// `put` runs the hook's `incoming` before storing, reads run `outgoing`.
/// Views created with [`MemoryStore::view`] share storage, the way several
/// clients see one remote database.
#[derive(Default)]
pub struct MemoryStore {
    docs: Arc<Mutex<BTreeMap<String, Document>>>,
    hook: Option<Arc<dyn DocumentHook>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hook(hook: Arc<dyn DocumentHook>) -> Self {
        Self {
            docs: Arc::default(),
            hook: Some(hook),
        }
    }

    /// Another client of the same storage, reading and writing through `hook`.
    pub fn view(&self, hook: Arc<dyn DocumentHook>) -> Self {
        Self {
            docs: Arc::clone(&self.docs),
            hook: Some(hook),
        }
    }

    pub fn put(&self, doc: Document) -> Result<(), HookError> {
        let doc = match &self.hook {
            Some(hook) => hook.incoming(doc)?,
            None => doc,
        };
        self.docs.lock().unwrap().insert(doc.id.clone(), doc);
        Ok(())
    }

    /// Read with attachment bodies.
    pub fn get(&self, id: &str) -> Result<Option<Document>, HookError> {
        self.read(self.raw(id))
    }

    /// Read with attachments as stubs.
    pub fn get_meta(&self, id: &str) -> Result<Option<Document>, HookError> {
        self.read(self.raw(id).map(|doc| stub_attachments(&doc)))
    }

    /// Stored form, bypassing the hook.
    pub fn raw(&self, id: &str) -> Option<Document> {
        self.docs.lock().unwrap().get(id).cloned()
    }

    pub fn ids(&self) -> Vec<String> {
        self.docs.lock().unwrap().keys().cloned().collect()
    }

    fn read(&self, doc: Option<Document>) -> Result<Option<Document>, HookError> {
        match (doc, &self.hook) {
            (Some(doc), Some(hook)) => hook.outgoing(doc).map(Some),
            (doc, _) => Ok(doc),
        }
    }
}

/// Copies every document from `source` into `target`.
///
/// Bodies are read through the source hook with attachments stubbed; the
/// attachment bytes are then fetched raw and attached, the way replication
/// transfers them separately.
pub fn replicate(source: &MemoryStore, target: &MemoryStore) -> Result<(), HookError> {
    for id in source.ids() {
        let Some(mut doc) = source.get_meta(&id)? else {
            continue;
        };
        if let Some(raw) = source.raw(&id) {
            doc.attachments = raw.attachments;
        }
        target.put(doc)?;
    }
    Ok(())
}
