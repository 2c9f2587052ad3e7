//! The session-scoped transformer that owns the key and hands out hooks.

use crate::config::TransformConfig;
use crate::error::{TransformError, TransformErrorKind, TransformResult};
use crate::error_channel::{ErrorChannel, Subscription, TransformErrorEvent};
use crate::hook::DocumentHook;
use crate::key_gate::KeyGate;
use crate::local::LocalTransformer;
use crate::remote::RemoteTransformer;
use sealdoc_crypto::{AesGcmCipher, DocumentCipher, EncryptionKey};
use sealdoc_types::Document;
use std::sync::Arc;
use tracing::error;

/// State shared by a transformer and every hook it creates.
pub(crate) struct Shared {
    pub(crate) cipher: Arc<dyn DocumentCipher>,
    pub(crate) key_gate: KeyGate,
    pub(crate) errors: ErrorChannel,
    pub(crate) config: TransformConfig,
}

impl Shared {
    /// Logs and publishes a failure, then hands it back for returning.
    pub(crate) fn fail(
        &self,
        stream: TransformErrorKind,
        err: TransformError,
        document: &Document,
    ) -> TransformError {
        error!(doc_id = %document.id, stream = %stream, "{err}");
        self.errors.emit(stream, &err, document);
        err
    }
}

/// Selective end-to-end encryption for a replicated document store.
///
/// Cloning is cheap; clones share the key, the error streams and the
/// crypto capability.
#[derive(Clone)]
pub struct E2eeTransformer {
    shared: Arc<Shared>,
}

impl E2eeTransformer {
    pub fn new(cipher: Arc<dyn DocumentCipher>) -> Self {
        Self::with_config(cipher, TransformConfig::default())
    }

    pub fn with_config(cipher: Arc<dyn DocumentCipher>, config: TransformConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                cipher,
                key_gate: KeyGate::new(),
                errors: ErrorChannel::new(),
                config,
            }),
        }
    }

    /// A transformer using the default AES-256-GCM capability.
    pub fn aes_gcm() -> Self {
        Self::new(Arc::new(AesGcmCipher::new()))
    }

    /// Validates and installs the session key. A rejected key leaves the
    /// previous one active.
    pub fn set_key(&self, key: &str) -> TransformResult<()> {
        self.shared.key_gate.set_key(key)
    }

    pub fn set_encryption_key(&self, key: EncryptionKey) {
        self.shared.key_gate.install(key);
    }

    pub fn has_key(&self) -> bool {
        self.shared.key_gate.has_key()
    }

    pub fn clear_key(&self) {
        self.shared.key_gate.clear();
    }

    pub fn config(&self) -> &TransformConfig {
        &self.shared.config
    }

    /// Hook pair for the remote store: encrypts outward, decrypts inward.
    pub fn remote_transformer(&self) -> RemoteTransformer {
        RemoteTransformer::new(Arc::clone(&self.shared), None)
    }

    /// Like [`remote_transformer`](Self::remote_transformer), with a caller hook
    /// run before encryption on the way out and after decryption on the way in.
    pub fn remote_transformer_with(&self, custom: Arc<dyn DocumentHook>) -> RemoteTransformer {
        RemoteTransformer::new(Arc::clone(&self.shared), Some(custom))
    }

    /// Hook for the local cache: decrypts file attachments fetched raw.
    pub fn local_transformer(&self) -> LocalTransformer {
        LocalTransformer::new(Arc::clone(&self.shared))
    }

    pub fn errors(&self) -> &ErrorChannel {
        &self.shared.errors
    }

    pub fn on_encryption_error<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&TransformErrorEvent<'_>) + Send + Sync + 'static,
    {
        self.shared.errors.on_encryption_error(callback)
    }

    pub fn on_decryption_error<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&TransformErrorEvent<'_>) + Send + Sync + 'static,
    {
        self.shared.errors.on_decryption_error(callback)
    }
}

impl std::fmt::Debug for E2eeTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("E2eeTransformer")
            .field("key_gate", &self.shared.key_gate)
            .field("errors", &self.shared.errors)
            .field("config", &self.shared.config)
            .finish()
    }
}
