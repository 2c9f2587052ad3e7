//! Session key holder.
//!
//! The key is stored as an immutable `Arc` and replaced wholesale under a
//! write lock, so a reader always sees either the previous key or the new
//! one, never a mix. Transform calls clone the `Arc` and release the lock
//! before doing any crypto work.

use crate::error::{TransformError, TransformResult};
use sealdoc_crypto::EncryptionKey;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

#[derive(Default)]
pub struct KeyGate {
    key: RwLock<Option<Arc<EncryptionKey>>>,
}

impl KeyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and installs an encoded key.
    ///
    /// On a format mismatch the previously active key, if any, stays active.
    pub fn set_key(&self, key: &str) -> TransformResult<()> {
        let parsed = EncryptionKey::parse(key).map_err(|_| {
            warn!("rejected encryption key with invalid format");
            TransformError::InvalidKeyFormat
        })?;
        self.install(parsed);
        Ok(())
    }

    /// Installs an already-validated key.
    pub fn install(&self, key: EncryptionKey) {
        *self.key.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(key));
        debug!("encryption key installed");
    }

    pub fn get_key(&self) -> Option<Arc<EncryptionKey>> {
        self.key.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn has_key(&self) -> bool {
        self.key.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Drops the active key; transforms fail with a missing-key error until
    /// a new one is set.
    pub fn clear(&self) {
        self.key.write().unwrap_or_else(PoisonError::into_inner).take();
        debug!("encryption key cleared");
    }
}

impl std::fmt::Debug for KeyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyGate")
            .field("has_key", &self.has_key())
            .finish()
    }
}
