//! Observer streams for transform failures.
//!
//! Subscribers are notified before the failing hook returns its error. They
//! observe; they cannot recover or suppress the failure.

use crate::error::{TransformError, TransformErrorKind};
use sealdoc_types::Document;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tracing::warn;

/// A failure as delivered to subscribers.
#[derive(Debug, Clone, Copy)]
pub struct TransformErrorEvent<'a> {
    pub kind: TransformErrorKind,
    pub error: &'a TransformError,
    /// The document handed to the step that failed.
    pub document: &'a Document,
}

type Callback = Arc<dyn Fn(&TransformErrorEvent<'_>) + Send + Sync>;

struct Listener {
    id: u64,
    kind: TransformErrorKind,
    callback: Callback,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<Listener>,
}

/// Encryption and decryption failure streams.
#[derive(Clone, Default)]
pub struct ErrorChannel {
    listeners: Arc<Mutex<Listeners>>,
}

impl ErrorChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, kind: TransformErrorKind, callback: F) -> Subscription
    where
        F: Fn(&TransformErrorEvent<'_>) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push(Listener {
            id,
            kind,
            callback: Arc::new(callback),
        });
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn on_encryption_error<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&TransformErrorEvent<'_>) + Send + Sync + 'static,
    {
        self.subscribe(TransformErrorKind::Encryption, callback)
    }

    pub fn on_decryption_error<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&TransformErrorEvent<'_>) + Send + Sync + 'static,
    {
        self.subscribe(TransformErrorKind::Decryption, callback)
    }

    /// Notifies every live subscriber of `kind`, in registration order.
    ///
    /// Callbacks run outside the lock, so they may subscribe or dispose.
    /// A panicking callback is logged and skipped.
    pub fn emit(&self, kind: TransformErrorKind, error: &TransformError, document: &Document) {
        let callbacks: Vec<Callback> = {
            let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            listeners
                .entries
                .iter()
                .filter(|l| l.kind == kind)
                .map(|l| Arc::clone(&l.callback))
                .collect()
        };

        let event = TransformErrorEvent {
            kind,
            error,
            document,
        };
        for callback in callbacks {
            if panic::catch_unwind(AssertUnwindSafe(|| callback(&event))).is_err() {
                warn!(kind = %kind, doc_id = %document.id, "error subscriber panicked");
            }
        }
    }

    pub fn subscriber_count(&self, kind: TransformErrorKind) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .filter(|l| l.kind == kind)
            .count()
    }
}

impl std::fmt::Debug for ErrorChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorChannel")
            .field("encryption", &self.subscriber_count(TransformErrorKind::Encryption))
            .field("decryption", &self.subscriber_count(TransformErrorKind::Decryption))
            .finish()
    }
}

/// Handle for one registered callback.
///
/// Dropping the handle keeps the callback registered; call [`dispose`](Self::dispose)
/// to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Removes the callback. Calling it again is a no-op.
    pub fn dispose(&self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .retain(|l| l.id != self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.listeners.upgrade().is_some_and(|listeners| {
            listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .iter()
                .any(|l| l.id == self.id)
        })
    }
}
