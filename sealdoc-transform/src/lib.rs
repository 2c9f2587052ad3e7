//! Selective end-to-end encryption hooks for a replicated document store.
//!
//! An [`E2eeTransformer`] holds the session key and produces two hooks:
//!
//! - [`RemoteTransformer`]: encrypts private notes, books, tags and file
//!   attachments before they reach the remote store, and decrypts them on
//!   the way back.
//! - [`LocalTransformer`]: decrypts file attachment bytes that replication
//!   wrote into the local cache still sealed.
//!
//! Public documents and ids outside the known prefixes pass through
//! untouched. Every failure is published on an [`ErrorChannel`] stream and
//! then returned to the caller.

mod classifier;
mod config;
mod error;
mod error_channel;
mod hook;
mod key_gate;
mod local;
mod remote;
mod transformer;

pub use classifier::{Classification, DocumentKind, classify};
pub use config::{LocalScope, TransformConfig};
pub use error::{FailureCause, HookError, TransformError, TransformErrorKind, TransformResult};
pub use error_channel::{ErrorChannel, Subscription, TransformErrorEvent};
pub use hook::DocumentHook;
pub use key_gate::KeyGate;
pub use local::LocalTransformer;
pub use remote::RemoteTransformer;
pub use transformer::E2eeTransformer;
