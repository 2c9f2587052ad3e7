mod support;

use sealdoc_transform::{ErrorChannel, TransformError, TransformErrorEvent, TransformErrorKind};
use sealdoc_types::Document;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use support::{capture_errors, welcome_note};

fn emit_decryption(channel: &ErrorChannel) {
    let err = TransformError::Decryption(sealdoc_transform::FailureCause::MissingKey);
    channel.emit(
        TransformErrorKind::Decryption,
        &err,
        &Document::new("note:x"),
    );
}

#[test]
fn subscribers_run_in_registration_order() {
    let channel = ErrorChannel::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    for n in 0..4 {
        let order = Arc::clone(&order);
        channel.on_decryption_error(move |_: &TransformErrorEvent<'_>| {
            order.lock().unwrap().push(n)
        });
    }

    emit_decryption(&channel);
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn streams_are_separate() {
    let channel = ErrorChannel::new();
    let enc = Arc::new(AtomicUsize::new(0));
    let dec = Arc::new(AtomicUsize::new(0));
    let e = Arc::clone(&enc);
    channel.on_encryption_error(move |_: &TransformErrorEvent<'_>| {
        e.fetch_add(1, Ordering::SeqCst);
    });
    let d = Arc::clone(&dec);
    channel.on_decryption_error(move |_: &TransformErrorEvent<'_>| {
        d.fetch_add(1, Ordering::SeqCst);
    });

    emit_decryption(&channel);
    assert_eq!(enc.load(Ordering::SeqCst), 0);
    assert_eq!(dec.load(Ordering::SeqCst), 1);
}

#[test]
fn disposed_subscription_stops_receiving() {
    let channel = ErrorChannel::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    let sub = channel.on_decryption_error(move |_: &TransformErrorEvent<'_>| {
        h.fetch_add(1, Ordering::SeqCst);
    });

    emit_decryption(&channel);
    assert!(sub.is_active());
    sub.dispose();
    sub.dispose();
    assert!(!sub.is_active());
    emit_decryption(&channel);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(channel.subscriber_count(TransformErrorKind::Decryption), 0);
}

#[test]
fn dropping_the_handle_keeps_the_subscription() {
    let channel = ErrorChannel::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    drop(channel.on_decryption_error(move |_: &TransformErrorEvent<'_>| {
        h.fetch_add(1, Ordering::SeqCst);
    }));

    emit_decryption(&channel);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn panicking_subscriber_does_not_stop_others() {
    support::init_tracing();
    let channel = ErrorChannel::new();
    let hits = Arc::new(AtomicUsize::new(0));
    channel.on_decryption_error(|_: &TransformErrorEvent<'_>| panic!("subscriber bug"));
    let h = Arc::clone(&hits);
    channel.on_decryption_error(move |_: &TransformErrorEvent<'_>| {
        h.fetch_add(1, Ordering::SeqCst);
    });

    emit_decryption(&channel);
    emit_decryption(&channel);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn subscriber_may_dispose_itself_during_emit() {
    let channel = ErrorChannel::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let slot: Arc<Mutex<Option<sealdoc_transform::Subscription>>> = Arc::default();

    let h = Arc::clone(&hits);
    let s = Arc::clone(&slot);
    let sub = channel.on_decryption_error(move |_: &TransformErrorEvent<'_>| {
        h.fetch_add(1, Ordering::SeqCst);
        if let Some(sub) = s.lock().unwrap().as_ref() {
            sub.dispose();
        }
    });
    *slot.lock().unwrap() = Some(sub);

    emit_decryption(&channel);
    emit_decryption(&channel);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn subscriber_may_subscribe_during_emit() {
    let channel = ErrorChannel::new();
    let added = Arc::new(AtomicUsize::new(0));
    let c = channel.clone();
    let a = Arc::clone(&added);
    channel.on_decryption_error(move |_: &TransformErrorEvent<'_>| {
        if a.fetch_add(1, Ordering::SeqCst) == 0 {
            c.on_decryption_error(|_: &TransformErrorEvent<'_>| {});
        }
    });

    emit_decryption(&channel);
    assert_eq!(channel.subscriber_count(TransformErrorKind::Decryption), 2);
}

#[test]
fn subscriber_cannot_suppress_the_error() {
    let (transformer, _) = support::keyed_transformer();
    transformer.on_encryption_error(|_: &TransformErrorEvent<'_>| panic!("swallow attempt"));
    let events = capture_errors(&transformer);
    transformer.clear_key();

    let result = transformer.remote_transformer().incoming(welcome_note());
    assert!(result.unwrap_err().is_missing_key());
    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn transformer_clones_share_streams() {
    let (transformer, _) = support::keyed_transformer();
    let events = capture_errors(&transformer);
    let clone = transformer.clone();
    clone.clear_key();

    assert!(clone.remote_transformer().outgoing(welcome_note()).is_err());
    assert_eq!(events.lock().unwrap().len(), 1);
    assert!(!transformer.has_key());
}
