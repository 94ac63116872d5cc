// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `fromStream(st)`: a single-use iterator source.
//!
//! Unlike [`crate::sources::from_iterable`], which re-creates an
//! iterator per subscription from a `Clone` source, `from_stream` wraps
//! an iterator that is itself the one-shot resource — a generator,
//! channel receiver, or similar non-`Iterable` stream. A second
//! subscription must be rejected rather than silently re-driving an
//! already-exhausted iterator.

use crate::sources::iter_drain::drive_iterator;
use flow_core::{Flow, FlowError, NoopSubscription, Subscriber};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Emit every item `iter` yields, honoring demand, exactly once across
/// the lifetime of the returned `Flow`. A second `subscribe` call
/// receives `onSubscribe` (invariant 1 always holds) followed
/// immediately by a constraint-kind `onError`.
pub fn from_stream<I>(iter: I) -> Flow<I::Item>
where
    I: Iterator + Send + 'static,
    I::Item: Send + Sync + 'static,
{
    let used = Arc::new(AtomicBool::new(false));
    let slot = Arc::new(Mutex::new(Some(iter)));
    Flow::create(move |subscriber: Arc<dyn Subscriber<I::Item>>| {
        if used.swap(true, Ordering::AcqRel) {
            subscriber.on_subscribe(Arc::new(NoopSubscription));
            subscriber.on_error(FlowError::constraint(
                "from_stream: source already subscribed once; streams are single-use",
            ));
            return;
        }
        let iter = slot
            .lock()
            .take()
            .expect("single-use guard ensures the iterator is taken exactly once");
        drive_iterator(iter, subscriber);
    })
}
