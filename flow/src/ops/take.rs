// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `take(n)`: forward the first `n` items, then cancel upstream and
//! complete.

use crate::sources::empty;
use flow_core::{Flow, Subscriber, Subscription};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Forward the first `n` items from `upstream`, then cancel it and
/// complete. `n == 0` reduces to [`empty`] — `upstream` is never
/// subscribed at all, matching `empty()`'s own behavior rather than
/// subscribing and immediately cancelling.
///
/// # Panics
///
/// Panics if `n < 0`: a constraint violation raised synchronously at the
/// call site.
pub(crate) fn build<T>(upstream: Flow<T>, n: i64) -> Flow<T>
where
    T: Send + Sync + 'static,
{
    assert!(n >= 0, "take: n must be non-negative, got {n}");
    if n == 0 {
        return empty();
    }
    #[allow(clippy::cast_sign_loss)]
    let remaining = n as u64;
    upstream.lift(move |downstream: Arc<dyn Subscriber<T>>| {
        Arc::new(TakeSubscriber {
            downstream,
            remaining: AtomicU64::new(remaining),
            done: AtomicBool::new(false),
            upstream: Mutex::new(None),
        }) as Arc<dyn Subscriber<T>>
    })
}

struct TakeSubscriber<T> {
    downstream: Arc<dyn Subscriber<T>>,
    remaining: AtomicU64,
    done: AtomicBool,
    upstream: Mutex<Option<Arc<dyn Subscription>>>,
}

impl<T: Send + Sync + 'static> Subscriber<T> for TakeSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.upstream.lock() = Some(Arc::clone(&subscription));
        self.downstream.on_subscribe(subscription);
    }

    fn on_next(&self, value: T) {
        if self.done.load(Ordering::Acquire) {
            return;
        }
        self.downstream.on_next(value);
        let remaining_before = self.remaining.fetch_sub(1, Ordering::AcqRel);
        if remaining_before == 1 && !self.done.swap(true, Ordering::AcqRel) {
            if let Some(upstream) = self.upstream.lock().take() {
                upstream.cancel();
            }
            self.downstream.on_complete();
        }
    }

    fn on_error(&self, error: flow_core::FlowError) {
        if self.done.swap(true, Ordering::AcqRel) {
            return;
        }
        self.downstream.on_error(error);
    }

    fn on_complete(&self) {
        if self.done.swap(true, Ordering::AcqRel) {
            return;
        }
        self.downstream.on_complete();
    }
}
