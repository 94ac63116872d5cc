// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The guard [`Flow::safe_subscribe`](crate::Flow::safe_subscribe) wraps
//! subscribers in before attaching them.

use crate::error::FlowError;
use crate::subscriber::Subscriber;
use crate::subscription::Subscription;
use parking_lot::Mutex;
use std::sync::Arc;

struct SafeState {
    subscribed: bool,
    terminated: bool,
}

/// Wraps a [`Subscriber`] so that:
///
/// - signals are serialized — no two signals reach the inner subscriber
///   concurrently, enforced by holding a single lock for the duration of
///   each signal;
/// - the terminal signal is idempotent — at most one of `on_error`/
///   `on_complete` ever reaches the inner subscriber, and nothing
///   reaches it after either;
/// - `on_subscribe` is delivered at most once, even if the upstream
///   violates the protocol and calls it twice.
///
/// This is the wrapping [`Flow::subscribe`](crate::Flow::subscribe)
/// deliberately omits, to keep the raw protocol observable for
/// conformance testing; [`Flow::safe_subscribe`](crate::Flow::safe_subscribe)
/// is the guarded alternative.
pub struct SafeSubscriber<T> {
    inner: Arc<dyn Subscriber<T>>,
    state: Mutex<SafeState>,
}

impl<T: 'static> SafeSubscriber<T> {
    /// Wrap `inner` in the serialization/idempotence guard.
    pub fn new(inner: impl Subscriber<T> + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
            state: Mutex::new(SafeState {
                subscribed: false,
                terminated: false,
            }),
        }
    }
}

impl<T: 'static> Subscriber<T> for SafeSubscriber<T> {
    // Each method holds `state` for the full duration of the dispatch to
    // `inner`, which is what actually serializes signals rather than just
    // the bookkeeping flags. A subscriber that synchronously re-enters
    // its own subscription from inside one of these callbacks (e.g. by
    // calling `request` which synchronously drives another `on_next`)
    // will deadlock on this non-reentrant lock; operators prone to that
    // pattern use the trampoline in `crate::trampoline` instead.
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        let mut state = self.state.lock();
        if state.subscribed || state.terminated {
            return;
        }
        state.subscribed = true;
        self.inner.on_subscribe(subscription);
    }

    fn on_next(&self, value: T) {
        let state = self.state.lock();
        if state.terminated {
            return;
        }
        self.inner.on_next(value);
    }

    fn on_error(&self, error: FlowError) {
        let mut state = self.state.lock();
        if state.terminated {
            return;
        }
        state.terminated = true;
        self.inner.on_error(error);
    }

    fn on_complete(&self) {
        let mut state = self.state.lock();
        if state.terminated {
            return;
        }
        state.terminated = true;
        self.inner.on_complete();
    }
}
