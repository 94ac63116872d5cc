// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `skipUntil(other)`: drop items from `upstream` until
//! `other` emits anything (or terminates), then pass through
//! unconditionally.

use flow_core::{Flow, FlowError, Publisher, Subscriber, Subscription, UNBOUNDED};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Subscribe to `other` with unbounded demand alongside `upstream`; once
/// `other` signals anything at all — an item, an error, or completion —
/// the gate opens and every subsequent upstream item passes through.
/// Items arriving before the gate opens are dropped, not buffered.
pub(crate) fn build<T, U>(upstream: Flow<T>, other: Flow<U>) -> Flow<T>
where
    T: Send + Sync + 'static,
    U: Send + Sync + 'static,
{
    Flow::create(move |downstream: Arc<dyn Subscriber<T>>| {
        let state = Arc::new(SkipUntilState {
            downstream,
            open: AtomicBool::new(false),
            done: AtomicBool::new(false),
            upstream_sub: Mutex::new(None),
            other_sub: Mutex::new(None),
        });
        other.subscribe_publisher(Arc::new(GateSubscriber {
            state: Arc::clone(&state),
            _marker: std::marker::PhantomData,
        }));
        upstream.subscribe_publisher(Arc::new(MainSubscriber {
            state: Arc::clone(&state),
        }));
    })
}

struct SkipUntilState<T> {
    downstream: Arc<dyn Subscriber<T>>,
    open: AtomicBool,
    done: AtomicBool,
    upstream_sub: Mutex<Option<Arc<dyn Subscription>>>,
    other_sub: Mutex<Option<Arc<dyn Subscription>>>,
}

struct MainSubscriber<T> {
    state: Arc<SkipUntilState<T>>,
}

impl<T: Send + Sync + 'static> Subscriber<T> for MainSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.state.upstream_sub.lock() = Some(Arc::clone(&subscription));
        self.state.downstream.on_subscribe(Arc::new(SkipUntilSubscription {
            state: Arc::clone(&self.state),
        }));
    }

    fn on_next(&self, value: T) {
        if self.state.done.load(Ordering::Acquire) {
            return;
        }
        if self.state.open.load(Ordering::Acquire) {
            self.state.downstream.on_next(value);
        }
    }

    fn on_error(&self, error: FlowError) {
        if self.state.done.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(sub) = self.state.other_sub.lock().take() {
            sub.cancel();
        }
        self.state.downstream.on_error(error);
    }

    fn on_complete(&self) {
        if self.state.done.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(sub) = self.state.other_sub.lock().take() {
            sub.cancel();
        }
        self.state.downstream.on_complete();
    }
}

struct GateSubscriber<T, U> {
    state: Arc<SkipUntilState<T>>,
    _marker: std::marker::PhantomData<U>,
}

impl<T: Send + Sync + 'static, U: Send + Sync + 'static> Subscriber<U> for GateSubscriber<T, U> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.state.other_sub.lock() = Some(Arc::clone(&subscription));
        subscription.request(UNBOUNDED);
    }

    fn on_next(&self, _value: U) {
        self.open();
    }

    fn on_error(&self, _error: FlowError) {
        self.open();
    }

    fn on_complete(&self) {
        self.open();
    }
}

impl<T, U> GateSubscriber<T, U> {
    fn open(&self) {
        self.state.open.store(true, Ordering::Release);
        self.state.other_sub.lock().take();
    }
}

struct SkipUntilSubscription<T> {
    state: Arc<SkipUntilState<T>>,
}

impl<T: Send + Sync + 'static> Subscription for SkipUntilSubscription<T> {
    fn request(&self, n: u64) {
        if let Some(upstream) = self.state.upstream_sub.lock().as_ref() {
            upstream.request(n);
        }
    }

    fn cancel(&self) {
        self.state.done.store(true, Ordering::Release);
        if let Some(sub) = self.state.upstream_sub.lock().take() {
            sub.cancel();
        }
        if let Some(sub) = self.state.other_sub.lock().take() {
            sub.cancel();
        }
    }
}
