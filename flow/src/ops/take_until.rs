// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `takeUntil(other)` / `takeUntil(predicate)`.

use crate::support::catch_user;
use flow_core::{Flow, FlowError, Publisher, Subscriber, Subscription, UNBOUNDED};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Race `upstream` against `other`: the first `onNext` or terminal
/// signal from `other` cancels `upstream` and completes downstream.
/// `other` is subscribed with unbounded demand immediately, so the race
/// resolves independent of whatever downstream has itself requested —
/// so e.g. `never().takeUntil(just(1))` completes promptly with no
/// `onNext`, even before downstream asks for anything.
pub(crate) fn build_other<T, U>(upstream: Flow<T>, other: Flow<U>) -> Flow<T>
where
    T: Send + Sync + 'static,
    U: Send + Sync + 'static,
{
    Flow::create(move |downstream: Arc<dyn Subscriber<T>>| {
        let state = Arc::new(TakeUntilState {
            downstream,
            done: AtomicBool::new(false),
            upstream_sub: Mutex::new(None),
            other_sub: Mutex::new(None),
        });
        upstream.subscribe_publisher(Arc::new(GuardedSubscriber {
            state: Arc::clone(&state),
        }));
        other.subscribe_publisher(Arc::new(RacerSubscriber {
            state: Arc::clone(&state),
            _marker: std::marker::PhantomData,
        }));
    })
}

struct TakeUntilState<T> {
    downstream: Arc<dyn Subscriber<T>>,
    done: AtomicBool,
    upstream_sub: Mutex<Option<Arc<dyn Subscription>>>,
    other_sub: Mutex<Option<Arc<dyn Subscription>>>,
}

impl<T> TakeUntilState<T> {
    fn cancel_all(&self) {
        if let Some(sub) = self.upstream_sub.lock().take() {
            sub.cancel();
        }
        if let Some(sub) = self.other_sub.lock().take() {
            sub.cancel();
        }
    }
}

struct GuardedSubscriber<T> {
    state: Arc<TakeUntilState<T>>,
}

impl<T: Send + Sync + 'static> Subscriber<T> for GuardedSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.state.upstream_sub.lock() = Some(Arc::clone(&subscription));
        self.state.downstream.on_subscribe(Arc::new(TakeUntilSubscription {
            state: Arc::clone(&self.state),
        }));
    }

    fn on_next(&self, value: T) {
        if self.state.done.load(Ordering::Acquire) {
            return;
        }
        self.state.downstream.on_next(value);
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

struct RacerSubscriber<T, U> {
    state: Arc<TakeUntilState<T>>,
    _marker: std::marker::PhantomData<U>,
}

impl<T: Send + Sync + 'static, U: Send + Sync + 'static> Subscriber<U> for RacerSubscriber<T, U> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.state.other_sub.lock() = Some(Arc::clone(&subscription));
        subscription.request(UNBOUNDED);
    }

    fn on_next(&self, _value: U) {
        self.trigger();
    }

    fn on_error(&self, _error: FlowError) {
        self.trigger();
    }

    fn on_complete(&self) {
        self.trigger();
    }
}

impl<T: Send + Sync + 'static, U> RacerSubscriber<T, U> {
    fn trigger(&self) {
        if self.state.done.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(sub) = self.state.upstream_sub.lock().take() {
            sub.cancel();
        }
        self.state.other_sub.lock().take();
        self.state.downstream.on_complete();
    }
}

struct TakeUntilSubscription<T> {
    state: Arc<TakeUntilState<T>>,
}

impl<T: Send + Sync + 'static> Subscription for TakeUntilSubscription<T> {
    fn request(&self, n: u64) {
        if let Some(upstream) = self.state.upstream_sub.lock().as_ref() {
            upstream.request(n);
        }
    }

    fn cancel(&self) {
        self.state.done.store(true, Ordering::Release);
        self.state.cancel_all();
    }
}

/// Forward each item, then — once it has been emitted — evaluate
/// `predicate(v)`; if it holds, cancel upstream and complete. The
/// predicate runs on a borrow before the value is handed to
/// `downstream`, so the check doesn't require `T: Clone`, but its
/// *effect* — cancellation and completion — is applied only after the
/// forward.
pub(crate) fn build_predicate<T, P>(upstream: Flow<T>, predicate: P) -> Flow<T>
where
    T: Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    upstream.lift(move |downstream: Arc<dyn Subscriber<T>>| {
        Arc::new(TakeUntilPredicateSubscriber {
            downstream,
            predicate: Arc::clone(&predicate),
            done: AtomicBool::new(false),
            upstream: Mutex::new(None),
        }) as Arc<dyn Subscriber<T>>
    })
}

struct TakeUntilPredicateSubscriber<T, P> {
    downstream: Arc<dyn Subscriber<T>>,
    predicate: Arc<P>,
    done: AtomicBool,
    upstream: Mutex<Option<Arc<dyn Subscription>>>,
}

impl<T, P> Subscriber<T> for TakeUntilPredicateSubscriber<T, P>
where
    T: Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.upstream.lock() = Some(Arc::clone(&subscription));
        self.downstream.on_subscribe(subscription);
    }

    fn on_next(&self, value: T) {
        if self.done.load(Ordering::Acquire) {
            return;
        }
        let predicate = Arc::clone(&self.predicate);
        let stop = match catch_user(|| predicate(&value)) {
            Ok(stop) => stop,
            Err(error) => {
                self.done.store(true, Ordering::Release);
                if let Some(upstream) = self.upstream.lock().take() {
                    upstream.cancel();
                }
                self.downstream.on_error(error);
                return;
            }
        };
        self.downstream.on_next(value);
        if stop && !self.done.swap(true, Ordering::AcqRel) {
            if let Some(upstream) = self.upstream.lock().take() {
                upstream.cancel();
            }
            self.downstream.on_complete();
        }
    }

    fn on_error(&self, error: FlowError) {
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
