// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `map(f)`: a 1:1 value transform.

use crate::support::{catch_user, ForwardSubscription};
use flow_core::{FlowError, Subscriber, Subscription};
use parking_lot::Mutex;
use std::sync::Arc;

/// For each upstream `onNext(v)`, emit downstream `onNext(f(v))`.
/// Demand passes through 1:1 — `map` never needs to ask upstream for
/// more or fewer items than downstream asked of it, so the subscription
/// handed to downstream just forwards `request`/`cancel` unchanged via
/// [`ForwardSubscription`].
///
/// A panic from `f` cancels upstream and emits `onError`.
pub(crate) fn build_subscriber<T, R, F>(
    downstream: Arc<dyn Subscriber<R>>,
    f: Arc<F>,
) -> Arc<dyn Subscriber<T>>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
{
    Arc::new(MapSubscriber {
        downstream,
        f,
        upstream: Mutex::new(None),
        _marker: std::marker::PhantomData,
    })
}

struct MapSubscriber<T, R, F> {
    downstream: Arc<dyn Subscriber<R>>,
    f: Arc<F>,
    upstream: Mutex<Option<Arc<dyn Subscription>>>,
    _marker: std::marker::PhantomData<T>,
}

impl<T, R, F> Subscriber<T> for MapSubscriber<T, R, F>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
{
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.upstream.lock() = Some(Arc::clone(&subscription));
        self.downstream.on_subscribe(ForwardSubscription::new(subscription));
    }

    fn on_next(&self, value: T) {
        let f = Arc::clone(&self.f);
        match catch_user(move || f(value)) {
            Ok(mapped) => self.downstream.on_next(mapped),
            Err(error) => self.fail(error),
        }
    }

    fn on_error(&self, error: FlowError) {
        self.downstream.on_error(error);
    }

    fn on_complete(&self) {
        self.downstream.on_complete();
    }
}

impl<T, R, F> MapSubscriber<T, R, F> {
    fn fail(&self, error: FlowError) {
        if let Some(upstream) = self.upstream.lock().take() {
            upstream.cancel();
        }
        self.downstream.on_error(error);
    }
}
