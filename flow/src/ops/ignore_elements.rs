// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `ignoreElements()`: forward only the terminal signal.

use flow_core::{Subscriber, Subscription, UNBOUNDED};
use std::sync::Arc;

/// Forward only `onError`/`onComplete`; every `onNext` is dropped.
/// Requests unbounded demand from upstream immediately on subscribe,
/// since nothing downstream requests can change how much this operator
/// needs to pull to observe the terminal signal.
pub(crate) fn build_subscriber<T>(downstream: Arc<dyn Subscriber<T>>) -> Arc<dyn Subscriber<T>>
where
    T: Send + Sync + 'static,
{
    Arc::new(IgnoreElementsSubscriber { downstream })
}

struct IgnoreElementsSubscriber<T> {
    downstream: Arc<dyn Subscriber<T>>,
}

impl<T: Send + Sync + 'static> Subscriber<T> for IgnoreElementsSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        self.downstream.on_subscribe(Arc::new(CancelOnlySubscription {
            upstream: Arc::clone(&subscription),
        }));
        subscription.request(UNBOUNDED);
    }

    fn on_next(&self, _value: T) {}

    fn on_error(&self, error: flow_core::FlowError) {
        self.downstream.on_error(error);
    }

    fn on_complete(&self) {
        self.downstream.on_complete();
    }
}

struct CancelOnlySubscription {
    upstream: Arc<dyn Subscription>,
}

impl Subscription for CancelOnlySubscription {
    fn request(&self, _n: u64) {
        // No values are ever emitted, so there is nothing additional
        // demand could unlock; upstream has already been asked for
        // everything it has.
    }

    fn cancel(&self) {
        self.upstream.cancel();
    }
}
