// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `filter(p)`: drop items that fail `p`, re-requesting one
//! more from upstream per drop so downstream demand stays satisfied.

use crate::support::{catch_user, ForwardSubscription};
use flow_core::{FlowError, Subscriber, Subscription};
use parking_lot::Mutex;
use std::sync::Arc;

/// For each `onNext(v)`, emit it downstream if `p(v)` holds; otherwise
/// request one more item from upstream to compensate, so the net demand
/// downstream granted is still eventually satisfied one-for-one.
///
/// A panic from `p` cancels upstream and emits `onError`.
/// Re-requesting on a dropped item can reenter this subscriber's
/// `on_next` synchronously if upstream is a cold, synchronous source;
/// every built-in source in this crate drains through
/// [`flow_core::trampoline::Trampoline`], which absorbs that reentrancy
/// into its existing drain loop instead of growing the call stack.
pub(crate) fn build_subscriber<T, P>(
    downstream: Arc<dyn Subscriber<T>>,
    predicate: Arc<P>,
) -> Arc<dyn Subscriber<T>>
where
    T: Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    Arc::new(FilterSubscriber {
        downstream,
        predicate,
        upstream: Mutex::new(None),
    })
}

struct FilterSubscriber<T, P> {
    downstream: Arc<dyn Subscriber<T>>,
    predicate: Arc<P>,
    upstream: Mutex<Option<Arc<dyn Subscription>>>,
}

impl<T, P> Subscriber<T> for FilterSubscriber<T, P>
where
    T: Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.upstream.lock() = Some(Arc::clone(&subscription));
        self.downstream.on_subscribe(ForwardSubscription::new(subscription));
    }

    fn on_next(&self, value: T) {
        let predicate = Arc::clone(&self.predicate);
        match catch_user(|| predicate(&value)) {
            Ok(true) => self.downstream.on_next(value),
            Ok(false) => {
                if let Some(upstream) = self.upstream.lock().as_ref() {
                    upstream.request(1);
                }
            }
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

impl<T, P> FilterSubscriber<T, P> {
    fn fail(&self, error: FlowError) {
        if let Some(upstream) = self.upstream.lock().take() {
            upstream.cancel();
        }
        self.downstream.on_error(error);
    }
}
