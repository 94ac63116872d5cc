// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `skipWhile(p)`: drop items while `p` holds, then pass
//! through unconditionally from the first item that fails it.

use crate::support::{catch_user, ForwardSubscription};
use flow_core::{FlowError, Subscriber, Subscription};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub(crate) fn build_subscriber<T, P>(
    downstream: Arc<dyn Subscriber<T>>,
    predicate: Arc<P>,
) -> Arc<dyn Subscriber<T>>
where
    T: Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    Arc::new(SkipWhileSubscriber {
        downstream,
        predicate,
        skipping: AtomicBool::new(true),
        upstream: Mutex::new(None),
    })
}

struct SkipWhileSubscriber<T, P> {
    downstream: Arc<dyn Subscriber<T>>,
    predicate: Arc<P>,
    skipping: AtomicBool,
    upstream: Mutex<Option<Arc<dyn Subscription>>>,
}

impl<T, P> Subscriber<T> for SkipWhileSubscriber<T, P>
where
    T: Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.upstream.lock() = Some(Arc::clone(&subscription));
        self.downstream.on_subscribe(ForwardSubscription::new(subscription));
    }

    fn on_next(&self, value: T) {
        if !self.skipping.load(Ordering::Acquire) {
            self.downstream.on_next(value);
            return;
        }
        let predicate = Arc::clone(&self.predicate);
        match catch_user(|| predicate(&value)) {
            Ok(true) => {}
            Ok(false) => {
                self.skipping.store(false, Ordering::Release);
                self.downstream.on_next(value);
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

impl<T, P> SkipWhileSubscriber<T, P> {
    fn fail(&self, error: FlowError) {
        if let Some(upstream) = self.upstream.lock().take() {
            upstream.cancel();
        }
        self.downstream.on_error(error);
    }
}
