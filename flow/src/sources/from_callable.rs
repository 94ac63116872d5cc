// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `fromCallable(s)`: invoke `s` lazily on first demand.

use crate::support::catch_user;
use flow_core::{Flow, FlowError, Subscriber, Subscription};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Invoke `supplier` upon the first positive `request`, emit its result,
/// then complete. `supplier` exceptions become `onError`; it is never
/// invoked if the subscription is cancelled first.
pub fn from_callable<T, F>(supplier: F) -> Flow<T>
where
    T: Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    let supplier = Arc::new(supplier);
    Flow::create(move |subscriber: Arc<dyn Subscriber<T>>| {
        let subscription = CallableSubscription {
            supplier: Arc::clone(&supplier),
            subscriber: Arc::clone(&subscriber),
            delivered: AtomicBool::new(false),
        };
        subscriber.on_subscribe(Arc::new(subscription));
    })
}

struct CallableSubscription<T, F> {
    supplier: Arc<F>,
    subscriber: Arc<dyn Subscriber<T>>,
    delivered: AtomicBool,
}

impl<T, F> Subscription for CallableSubscription<T, F>
where
    T: Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    fn request(&self, n: u64) {
        if self.delivered.swap(true, Ordering::AcqRel) {
            return;
        }
        if n == 0 {
            self.subscriber
                .on_error(FlowError::constraint("request(n) called with n == 0"));
            return;
        }
        match catch_user(|| (self.supplier)()) {
            Ok(value) => {
                self.subscriber.on_next(value);
                self.subscriber.on_complete();
            }
            Err(error) => self.subscriber.on_error(error),
        }
    }

    fn cancel(&self) {
        self.delivered.store(true, Ordering::Release);
    }
}
