// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `just(v)`: emit a single value then complete.

use flow_core::{Flow, FlowError, Subscriber, Subscription};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Emit `value` once demand arrives, then `onComplete`.
///
/// There is no null-argument rejection here: a missing `T` can't be
/// passed to begin with in Rust, so there is nothing to check.
pub fn just<T>(value: T) -> Flow<T>
where
    T: Clone + Send + Sync + 'static,
{
    let hint = value.clone();
    let value = Arc::new(Mutex::new(Some(value)));
    Flow::create(move |subscriber: Arc<dyn Subscriber<T>>| {
        // Each subscription gets its own slot so re-subscribing the same
        // `Flow<T>` re-delivers the value instead of finding it already
        // taken by a prior subscriber.
        let value = Arc::new(Mutex::new(value.lock().clone_or_none()));
        let subscription = JustSubscription {
            value,
            subscriber: Arc::clone(&subscriber),
            delivered: AtomicBool::new(false),
        };
        subscriber.on_subscribe(Arc::new(subscription));
    })
    .with_scalar_hint(hint)
}

trait CloneOrNone<T> {
    fn clone_or_none(&self) -> Option<T>;
}

impl<T: Clone> CloneOrNone<T> for Option<T> {
    fn clone_or_none(&self) -> Option<T> {
        self.clone()
    }
}

struct JustSubscription<T> {
    value: Arc<Mutex<Option<T>>>,
    subscriber: Arc<dyn Subscriber<T>>,
    delivered: AtomicBool,
}

impl<T: Send + Sync + 'static> Subscription for JustSubscription<T> {
    fn request(&self, n: u64) {
        if self.delivered.swap(true, Ordering::AcqRel) {
            return;
        }
        if n == 0 {
            self.subscriber
                .on_error(FlowError::constraint("request(n) called with n == 0"));
            return;
        }
        if let Some(value) = self.value.lock().take() {
            self.subscriber.on_next(value);
        }
        self.subscriber.on_complete();
    }

    fn cancel(&self) {
        self.delivered.store(true, Ordering::Release);
        self.value.lock().take();
    }
}
