// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `skip(n)`: drop the first `n` items, then pass through.

use crate::support::ForwardSubscription;
use flow_core::{Flow, FlowError, Subscriber, Subscription};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Drop the first `n` items from `upstream`, then forward the rest
/// unchanged. `n == 0` is identity — `upstream` is returned as-is rather
/// than wrapped in a no-op skip.
///
/// Unlike [`crate::ops::filter`], a skipped item does not trigger a
/// compensating `request` upstream: `skip` is purely drop-then-pass-
/// through, and the demand invariant (total `onNext` count never
/// exceeds total demand granted) is an upper bound, not a guarantee
/// that every unit of downstream demand is eventually satisfied.
///
/// # Panics
///
/// Panics if `n < 0` — the same constraint class as `take`.
pub(crate) fn build<T>(upstream: Flow<T>, n: i64) -> Flow<T>
where
    T: Send + Sync + 'static,
{
    assert!(n >= 0, "skip: n must be non-negative, got {n}");
    if n == 0 {
        return upstream;
    }
    upstream.lift(move |downstream: Arc<dyn Subscriber<T>>| {
        Arc::new(SkipSubscriber {
            downstream,
            remaining: AtomicI64::new(n),
        }) as Arc<dyn Subscriber<T>>
    })
}

struct SkipSubscriber<T> {
    downstream: Arc<dyn Subscriber<T>>,
    remaining: AtomicI64,
}

impl<T: Send + Sync + 'static> Subscriber<T> for SkipSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        self.downstream.on_subscribe(ForwardSubscription::new(subscription));
    }

    fn on_next(&self, value: T) {
        loop {
            let remaining = self.remaining.load(Ordering::Acquire);
            if remaining <= 0 {
                self.downstream.on_next(value);
                return;
            }
            if self
                .remaining
                .compare_exchange(remaining, remaining - 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return;
            }
        }
    }

    fn on_error(&self, error: FlowError) {
        self.downstream.on_error(error);
    }

    fn on_complete(&self) {
        self.downstream.on_complete();
    }
}
