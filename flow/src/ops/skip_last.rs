// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `skipLast(n)`: buffer a sliding window of size `n`, emit
//! items evicted from it, drop the window (unflushed) on completion.

use crate::support::ForwardSubscription;
use flow_core::{Flow, FlowError, Subscriber, Subscription};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// `n == 0` is identity, by the same reasoning as `skip(0)`: an empty
/// window never has anything to evict, so every item passes straight
/// through.
pub(crate) fn build<T>(upstream: Flow<T>, n: usize) -> Flow<T>
where
    T: Send + Sync + 'static,
{
    if n == 0 {
        return upstream;
    }
    upstream.lift(move |downstream: Arc<dyn Subscriber<T>>| {
        Arc::new(SkipLastSubscriber {
            downstream,
            capacity: n,
            window: Mutex::new(VecDeque::with_capacity(n)),
        }) as Arc<dyn Subscriber<T>>
    })
}

struct SkipLastSubscriber<T> {
    downstream: Arc<dyn Subscriber<T>>,
    capacity: usize,
    window: Mutex<VecDeque<T>>,
}

impl<T: Send + Sync + 'static> Subscriber<T> for SkipLastSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        self.downstream.on_subscribe(ForwardSubscription::new(subscription));
    }

    fn on_next(&self, value: T) {
        let evicted = {
            let mut window = self.window.lock();
            window.push_back(value);
            if window.len() > self.capacity {
                window.pop_front()
            } else {
                None
            }
        };
        if let Some(evicted) = evicted {
            self.downstream.on_next(evicted);
        }
    }

    fn on_error(&self, error: FlowError) {
        self.window.lock().clear();
        self.downstream.on_error(error);
    }

    fn on_complete(&self) {
        self.window.lock().clear();
        self.downstream.on_complete();
    }
}
