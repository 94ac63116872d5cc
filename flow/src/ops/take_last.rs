// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `takeLast(n)`: buffer the last `n` items, drain them downstream
//! (respecting demand) once upstream completes.

use crate::ops::ignore_elements;
use flow_core::trampoline::Trampoline;
use flow_core::{Flow, FlowError, Subscriber, Subscription, UNBOUNDED};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Keep only the most recent `n` items seen from `upstream` in a bounded
/// ring; once upstream completes, drain the buffer downstream respecting
/// whatever demand has accumulated. An upstream error drops the buffer
/// entirely and forwards immediately, rather than flushing whatever was
/// collected.
///
/// `n == 0` reduces to [`crate::ops::ignore_elements::build_subscriber`]'s
/// behavior (nothing is ever buffered, only the terminal signal passes
/// through). A single-slot `n == 1` case is not implemented as a
/// distinct code path here — a `VecDeque` of capacity 1 already degrades
/// to the same number of allocations and branches, so the distinction
/// would be a micro-optimization with no behavioral difference.
pub(crate) fn build<T>(upstream: Flow<T>, n: usize) -> Flow<T>
where
    T: Send + Sync + 'static,
{
    if n == 0 {
        return upstream.lift(ignore_elements::build_subscriber);
    }
    upstream.lift(move |downstream: Arc<dyn Subscriber<T>>| {
        let state = Arc::new(TakeLastState {
            downstream,
            capacity: n,
            buffer: Mutex::new(VecDeque::with_capacity(n)),
            requested: AtomicU64::new(0),
            completed: AtomicBool::new(false),
            complete_emitted: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            trampoline: Trampoline::new(),
            upstream: Mutex::new(None),
        });
        Arc::new(TakeLastSubscriber { state }) as Arc<dyn Subscriber<T>>
    })
}

struct TakeLastState<T> {
    downstream: Arc<dyn Subscriber<T>>,
    capacity: usize,
    buffer: Mutex<VecDeque<T>>,
    requested: AtomicU64,
    completed: AtomicBool,
    complete_emitted: AtomicBool,
    cancelled: AtomicBool,
    trampoline: Trampoline,
    upstream: Mutex<Option<Arc<dyn Subscription>>>,
}

impl<T: Send + Sync + 'static> TakeLastState<T> {
    fn drain(&self) {
        if self.cancelled.load(Ordering::Acquire) || !self.completed.load(Ordering::Acquire) {
            return;
        }
        if !self.trampoline.enter() {
            return;
        }
        loop {
            loop {
                if self.cancelled.load(Ordering::Acquire) {
                    return;
                }
                let demand = self.requested.load(Ordering::Acquire);
                if demand == 0 {
                    break;
                }
                let next = self.buffer.lock().pop_front();
                match next {
                    Some(value) => {
                        if demand != UNBOUNDED {
                            self.requested.fetch_sub(1, Ordering::AcqRel);
                        }
                        self.downstream.on_next(value);
                    }
                    None => {
                        if !self.complete_emitted.swap(true, Ordering::AcqRel) {
                            self.downstream.on_complete();
                        }
                        break;
                    }
                }
            }
            if !self.trampoline.leave() {
                break;
            }
        }
    }
}

struct TakeLastSubscriber<T> {
    state: Arc<TakeLastState<T>>,
}

impl<T: Send + Sync + 'static> Subscriber<T> for TakeLastSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.state.upstream.lock() = Some(Arc::clone(&subscription));
        subscription.request(UNBOUNDED);
        self.state.downstream.on_subscribe(Arc::new(TakeLastSubscription {
            state: Arc::clone(&self.state),
        }));
    }

    fn on_next(&self, value: T) {
        let mut buffer = self.state.buffer.lock();
        if buffer.len() == self.state.capacity {
            buffer.pop_front();
        }
        buffer.push_back(value);
    }

    fn on_error(&self, error: FlowError) {
        self.state.buffer.lock().clear();
        self.state.cancelled.store(true, Ordering::Release);
        self.state.downstream.on_error(error);
    }

    fn on_complete(&self) {
        self.state.upstream.lock().take();
        self.state.completed.store(true, Ordering::Release);
        self.state.drain();
    }
}

struct TakeLastSubscription<T> {
    state: Arc<TakeLastState<T>>,
}

impl<T: Send + Sync + 'static> Subscription for TakeLastSubscription<T> {
    fn request(&self, n: u64) {
        if n == 0 {
            self.state.cancelled.store(true, Ordering::Release);
            self.state
                .downstream
                .on_error(FlowError::constraint("request(n) called with n == 0"));
            return;
        }
        self.state
            .requested
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |total| {
                Some(flow_core::subscription::saturating_add_demand(total, n))
            })
            .ok();
        self.state.drain();
    }

    fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
        self.state.buffer.lock().clear();
        if let Some(upstream) = self.state.upstream.lock().take() {
            upstream.cancel();
        }
    }
}
