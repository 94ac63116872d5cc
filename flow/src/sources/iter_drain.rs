// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared demand-driven drain loop for the iterator-backed sources
//! (`from_array`, `from_iterable`, `from_stream`, `range`): each wraps a
//! plain `Iterator` and needs the same accounting, so the loop lives
//! here once instead of once per source.

use crate::support::catch_user;
use flow_core::subscription::saturating_add_demand;
use flow_core::trampoline::Trampoline;
use flow_core::{FlowError, Subscriber, Subscription, UNBOUNDED};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Subscribe `subscriber` to a cold source that lazily pulls from `iter`.
///
/// Honors demand: nothing is pulled from `iter` until the first
/// `request(n)` with `n >= 1`. When outstanding demand is
/// [`UNBOUNDED`], the loop never decrements it — a fast path draining
/// to exhaustion in one pass without per-item demand bookkeeping. Any
/// other value is decremented per item, so the loop naturally stops the
/// instant demand is exhausted and resumes on the next `request` — the
/// slow path. A panic from `iter.next()` becomes `onError`.
pub(crate) fn drive_iterator<T, I>(iter: I, subscriber: Arc<dyn Subscriber<T>>)
where
    T: Send + Sync + 'static,
    I: Iterator<Item = T> + Send + 'static,
{
    let state = Arc::new(IterState {
        iter: Mutex::new(iter),
        subscriber,
        requested: AtomicU64::new(0),
        trampoline: Trampoline::new(),
        cancelled: AtomicBool::new(false),
    });
    let subscription: Arc<dyn Subscription> = IterSubscription::new(Arc::clone(&state));
    state.subscriber.on_subscribe(subscription);
}

struct IterState<T, I> {
    iter: Mutex<I>,
    subscriber: Arc<dyn Subscriber<T>>,
    requested: AtomicU64,
    trampoline: Trampoline,
    cancelled: AtomicBool,
}

impl<T, I> IterState<T, I>
where
    T: Send + Sync + 'static,
    I: Iterator<Item = T>,
{
    fn drain(&self) {
        if !self.trampoline.enter() {
            return;
        }
        loop {
            loop {
                if self.cancelled.load(Ordering::Acquire) {
                    break;
                }
                let demand = self.requested.load(Ordering::Acquire);
                if demand == 0 {
                    break;
                }
                match catch_user(|| self.iter.lock().next()) {
                    Ok(Some(value)) => {
                        if demand != UNBOUNDED {
                            self.requested.fetch_sub(1, Ordering::AcqRel);
                        }
                        self.subscriber.on_next(value);
                    }
                    Ok(None) => {
                        self.cancelled.store(true, Ordering::Release);
                        self.subscriber.on_complete();
                        break;
                    }
                    Err(error) => {
                        self.cancelled.store(true, Ordering::Release);
                        self.subscriber.on_error(error);
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

struct IterSubscription<T, I> {
    state: Arc<IterState<T, I>>,
}

impl<T, I> IterSubscription<T, I>
where
    T: Send + Sync + 'static,
    I: Iterator<Item = T> + Send + 'static,
{
    fn new(state: Arc<IterState<T, I>>) -> Arc<Self> {
        Arc::new(Self { state })
    }
}

impl<T, I> Subscription for IterSubscription<T, I>
where
    T: Send + Sync + 'static,
    I: Iterator<Item = T> + Send + 'static,
{
    fn request(&self, n: u64) {
        if self.state.cancelled.load(Ordering::Acquire) {
            return;
        }
        if n == 0 {
            self.state.cancelled.store(true, Ordering::Release);
            self.state
                .subscriber
                .on_error(FlowError::constraint("request(n) called with n == 0"));
            return;
        }
        self.state
            .requested
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |total| {
                Some(saturating_add_demand(total, n))
            })
            .ok();
        self.state.drain();
    }

    fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
    }
}
