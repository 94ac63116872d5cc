// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `fromFuture(f)`: bridge a single [`Future`] into the Flow protocol
//! without a Flow-owned scheduler.
//!
//! The core is scheduler-agnostic, so this does not spawn onto Tokio,
//! smol, or any other reactor — it drives `f` to completion
//! on a dedicated thread using a park/unpark waker, the same minimal
//! bridge pattern `futures::executor::block_on` uses internally. Any
//! I/O the future itself depends on must already be driven by whatever
//! runtime constructed it; this crate just supplies the poll loop and
//! demand accounting.

use flow_core::{Flow, FlowError, Subscriber, Subscription};
use futures::task::waker_fn;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::thread;

/// Register a completion callback on `future`; on `Ok` emit the value
/// then complete, on `Err` emit `onError`.
///
/// `future` is consumed on the first subscription; like
/// [`crate::sources::from_stream`], a second `subscribe` call is a
/// single-use violation and errors rather than polling an
/// already-exhausted future a second time.
pub fn from_future<F, T>(future: F) -> Flow<T>
where
    F: Future<Output = Result<T, FlowError>> + Send + 'static,
    T: Send + Sync + 'static,
{
    let slot = Arc::new(Mutex::new(Some(future)));
    Flow::create(move |subscriber: Arc<dyn Subscriber<T>>| {
        let state = Arc::new(FutureState {
            subscriber: Arc::clone(&subscriber),
            outcome: Mutex::new(None),
            demanded: AtomicBool::new(false),
            delivered: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
        });
        subscriber.on_subscribe(Arc::new(FutureSubscription {
            state: Arc::clone(&state),
        }));

        match slot.lock().take() {
            Some(future) => spawn_poll_thread(future, state),
            None => {
                state.cancelled.store(true, Ordering::Release);
                subscriber.on_error(FlowError::constraint(
                    "from_future: source already subscribed once; futures are single-use",
                ));
            }
        }
    })
}

struct FutureState<T> {
    subscriber: Arc<dyn Subscriber<T>>,
    outcome: Mutex<Option<Result<T, FlowError>>>,
    demanded: AtomicBool,
    delivered: AtomicBool,
    cancelled: AtomicBool,
}

fn deliver_if_ready<T: Send + Sync + 'static>(state: &Arc<FutureState<T>>) {
    if state.cancelled.load(Ordering::Acquire) || !state.demanded.load(Ordering::Acquire) {
        return;
    }
    if state.delivered.swap(true, Ordering::AcqRel) {
        return;
    }
    let outcome = state.outcome.lock().take();
    match outcome {
        Some(Ok(value)) => {
            state.subscriber.on_next(value);
            state.subscriber.on_complete();
        }
        Some(Err(error)) => state.subscriber.on_error(error),
        None => {
            // Demand arrived but the future has not resolved yet; the
            // polling thread will re-check demand once it does.
            state.delivered.store(false, Ordering::Release);
        }
    }
}

fn spawn_poll_thread<F, T>(future: F, state: Arc<FutureState<T>>)
where
    F: Future<Output = Result<T, FlowError>> + Send + 'static,
    T: Send + Sync + 'static,
{
    thread::spawn(move || {
        let mut future = Box::pin(future);
        let thread = thread::current();
        let waker = waker_fn(move || thread.unpark());
        let mut cx = Context::from_waker(&waker);
        loop {
            if state.cancelled.load(Ordering::Acquire) {
                return;
            }
            match future.as_mut().poll(&mut cx) {
                Poll::Ready(result) => {
                    *state.outcome.lock() = Some(result);
                    deliver_if_ready(&state);
                    return;
                }
                Poll::Pending => thread::park(),
            }
        }
    });
}

struct FutureSubscription<T> {
    state: Arc<FutureState<T>>,
}

impl<T: Send + Sync + 'static> Subscription for FutureSubscription<T> {
    fn request(&self, n: u64) {
        if self.state.cancelled.load(Ordering::Acquire) {
            return;
        }
        if n == 0 {
            if !self.state.delivered.swap(true, Ordering::AcqRel) {
                self.state.cancelled.store(true, Ordering::Release);
                self.state
                    .subscriber
                    .on_error(FlowError::constraint("request(n) called with n == 0"));
            }
            return;
        }
        self.state.demanded.store(true, Ordering::Release);
        deliver_if_ready(&self.state);
    }

    fn cancel(&self) {
        // Cancellation may, but need not, cancel the underlying future —
        // we take the simpler path and let the polling thread run to
        // completion, discarding its result.
        self.state.cancelled.store(true, Ordering::Release);
    }
}
