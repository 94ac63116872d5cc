// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::recorder::{Recorder, Signal};
use flow_core::{FlowError, Subscriber, Subscription};
use parking_lot::Mutex;
use std::sync::Arc;

/// A subscriber that does **not** request automatically, for exercising
/// backpressure and reentrancy: the test body calls `.request(n)` itself,
/// on its own schedule.
///
/// ```
/// use flow_core::Flow;
/// use flow_test_utils::ManualSubscriber;
///
/// let flow = Flow::<i32>::create(|s| {
///     s.on_subscribe(std::sync::Arc::new(flow_core::NoopSubscription));
/// });
///
/// let sub = ManualSubscriber::new();
/// flow.subscribe(sub.clone());
/// assert!(sub.values().is_empty());
/// sub.request(1); // no-op subscription above, but demonstrates the API
/// ```
pub struct ManualSubscriber<T> {
    recorder: Arc<Recorder<T>>,
    subscription: Arc<Mutex<Option<Arc<dyn Subscription>>>>,
}

impl<T> Clone for ManualSubscriber<T> {
    fn clone(&self) -> Self {
        Self {
            recorder: Arc::clone(&self.recorder),
            subscription: Arc::clone(&self.subscription),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for ManualSubscriber<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> ManualSubscriber<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            recorder: Arc::new(Recorder::new()),
            subscription: Arc::new(Mutex::new(None)),
        }
    }

    /// Request `n` more items from the held subscription.
    ///
    /// # Panics
    /// Panics if called before `on_subscribe` has been delivered.
    pub fn request(&self, n: u64) {
        let subscription = self.subscription.lock();
        subscription
            .as_ref()
            .expect("ManualSubscriber::request called before on_subscribe")
            .request(n);
    }

    /// Cancel the held subscription.
    ///
    /// # Panics
    /// Panics if called before `on_subscribe` has been delivered.
    pub fn cancel(&self) {
        let subscription = self.subscription.lock();
        subscription
            .as_ref()
            .expect("ManualSubscriber::cancel called before on_subscribe")
            .cancel();
    }

    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.recorder.values()
    }

    #[must_use]
    pub fn error(&self) -> Option<FlowError> {
        self.recorder.error()
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.recorder.is_completed()
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.recorder.is_terminated()
    }

    #[must_use]
    pub fn signals(&self) -> Vec<Signal<T>> {
        self.recorder.signals()
    }
}

impl<T: Clone + Send + Sync + 'static> Subscriber<T> for ManualSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.subscription.lock() = Some(subscription);
        self.recorder.push(Signal::Subscribed);
    }

    fn on_next(&self, value: T) {
        self.recorder.push(Signal::Next(value));
    }

    fn on_error(&self, error: FlowError) {
        self.recorder.push(Signal::Error(error));
    }

    fn on_complete(&self) {
        self.recorder.push(Signal::Complete);
    }
}
