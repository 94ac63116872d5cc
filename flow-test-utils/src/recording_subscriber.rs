// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::recorder::{Recorder, Signal};
use flow_core::{FlowError, Subscriber, Subscription, UNBOUNDED};
use std::sync::Arc;

/// A subscriber that requests unbounded demand immediately upon
/// `on_subscribe` and records every signal it receives.
///
/// This is the workhorse used across scenario tests: build a `Flow`,
/// `subscribe` a `RecordingSubscriber`, then assert against `.values()`
/// / `.error()` / `.is_completed()`.
///
/// ```
/// use flow_core::Flow;
/// use flow_test_utils::RecordingSubscriber;
///
/// let flow = Flow::<i32>::create(|s| {
///     s.on_subscribe(std::sync::Arc::new(flow_core::NoopSubscription));
///     s.on_next(1);
///     s.on_next(2);
///     s.on_complete();
/// });
///
/// let sub = RecordingSubscriber::new();
/// flow.subscribe(sub.clone());
/// assert_eq!(sub.values(), vec![1, 2]);
/// assert!(sub.is_completed());
/// ```
pub struct RecordingSubscriber<T> {
    recorder: Arc<Recorder<T>>,
}

impl<T> Clone for RecordingSubscriber<T> {
    fn clone(&self) -> Self {
        Self {
            recorder: Arc::clone(&self.recorder),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for RecordingSubscriber<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> RecordingSubscriber<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            recorder: Arc::new(Recorder::new()),
        }
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
    pub fn is_subscribed(&self) -> bool {
        self.recorder.is_subscribed()
    }

    #[must_use]
    pub fn signals(&self) -> Vec<Signal<T>> {
        self.recorder.signals()
    }
}

impl<T: Clone + Send + Sync + 'static> Subscriber<T> for RecordingSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        self.recorder.push(Signal::Subscribed);
        subscription.request(UNBOUNDED);
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
