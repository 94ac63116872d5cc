// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared signal log used by [`crate::RecordingSubscriber`] and
//! [`crate::ManualSubscriber`].

use flow_core::FlowError;
use parking_lot::Mutex;

/// One signal observed by a recording subscriber, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal<T> {
    Subscribed,
    Next(T),
    Error(FlowError),
    Complete,
}

/// An append-only, lockable log of [`Signal`]s, shared between a
/// subscriber and the test body asserting against it.
#[derive(Debug, Default)]
pub struct Recorder<T> {
    signals: Mutex<Vec<Signal<T>>>,
}

impl<T: Clone> Recorder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            signals: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn push(&self, signal: Signal<T>) {
        self.signals.lock().push(signal);
    }

    /// All recorded signals, in arrival order.
    #[must_use]
    pub fn signals(&self) -> Vec<Signal<T>> {
        self.signals.lock().clone()
    }

    /// Just the values delivered via `on_next`, in arrival order.
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.signals
            .lock()
            .iter()
            .filter_map(|s| match s {
                Signal::Next(v) => Some(v.clone()),
                _ => None,
            })
            .collect()
    }

    /// The terminal error, if `on_error` was recorded.
    #[must_use]
    pub fn error(&self) -> Option<FlowError> {
        self.signals.lock().iter().find_map(|s| match s {
            Signal::Error(e) => Some(e.clone()),
            _ => None,
        })
    }

    /// `true` if `on_complete` was recorded.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.signals
            .lock()
            .iter()
            .any(|s| matches!(s, Signal::Complete))
    }

    /// `true` if either terminal signal was recorded.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.signals
            .lock()
            .iter()
            .any(|s| matches!(s, Signal::Complete | Signal::Error(_)))
    }

    /// `true` if `on_subscribe` was recorded.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.signals
            .lock()
            .iter()
            .any(|s| matches!(s, Signal::Subscribed))
    }
}
