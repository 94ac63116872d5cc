// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The `Subscriber` half of the Reactive Streams contract.

use crate::error::FlowError;
use crate::subscription::Subscription;
use std::sync::Arc;

/// A polymorphic consumer of a [`crate::Flow`]'s values.
///
/// Implementations receive exactly four signals, in this order:
///
/// 1. `on_subscribe` — delivered exactly once, before any other signal.
/// 2. `on_next` — delivered zero or more times; each call consumes one
///    unit of outstanding demand.
/// 3. `on_error` — terminal, delivered at most once.
/// 4. `on_complete` — terminal, delivered at most once.
///
/// `on_error` and `on_complete` are mutually exclusive, and no signal may
/// follow either. Methods take `&self` rather than `&mut self` because a
/// `Subscriber` is shared behind an `Arc` by the operator kernel — any
/// subscriber that holds mutable state must synchronize it internally
/// (see `flow_core::safe_subscriber::SafeSubscriber` for a ready-made
/// guard that does this for you).
pub trait Subscriber<T>: Send + Sync {
    /// Called exactly once, before any other signal, with a handle the
    /// subscriber uses to request items and to cancel.
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>);

    /// Called for each emitted value. The total number of `on_next` calls
    /// across a subscription's lifetime must never exceed the cumulative
    /// demand granted via `Subscription::request`.
    fn on_next(&self, value: T);

    /// Terminal: an error ended the sequence. Mutually exclusive with
    /// `on_complete`; at most one of the two is ever delivered.
    fn on_error(&self, error: FlowError);

    /// Terminal: the sequence ended successfully. Mutually exclusive with
    /// `on_error`.
    fn on_complete(&self);
}

impl<T> Subscriber<T> for Arc<dyn Subscriber<T>> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        (**self).on_subscribe(subscription);
    }

    fn on_next(&self, value: T) {
        (**self).on_next(value);
    }

    fn on_error(&self, error: FlowError) {
        (**self).on_error(error);
    }

    fn on_complete(&self) {
        (**self).on_complete();
    }
}
