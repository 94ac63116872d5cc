// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The `Subscription` half of the Reactive Streams contract.

/// Demand value meaning "unbounded" — the saturating maximum of a 64-bit
/// unsigned counter; additive demand saturates here instead of
/// overflowing.
pub const UNBOUNDED: u64 = u64::MAX;

/// A handle linking one subscriber to one upstream producer.
///
/// `request` and `cancel` must be safe to call from any thread and must
/// not re-enter the subscriber's signals synchronously beyond what a
/// trampoline (see `flow_core::trampoline`) can safely unwind.
pub trait Subscription: Send + Sync {
    /// Request `n` more items be delivered via `onNext`.
    ///
    /// `n == 0` is a protocol violation: implementations must route it to
    /// `onError` with a [`crate::FlowError::Constraint`] rather than
    /// panicking, since `request` is commonly called from arbitrary
    /// subscriber code. Demand is additive and saturates at
    /// [`UNBOUNDED`].
    fn request(&self, n: u64);

    /// Cancel the subscription.
    ///
    /// Idempotent: calling `cancel` more than once has no additional
    /// effect. After `cancel` returns, no further signals are delivered
    /// to the associated subscriber, though in-flight signals already
    /// dispatched before the cancellation was observed may still land.
    fn cancel(&self);
}

/// A [`Subscription`] that does nothing: upstream has already terminated
/// (e.g. `empty()`, `error()`) before any demand could matter.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSubscription;

impl Subscription for NoopSubscription {
    fn request(&self, _n: u64) {}
    fn cancel(&self) {}
}

/// Saturating-add `delta` onto `*total`, the demand accounting rule used
/// throughout the operator kernel: demand is additive and saturates at
/// the maximum representable 64-bit unsigned value.
#[must_use]
pub const fn saturating_add_demand(total: u64, delta: u64) -> u64 {
    total.saturating_add(delta)
}
