// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `empty()`: complete immediately, emitting no values.

use flow_core::{Flow, NoopSubscription, Subscriber};
use std::sync::Arc;

/// A `Flow` that emits `onComplete` immediately on subscription.
///
/// The element type is irrelevant to the behavior; it is still generic
/// over `T` so it type-checks in any position a `Flow<T>` is expected.
#[must_use]
pub fn empty<T>() -> Flow<T>
where
    T: Send + Sync + 'static,
{
    Flow::create(|subscriber: Arc<dyn Subscriber<T>>| {
        subscriber.on_subscribe(Arc::new(NoopSubscription));
        subscriber.on_complete();
    })
}
