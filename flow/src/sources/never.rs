// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `never()`: deliver `onSubscribe` and nothing else, ever.

use flow_core::{Flow, NoopSubscription, Subscriber};
use std::sync::Arc;

/// A `Flow` that subscribes and then never emits a value, error, or
/// completion. Useful as the identity element for race-style combinators
/// like `take_until`.
#[must_use]
pub fn never<T>() -> Flow<T>
where
    T: Send + Sync + 'static,
{
    Flow::create(|subscriber: Arc<dyn Subscriber<T>>| {
        subscriber.on_subscribe(Arc::new(NoopSubscription));
    })
}
