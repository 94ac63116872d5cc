// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `defer(supplier)`: materialize a fresh `Flow` per subscription.

use crate::support::catch_user;
use flow_core::{Flow, NoopSubscription, Publisher, Subscriber};
use std::sync::Arc;

/// Invoke `supplier` at each subscribe to materialize a per-subscription
/// `Flow`, then subscribe to it. A panic from `supplier` becomes
/// `onError` delivered to that subscriber rather than propagating out of
/// `subscribe`.
pub fn defer<T, F>(supplier: F) -> Flow<T>
where
    T: Send + Sync + 'static,
    F: Fn() -> Flow<T> + Send + Sync + 'static,
{
    Flow::create(move |subscriber: Arc<dyn Subscriber<T>>| match catch_user(|| supplier()) {
        Ok(flow) => flow.subscribe_publisher(subscriber),
        Err(error) => {
            subscriber.on_subscribe(Arc::new(NoopSubscription));
            subscriber.on_error(error);
        }
    })
}
