// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `error(e)` / `error(supplier)`: emit `onError` immediately.

use crate::support::catch_user;
use flow_core::{Flow, FlowError, NoopSubscription, Subscriber};
use std::sync::Arc;

/// Emit `onError(e)` immediately on subscription.
#[must_use]
pub fn error<T>(e: FlowError) -> Flow<T>
where
    T: Send + Sync + 'static,
{
    error_with(move || e.clone())
}

/// Emit `onError` of whatever `supplier` produces, evaluated at
/// subscribe time — once per subscription, so each gets an independent
/// error instance.
///
/// If `supplier` itself panics, that panic becomes the delivered error
/// rather than unwinding through the subscribe path.
#[must_use]
pub fn error_with<T, F>(supplier: F) -> Flow<T>
where
    T: Send + Sync + 'static,
    F: Fn() -> FlowError + Send + Sync + 'static,
{
    Flow::create(move |subscriber: Arc<dyn Subscriber<T>>| {
        subscriber.on_subscribe(Arc::new(NoopSubscription));
        let produced = catch_user(|| supplier());
        match produced {
            Ok(e) => subscriber.on_error(e),
            Err(panic_error) => subscriber.on_error(panic_error),
        }
    })
}
