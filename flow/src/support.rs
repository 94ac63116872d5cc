// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared helpers used across the operator kernel: a pass-through
//! `Subscription` for 1:1 operators, and the panic-to-`FlowError`
//! bridge for user-supplied closures (`map`'s `f`, `filter`'s `p`, ...).

use flow_core::FlowError;
use flow_core::Subscription;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Forwards `request`/`cancel` straight to `upstream`, unchanged. Used by
/// operators whose demand accounting is exactly 1:1 with upstream (e.g.
/// `map`), which therefore need no bookkeeping of their own.
pub(crate) struct ForwardSubscription {
    upstream: Arc<dyn Subscription>,
}

impl ForwardSubscription {
    pub(crate) fn new(upstream: Arc<dyn Subscription>) -> Arc<Self> {
        Arc::new(Self { upstream })
    }
}

impl Subscription for ForwardSubscription {
    fn request(&self, n: u64) {
        self.upstream.request(n);
    }

    fn cancel(&self) {
        self.upstream.cancel();
    }
}

/// Run a user-supplied closure (a mapper, predicate, or supplier),
/// turning a panic into a [`FlowError::Upstream`] rather than unwinding
/// through operator internals. Spec §7 treats these uniformly as
/// "upstream failure": whatever causes the closure to fail — a returned
/// `Err`, or (since Rust callbacks here are infallible by type) a panic —
/// becomes the error delivered via `onError`.
pub(crate) fn catch_user<F, R>(f: F) -> Result<R, FlowError>
where
    F: FnOnce() -> R,
{
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "operator closure panicked with a non-string payload".to_string()
        };
        FlowError::upstream_message(message)
    })
}
