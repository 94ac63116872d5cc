// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The `Flow<T>` façade: a deferred, subscribable source of values.

use crate::error::FlowError;
use crate::plugins;
use crate::safe_subscriber::SafeSubscriber;
use crate::subscriber::Subscriber;
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

type SubscribeFn<T> = dyn Fn(Arc<dyn Subscriber<T>>) + Send + Sync;

/// A cold, lazily-evaluated source of values of element type `T`.
///
/// `Flow<T>` is immutable once constructed and holds a reference-counted
/// subscribe-function; subscribing twice runs that function twice,
/// independently — each subscription gets its own run of the upstream
/// work, with no state shared between them.
pub struct Flow<T> {
    subscribe_fn: Arc<SubscribeFn<T>>,
    scalar_hint: Option<Arc<Mutex<Option<T>>>>,
}

impl<T> Clone for Flow<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe_fn: Arc::clone(&self.subscribe_fn),
            scalar_hint: self.scalar_hint.clone(),
        }
    }
}

/// The external publisher protocol `Flow::from_external` adapts. Anything
/// that can drive the four-signal protocol for a given `T` — not just
/// `Flow<T>` itself — can be lifted into one.
pub trait Publisher<T>: Send + Sync {
    /// Attach `subscriber`, eventually delivering the four-signal
    /// protocol to it.
    fn subscribe_publisher(&self, subscriber: Arc<dyn Subscriber<T>>);
}

impl<T: 'static> Flow<T> {
    /// Wrap a subscribe-function, applying the `on_flow_assembly` plugin
    /// hook.
    ///
    /// There is no null-argument case to reject in Rust — the closure is
    /// required by the type system, not a nullable pointer — so
    /// construction here cannot fail.
    pub fn create<F>(subscribe_fn: F) -> Self
    where
        F: Fn(Arc<dyn Subscriber<T>>) + Send + Sync + 'static,
    {
        let flow = Self {
            subscribe_fn: Arc::new(subscribe_fn),
            scalar_hint: None,
        };
        plugins::apply_on_flow_assembly(flow)
    }

    /// Tag this flow as carrying a single known value, recoverable via
    /// [`Flow::take_scalar_hint`] without subscribing. Operators that
    /// build many small inner flows, like `flat_map`, use this to skip
    /// the subscribe-function machinery entirely for ones shaped like
    /// `just(v)`.
    ///
    /// The hint is independent of `subscribe_fn` — consuming it via
    /// `take_scalar_hint` never affects what a normal `subscribe` call
    /// observes, since that still runs the original subscribe-function
    /// against its own state.
    #[must_use]
    pub fn with_scalar_hint(mut self, value: T) -> Self {
        self.scalar_hint = Some(Arc::new(Mutex::new(Some(value))));
        self
    }

    /// Take the value tagged by [`Flow::with_scalar_hint`], if any.
    /// Returns `None` for flows that were never tagged, and for tagged
    /// flows whose hint has already been taken once — callers that find
    /// `None` should fall back to a normal `subscribe`.
    pub fn take_scalar_hint(&self) -> Option<T> {
        self.scalar_hint.as_ref()?.lock().take()
    }

    /// Attach `subscriber`. Applies the `on_subscribe` plugin hook, then
    /// invokes the subscribe-function with the raw, unwrapped protocol —
    /// no serialization or idempotence guard is added here (see
    /// [`Flow::safe_subscribe`] for that).
    ///
    /// A panic raised synchronously by the subscribe-function itself is
    /// caught and funneled to the plugin `on_error` hook rather than
    /// delivered to `subscriber`: it is ambiguous whether `on_subscribe`
    /// was already called on `subscriber` by the time the panic
    /// unwound, so this is the only safe place to report it.
    pub fn subscribe(&self, subscriber: impl Subscriber<T> + 'static) {
        let subscriber: Arc<dyn Subscriber<T>> = Arc::new(subscriber);
        self.subscribe_dyn(subscriber);
    }

    fn subscribe_dyn(&self, subscriber: Arc<dyn Subscriber<T>>) {
        let subscriber = plugins::apply_on_subscribe(subscriber);
        let subscribe_fn = Arc::clone(&self.subscribe_fn);
        let result = panic::catch_unwind(AssertUnwindSafe(|| (subscribe_fn)(subscriber)));
        if let Err(payload) = result {
            plugins::notify_on_error(&FlowError::upstream_message(panic_message(&payload)));
        }
    }

    /// Attach `subscriber` wrapped in a [`SafeSubscriber`] guard that
    /// enforces serialization of signals and idempotence of the terminal
    /// signal, then subscribes.
    pub fn safe_subscribe(&self, subscriber: impl Subscriber<T> + 'static) {
        let guarded = SafeSubscriber::new(subscriber);
        self.subscribe(guarded);
    }

    /// Apply a transformer from a downstream subscriber to an upstream
    /// subscriber, producing a new `Flow<R>` whose subscribe-function
    /// applies `op` and then subscribes upstream.
    ///
    /// A panic raised by `op` itself is routed through the same
    /// ambiguous-throw path as a subscribe-function panic.
    pub fn lift<R, F>(self, op: F) -> Flow<R>
    where
        R: 'static,
        F: Fn(Arc<dyn Subscriber<R>>) -> Arc<dyn Subscriber<T>> + Send + Sync + 'static,
    {
        let upstream = self;
        Flow::create(move |downstream: Arc<dyn Subscriber<R>>| {
            let op = &op;
            let built = panic::catch_unwind(AssertUnwindSafe(|| op(downstream)));
            match built {
                Ok(upstream_subscriber) => upstream.subscribe_dyn(upstream_subscriber),
                Err(payload) => {
                    plugins::notify_on_error(&FlowError::upstream_message(panic_message(&payload)));
                }
            }
        })
    }

    /// Apply a whole-flow transformer, constraining the return type to
    /// another `Flow`. Sugar for `f(self)`.
    pub fn compose<U, F>(self, f: F) -> Flow<U>
    where
        F: FnOnce(Flow<T>) -> Flow<U>,
    {
        f(self)
    }

    /// Apply a whole-flow transformer, returning whatever it returns.
    /// Sugar for `f(self)`.
    pub fn to<R, F>(self, f: F) -> R
    where
        F: FnOnce(Flow<T>) -> R,
    {
        f(self)
    }

    /// Adapt an external [`Publisher`] implementation into a `Flow<T>`.
    ///
    /// Since `Flow<T>` is statically distinct from other `Publisher<T>`
    /// implementors in Rust, the "already a Flow" case is simply
    /// [`Flow::from_publisher`] (identity) rather than a runtime check.
    pub fn from_external<P>(publisher: P) -> Self
    where
        P: Publisher<T> + 'static,
    {
        Flow::create(move |s| publisher.subscribe_publisher(s))
    }

    /// Identity: `p` is already a `Flow<T>`. Kept alongside
    /// [`Flow::from_external`] so call sites generic over "something
    /// publisher-shaped" don't need to special-case an already-built
    /// `Flow` to avoid gratuitous decoration.
    #[must_use]
    pub fn from_publisher(p: Self) -> Self {
        p
    }

    /// Returns a new `Flow` that forwards to `self`, hiding the concrete
    /// construction behind the same `Flow<T>` façade it already is.
    ///
    /// Because `Flow<T>` already erases its subscribe-function behind a
    /// `dyn Fn`, this is a cheap `Arc` clone rather than an additional
    /// layer of indirection — kept for API discoverability, not a
    /// type-hiding necessity.
    #[must_use]
    pub fn as_observable(&self) -> Self {
        self.clone()
    }
}

impl<T> Publisher<T> for Flow<T>
where
    T: 'static,
{
    fn subscribe_publisher(&self, subscriber: Arc<dyn Subscriber<T>>) {
        self.subscribe_dyn(subscriber);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "subscribe-function panicked with a non-string payload".to_string()
    }
}
