// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Process-wide plugin hooks: the one piece of global mutable state the
//! protocol allows.
//!
//! Three hooks exist, one per interception point:
//!
//! - [`set_on_flow_assembly`] — intercepts every `Flow` created through
//!   [`crate::Flow::create`].
//! - [`set_on_subscribe`] — intercepts every downstream subscriber before
//!   handoff to the subscribe-function.
//! - [`set_on_error`] — receives errors with no valid subscriber to
//!   deliver to (ambiguous subscribe-time throws, and best-effort
//!   logging of post-terminal errors).
//!
//! Defaults are identity (for the first two) and log-via-`tracing` (for
//! the third). Hooks are snapshotted per operation (cloned out of the
//! lock before being invoked) so a concurrent `set_*` call cannot corrupt
//! an in-flight assembly or subscription. Callers are expected to set
//! hooks at startup; later mutation is tolerated, not synchronized
//! against ongoing work.
//!
//! The assembly and subscribe hooks are generic over the element type
//! `T`, which Rust cannot express as a single non-generic global. We key
//! a process-wide registry by [`TypeId`] instead: each `T` gets its own
//! hook slot, which is exactly the "process-wide for this element type"
//! granularity the protocol needs in practice (a hook installed for
//! `Flow<i32>` has no way to run for `Flow<String>` anyway, since it
//! would need a function polymorphic over the wrapped subscriber type).

use crate::error::FlowError;
use crate::flow::Flow;
use crate::subscriber::Subscriber;
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

type AssemblyHook<T> = Arc<dyn Fn(Flow<T>) -> Flow<T> + Send + Sync>;
type SubscribeHook<T> = Arc<dyn Fn(Arc<dyn Subscriber<T>>) -> Arc<dyn Subscriber<T>> + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&FlowError) + Send + Sync>;

fn assembly_registry() -> &'static Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>> {
    static REGISTRY: OnceLock<Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

fn subscribe_registry() -> &'static Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>> {
    static REGISTRY: OnceLock<Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

fn error_hook_slot() -> &'static Mutex<Option<ErrorHook>> {
    static SLOT: OnceLock<Mutex<Option<ErrorHook>>> = OnceLock::new();
    SLOT.get_or_init(|| Mutex::new(None))
}

/// Install the `on_flow_assembly` hook for flows of element type `T`.
///
/// Pass `None` to restore the identity default.
pub fn set_on_flow_assembly<T: 'static>(hook: Option<AssemblyHook<T>>) {
    let mut registry = assembly_registry().lock();
    match hook {
        Some(hook) => {
            registry.insert(TypeId::of::<T>(), Box::new(hook));
        }
        None => {
            registry.remove(&TypeId::of::<T>());
        }
    }
}

/// Install the `on_subscribe` hook for subscribers of element type `T`.
///
/// Pass `None` to restore the identity default.
pub fn set_on_subscribe<T: 'static>(hook: Option<SubscribeHook<T>>) {
    let mut registry = subscribe_registry().lock();
    match hook {
        Some(hook) => {
            registry.insert(TypeId::of::<T>(), Box::new(hook));
        }
        None => {
            registry.remove(&TypeId::of::<T>());
        }
    }
}

/// Install the process-wide `on_error` hook, replacing the default
/// log-and-drop behavior.
pub fn set_on_error(hook: Option<ErrorHook>) {
    *error_hook_slot().lock() = hook;
}

/// Apply the installed assembly hook (if any) to a freshly created
/// `Flow<T>`. Used by [`crate::Flow::create`].
pub(crate) fn apply_on_flow_assembly<T: 'static>(flow: Flow<T>) -> Flow<T> {
    let hook = {
        let registry = assembly_registry().lock();
        registry
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<AssemblyHook<T>>())
            .cloned()
    };
    match hook {
        Some(hook) => hook(flow),
        None => flow,
    }
}

/// Apply the installed subscribe hook (if any) to a subscriber about to
/// be handed to a subscribe-function. Used by [`crate::Flow::subscribe`]
/// and [`crate::Flow::lift`].
pub(crate) fn apply_on_subscribe<T: 'static>(
    subscriber: Arc<dyn Subscriber<T>>,
) -> Arc<dyn Subscriber<T>> {
    let hook = {
        let registry = subscribe_registry().lock();
        registry
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<SubscribeHook<T>>())
            .cloned()
    };
    match hook {
        Some(hook) => hook(subscriber),
        None => subscriber,
    }
}

/// Route an error to the installed `on_error` hook, or the default
/// (log via `tracing::warn!`) if none is installed.
///
/// Called for: subscribe-time ambiguous throws, and as best-effort
/// logging for any error that arrives after a terminal signal or
/// cancellation has already been observed.
pub fn notify_on_error(error: &FlowError) {
    let hook = error_hook_slot().lock().clone();
    match hook {
        Some(hook) => hook(error),
        None => default_on_error(error),
    }
}

fn default_on_error(error: &FlowError) {
    #[cfg(feature = "tracing")]
    tracing::warn!(error = %error, "undeliverable Flow error dropped by default plugin hook");
    #[cfg(not(feature = "tracing"))]
    {
        let _ = error;
    }
}

/// Clear every installed hook for `T` and the process-wide error hook.
/// Intended for test isolation.
pub fn reset_for_tests<T: 'static>() {
    assembly_registry().lock().remove(&TypeId::of::<T>());
    subscribe_registry().lock().remove(&TypeId::of::<T>());
    *error_hook_slot().lock() = None;
}
