// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Core protocol contract for the Flow reactive streaming library.
//!
//! This crate defines the Reactive Streams subscription protocol — the
//! four-signal [`Subscriber`] contract, the [`Subscription`] handle, the
//! [`Flow`] façade that wraps subscribe-functions — plus the process-wide
//! plugin hooks, error type, drain trampoline, and configuration that the
//! operator kernel in the `flow` crate builds on. It has no opinion on
//! any particular operator; see `flow` for `map`/`filter`/`flat_map` and
//! the source factories.

pub mod config;
pub mod error;
pub mod flow;
pub mod plugins;
pub mod safe_subscriber;
pub mod subscriber;
pub mod subscription;
pub mod trampoline;

pub use error::{FlowError, Result};
pub use flow::{Flow, Publisher};
pub use safe_subscriber::SafeSubscriber;
pub use subscriber::Subscriber;
pub use subscription::{NoopSubscription, Subscription, UNBOUNDED};
