// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! The operator kernel for the Flow reactive streaming library.
//!
//! `flow-core` defines the Reactive Streams protocol contract —
//! [`flow_core::Subscriber`], [`flow_core::Subscription`], the
//! [`flow_core::Flow`] façade, and the plugin hooks. This crate builds
//! the source factories and operators on top of that contract: `just`,
//! `empty`, `error`, `never`, `range`, `defer`, `from_array`,
//! `from_iterable`, `from_stream`, `from_future`, `from_callable`
//! ([`sources`]); `map`, `filter`, `take`, `skip`, and their siblings
//! ([`ops`]); and the concurrent `flat_map`/`merge` core ([`flat_map`]).
//!
//! Operators are exposed as methods on [`flow_core::Flow`] via the
//! [`FlowOps`] extension trait — bring it into scope (or use
//! [`prelude`]) to chain `.map(..).filter(..).take(..)` directly.

pub mod flat_map;
pub mod ops;
pub mod sources;

mod support;

pub use flat_map::{merge, merge_delay_error, FlatMapConfig};
pub use ops::FlowOps;
pub use sources::{
    defer, empty, error, from_array, from_callable, from_future, from_iterable, from_stream,
    never, just, range,
};

/// `bufferSize()` from the programmatic surface: the default prefetch
/// used by `flat_map`/`merge` when no explicit value is given.
#[must_use]
pub fn buffer_size() -> usize {
    flow_core::config::default_buffer_size()
}

/// Bring every source factory and the [`FlowOps`] operator methods into
/// scope in one `use`.
pub mod prelude {
    pub use crate::flat_map::{merge, merge_delay_error};
    pub use crate::ops::FlowOps;
    pub use crate::sources::{
        defer, empty, error, from_array, from_callable, from_future, from_iterable, from_stream,
        never, just, range,
    };
    pub use flow_core::{Flow, FlowError, Subscriber, Subscription, UNBOUNDED};
}
