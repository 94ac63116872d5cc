// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The transforming operators, plus `flat_map`, exposed as chainable
//! methods on [`flow_core::Flow`] via the
//! [`FlowOps`] extension trait.
//!
//! Each operator lives in its own module as a `build`/`build_subscriber`
//! function; this module is just the method-call surface that wires
//! them onto `Flow<T>`, mirroring `sources::mod`'s role for the source
//! factories.

mod filter;
mod ignore_elements;
mod map;
mod skip;
mod skip_last;
mod skip_until;
mod skip_while;
mod take;
mod take_last;
mod take_until;

use crate::flat_map::{self, FlatMapConfig};
use flow_core::Flow;
use std::sync::Arc;

/// Chainable operator methods on [`Flow<T>`](flow_core::Flow). Bring
/// this trait into scope (or use [`crate::prelude`]) to call
/// `.map(..)`, `.filter(..)`, `.flat_map(..)`, and so on directly on a
/// `Flow`.
pub trait FlowOps<T> {
    /// `map(f)`: transform each item 1:1.
    fn map<R, F>(self, f: F) -> Flow<R>
    where
        R: Send + Sync + 'static,
        F: Fn(T) -> R + Send + Sync + 'static;

    /// `filter(p)`: drop items that fail `p`, re-requesting
    /// one more from upstream per drop.
    fn filter<P>(self, predicate: P) -> Flow<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static;

    /// `take(n)`: forward the first `n` items, then cancel
    /// upstream and complete.
    ///
    /// # Panics
    /// Panics if `n < 0`.
    fn take(self, n: i64) -> Flow<T>;

    /// `takeUntil(other)`: race `other` against `self`; the
    /// first signal from `other` cancels `self` and completes.
    fn take_until<U>(self, other: Flow<U>) -> Flow<T>
    where
        U: Send + Sync + 'static;

    /// `takeUntil(predicate)`: forward each item, then stop
    /// once `predicate(v)` holds for it.
    fn take_until_predicate<P>(self, predicate: P) -> Flow<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static;

    /// `takeLast(n)`: buffer the last `n` items, drain them
    /// once upstream completes.
    fn take_last(self, n: usize) -> Flow<T>;

    /// `skip(n)`: drop the first `n` items.
    ///
    /// # Panics
    /// Panics if `n < 0`.
    fn skip(self, n: i64) -> Flow<T>;

    /// `skipLast(n)`: buffer a sliding window of size `n`,
    /// emitting items evicted from it.
    fn skip_last(self, n: usize) -> Flow<T>;

    /// `skipWhile(p)`: drop items while `p` holds, then pass
    /// through unconditionally.
    fn skip_while<P>(self, predicate: P) -> Flow<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static;

    /// `skipUntil(other)`: drop items until `other` emits
    /// anything or terminates.
    fn skip_until<U>(self, other: Flow<U>) -> Flow<T>
    where
        U: Send + Sync + 'static;

    /// `ignoreElements()`: forward only the terminal signal.
    fn ignore_elements(self) -> Flow<T>;

    /// `flatMap(mapper)` with the default configuration: unbounded
    /// concurrency, fail-fast, default prefetch ([`crate::buffer_size`]).
    fn flat_map<R, F>(self, mapper: F) -> Flow<R>
    where
        R: Send + Sync + 'static,
        F: Fn(T) -> Flow<R> + Send + Sync + 'static;

    /// `flatMap(mapper, delayErrors, maxConcurrency, prefetch)` with an
    /// explicit [`FlatMapConfig`].
    fn flat_map_with<R, F>(self, mapper: F, config: FlatMapConfig) -> Flow<R>
    where
        R: Send + Sync + 'static,
        F: Fn(T) -> Flow<R> + Send + Sync + 'static;
}

impl<T: Send + Sync + 'static> FlowOps<T> for Flow<T> {
    fn map<R, F>(self, f: F) -> Flow<R>
    where
        R: Send + Sync + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.lift(move |downstream| map::build_subscriber(downstream, Arc::clone(&f)))
    }

    fn filter<P>(self, predicate: P) -> Flow<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        self.lift(move |downstream| filter::build_subscriber(downstream, Arc::clone(&predicate)))
    }

    fn take(self, n: i64) -> Flow<T> {
        take::build(self, n)
    }

    fn take_until<U>(self, other: Flow<U>) -> Flow<T>
    where
        U: Send + Sync + 'static,
    {
        take_until::build_other(self, other)
    }

    fn take_until_predicate<P>(self, predicate: P) -> Flow<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        take_until::build_predicate(self, predicate)
    }

    fn take_last(self, n: usize) -> Flow<T> {
        take_last::build(self, n)
    }

    fn skip(self, n: i64) -> Flow<T> {
        skip::build(self, n)
    }

    fn skip_last(self, n: usize) -> Flow<T> {
        skip_last::build(self, n)
    }

    fn skip_while<P>(self, predicate: P) -> Flow<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        self.lift(move |downstream| skip_while::build_subscriber(downstream, Arc::clone(&predicate)))
    }

    fn skip_until<U>(self, other: Flow<U>) -> Flow<T>
    where
        U: Send + Sync + 'static,
    {
        skip_until::build(self, other)
    }

    fn ignore_elements(self) -> Flow<T> {
        self.lift(ignore_elements::build_subscriber)
    }

    fn flat_map<R, F>(self, mapper: F) -> Flow<R>
    where
        R: Send + Sync + 'static,
        F: Fn(T) -> Flow<R> + Send + Sync + 'static,
    {
        flat_map::flat_map(self, mapper, FlatMapConfig::default())
    }

    fn flat_map_with<R, F>(self, mapper: F, config: FlatMapConfig) -> Flow<R>
    where
        R: Send + Sync + 'static,
        F: Fn(T) -> Flow<R> + Send + Sync + 'static,
    {
        flat_map::flat_map(self, mapper, config)
    }
}
