// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `fromArray` / `fromIterable`: emit items respecting demand, via the
//! shared [`crate::sources::iter_drain`] loop.

use crate::sources::iter_drain::drive_iterator;
use flow_core::{Flow, Subscriber};
use std::sync::Arc;

/// Emit every element of `values`, in order, honoring demand.
///
/// `fromArray([v])` reduces to `just(v)` in value sequence, though this
/// is a distinct cold source rather than a literal dispatch to
/// [`crate::sources::just`].
#[must_use]
pub fn from_array<T>(values: Vec<T>) -> Flow<T>
where
    T: Send + Sync + 'static,
{
    from_iterable(values)
}

/// Emit every item `into_iterable` yields, honoring demand. Each
/// subscription re-calls `into_iter()` on a fresh clone of the source,
/// so (unlike [`crate::sources::from_stream`]) subscribing twice runs
/// the iteration twice from the start — the ordinary cold-source
/// contract.
#[must_use]
pub fn from_iterable<I>(into_iterable: I) -> Flow<I::Item>
where
    I: IntoIterator + Clone + Send + Sync + 'static,
    I::IntoIter: Send + 'static,
    I::Item: Send + Sync + 'static,
{
    Flow::create(move |subscriber: Arc<dyn Subscriber<I::Item>>| {
        drive_iterator(into_iterable.clone().into_iter(), subscriber);
    })
}
