// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `range(start, count)`: a demand-honoring integer range.

use crate::sources::iter_drain::drive_iterator;
use flow_core::{Flow, Subscriber};
use std::sync::Arc;

/// Emit `count` consecutive `i32`s starting at `start`, honoring demand.
///
/// # Panics
///
/// Panics if `start as i64 + count as i64 - 1` exceeds `i32::MAX` — a
/// constraint violation raised synchronously at the call site, not
/// delivered through `onError` since construction here cannot be
/// deferred to a subscription that doesn't exist yet.
#[must_use]
pub fn range(start: i32, count: i32) -> Flow<i32> {
    assert!(count >= 0, "range: count must be non-negative, got {count}");
    if count == 0 {
        return Flow::create(move |subscriber: Arc<dyn Subscriber<i32>>| {
            drive_iterator(start..start, subscriber);
        });
    }
    let last = i64::from(start) + i64::from(count) - 1;
    assert!(
        last <= i64::from(i32::MAX),
        "range: start ({start}) + count ({count}) - 1 overflows i32::MAX"
    );
    #[allow(clippy::cast_possible_truncation)]
    let last = last as i32;
    Flow::create(move |subscriber: Arc<dyn Subscriber<i32>>| {
        drive_iterator(start..=last, subscriber);
    })
}
