// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use flow::prelude::*;
use flow_test_utils::RecordingSubscriber;
use std::collections::HashSet;

#[test]
fn flat_map_merges_every_inner_items_into_one_sequence() {
    // Arrange
    let sub = RecordingSubscriber::new();

    // Act: every inner is a scalar `just` flow, exercising the scalar
    // fast path in `FlatMapState::subscribe_inner`.
    flow::from_array(vec![1, 2, 3])
        .flat_map(|v| flow::just(v * 10))
        .subscribe(sub.clone());

    // Assert: unbounded concurrency means every inner is subscribed
    // up front and, since each is a one-shot scalar, all three land —
    // order across inners isn't guaranteed in general, but is
    // deterministic here because each inner completes synchronously
    // in the order it was subscribed.
    let mut values = sub.values();
    values.sort_unstable();
    assert_eq!(values, vec![10, 20, 30]);
    assert!(sub.is_completed());
}

#[test]
fn flat_map_expands_each_item_into_several_values() {
    let sub = RecordingSubscriber::new();

    flow::from_array(vec![1, 2])
        .flat_map(|v| flow::from_array(vec![v, v + 100]))
        .subscribe(sub.clone());

    let values: HashSet<_> = sub.values().into_iter().collect();
    assert_eq!(values, HashSet::from([1, 101, 2, 102]));
    assert!(sub.is_completed());
}

#[test]
fn flat_map_propagates_a_mapper_error_fail_fast() {
    let sub = RecordingSubscriber::new();

    flow::from_array(vec![1, 2, 3])
        .flat_map(|v| {
            if v == 2 {
                flow::error(FlowError::constraint("bad item"))
            } else {
                flow::just(v)
            }
        })
        .subscribe(sub.clone());

    assert!(sub.error().is_some());
    assert!(!sub.is_completed());
}

#[test]
fn flat_map_with_delay_errors_collects_every_failure() {
    let sub = RecordingSubscriber::new();

    flow::from_array(vec![1, 2, 3])
        .flat_map_with(
            |v| {
                if v % 2 == 0 {
                    flow::error::<i32>(FlowError::constraint(format!("bad {v}")))
                } else {
                    flow::just(v)
                }
            },
            FlatMapConfig::default().delay_errors(true),
        )
        .subscribe(sub.clone());

    assert_eq!(sub.values(), vec![1, 3]);
    match sub.error() {
        Some(FlowError::Composite(errors)) => assert_eq!(errors.len(), 1),
        other => panic!("expected a composite error, got {other:?}"),
    }
}

#[test]
fn flat_map_respects_max_concurrency() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let active = Arc::new(AtomicUsize::new(0));
    let max_observed = Arc::new(AtomicUsize::new(0));
    let sub = RecordingSubscriber::new();

    let active_for_mapper = Arc::clone(&active);
    let max_for_mapper = Arc::clone(&max_observed);
    flow::range(0, 20)
        .flat_map_with(
            move |v| {
                let active = Arc::clone(&active_for_mapper);
                let max_observed = Arc::clone(&max_for_mapper);
                flow::defer(move || {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    max_observed.fetch_max(now, Ordering::SeqCst);
                    let result = flow::just(v);
                    active.fetch_sub(1, Ordering::SeqCst);
                    result
                })
            },
            FlatMapConfig::default().max_concurrency(3),
        )
        .subscribe(sub.clone());

    assert!(max_observed.load(Ordering::SeqCst) <= 3);
    assert_eq!(sub.values().len(), 20);
    assert!(sub.is_completed());
}

#[test]
fn merge_interleaves_every_source_and_completes_once_all_are_done() {
    let sub = RecordingSubscriber::new();

    flow::merge(vec![
        flow::from_array(vec![1, 2]),
        flow::from_array(vec![3, 4]),
        flow::empty(),
    ])
    .subscribe(sub.clone());

    let mut values = sub.values();
    values.sort_unstable();
    assert_eq!(values, vec![1, 2, 3, 4]);
    assert!(sub.is_completed());
}

#[test]
fn merge_is_fail_fast_by_default() {
    let sub = RecordingSubscriber::new();

    flow::merge(vec![
        flow::from_array(vec![1]),
        flow::error(FlowError::constraint("merge source failed")),
    ])
    .subscribe(sub.clone());

    assert!(sub.error().is_some());
}

#[test]
fn merge_delay_error_still_forwards_surviving_values() {
    let sub = RecordingSubscriber::new();

    flow::merge_delay_error(vec![
        flow::from_array(vec![1, 2]),
        flow::error(FlowError::constraint("merge source failed")),
    ])
    .subscribe(sub.clone());

    let mut values = sub.values();
    values.sort_unstable();
    assert_eq!(values, vec![1, 2]);
    assert!(sub.error().is_some());
}

#[test]
fn flat_map_with_max_concurrency_one_preserves_per_source_order() {
    // range(1,3).flatMap(x -> range(10x, 2), maxConcurrency=1) emits
    // [10,11,20,21,30,31] in order, since only one inner runs at a time.
    let sub = RecordingSubscriber::new();

    flow::range(1, 3)
        .flat_map_with(
            |x| flow::range(10 * x, 2),
            FlatMapConfig::default().max_concurrency(1),
        )
        .subscribe(sub.clone());

    assert_eq!(sub.values(), vec![10, 11, 20, 21, 30, 31]);
    assert!(sub.is_completed());
}

#[test]
fn flat_map_on_an_empty_upstream_completes_with_no_values() {
    let sub = RecordingSubscriber::<i32>::new();
    flow::empty::<i32>()
        .flat_map(flow::just)
        .subscribe(sub.clone());
    assert!(sub.values().is_empty());
    assert!(sub.is_completed());
}
