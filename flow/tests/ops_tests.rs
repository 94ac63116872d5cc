// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use flow::prelude::*;
use flow_test_utils::{ManualSubscriber, RecordingSubscriber};

#[test]
fn map_transforms_every_value() {
    let sub = RecordingSubscriber::new();
    flow::from_array(vec![1, 2, 3]).map(|v| v * 10).subscribe(sub.clone());
    assert_eq!(sub.values(), vec![10, 20, 30]);
    assert!(sub.is_completed());
}

#[test]
fn map_panic_cancels_upstream_and_emits_error() {
    let sub = RecordingSubscriber::new();
    flow::from_array(vec![1, 2, 3])
        .map(|v| {
            if v == 2 {
                panic!("boom");
            }
            v
        })
        .subscribe(sub.clone());
    assert_eq!(sub.values(), vec![1]);
    assert!(sub.error().is_some());
    assert!(!sub.is_completed());
}

#[test]
fn filter_drops_values_failing_the_predicate() {
    let sub = RecordingSubscriber::new();
    flow::range(1, 10).filter(|v| v % 2 == 0).subscribe(sub.clone());
    assert_eq!(sub.values(), vec![2, 4, 6, 8, 10]);
    assert!(sub.is_completed());
}

#[test]
fn take_forwards_only_the_first_n_items() {
    let sub = RecordingSubscriber::new();
    flow::range(0, 100).take(3).subscribe(sub.clone());
    assert_eq!(sub.values(), vec![0, 1, 2]);
    assert!(sub.is_completed());
}

#[test]
fn take_zero_completes_without_any_values() {
    let sub = RecordingSubscriber::new();
    flow::range(0, 100).take(0).subscribe(sub.clone());
    assert!(sub.values().is_empty());
    assert!(sub.is_completed());
}

#[test]
#[should_panic(expected = "non-negative")]
fn take_rejects_a_negative_count() {
    let _: flow_core::Flow<i32> = flow::range(0, 1).take(-1);
}

#[test]
fn take_last_buffers_only_the_final_n_items() {
    let sub = RecordingSubscriber::new();
    flow::range(0, 5).take_last(2).subscribe(sub.clone());
    assert_eq!(sub.values(), vec![3, 4]);
    assert!(sub.is_completed());
}

#[test]
fn take_last_with_capacity_larger_than_source_returns_everything() {
    let sub = RecordingSubscriber::new();
    flow::range(0, 3).take_last(10).subscribe(sub.clone());
    assert_eq!(sub.values(), vec![0, 1, 2]);
}

#[test]
fn take_until_predicate_stops_after_the_matching_item() {
    let sub = RecordingSubscriber::new();
    flow::range(0, 10)
        .take_until_predicate(|v| *v == 3)
        .subscribe(sub.clone());
    assert_eq!(sub.values(), vec![0, 1, 2, 3]);
    assert!(sub.is_completed());
}

#[test]
fn take_until_other_stops_self_when_other_emits() {
    let sub = RecordingSubscriber::new();
    flow::never().take_until(flow::just(())).subscribe(sub.clone());
    assert!(sub.values().is_empty());
    assert!(sub.is_completed());
}

#[test]
fn skip_drops_the_first_n_items() {
    let sub = RecordingSubscriber::new();
    flow::range(0, 5).skip(2).subscribe(sub.clone());
    assert_eq!(sub.values(), vec![2, 3, 4]);
}

#[test]
#[should_panic(expected = "non-negative")]
fn skip_rejects_a_negative_count() {
    let _: flow_core::Flow<i32> = flow::range(0, 1).skip(-1);
}

#[test]
fn skip_last_withholds_a_trailing_window() {
    let sub = RecordingSubscriber::new();
    flow::range(0, 5).skip_last(2).subscribe(sub.clone());
    assert_eq!(sub.values(), vec![0, 1, 2]);
}

#[test]
fn skip_while_drops_until_the_predicate_fails() {
    let sub = RecordingSubscriber::new();
    flow::range(0, 6).skip_while(|v| *v < 3).subscribe(sub.clone());
    assert_eq!(sub.values(), vec![3, 4, 5]);
}

#[test]
fn skip_until_other_drops_until_the_other_emits() {
    let sub = RecordingSubscriber::new();
    flow::range(0, 5).skip_until(flow::empty::<()>()).subscribe(sub.clone());
    assert_eq!(sub.values(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn ignore_elements_forwards_only_the_terminal_signal() {
    let sub = RecordingSubscriber::new();
    flow::range(0, 5).ignore_elements().subscribe(sub.clone());
    assert!(sub.values().is_empty());
    assert!(sub.is_completed());
}

#[test]
fn operators_compose_in_a_chain() {
    let sub = RecordingSubscriber::new();
    flow::range(0, 20)
        .filter(|v| v % 2 == 0)
        .map(|v| v * 3)
        .skip(1)
        .take(2)
        .subscribe(sub.clone());
    assert_eq!(sub.values(), vec![6, 12]);
    assert!(sub.is_completed());
}

#[test]
fn map_forwards_backpressure_one_for_one() {
    let sub = ManualSubscriber::new();
    flow::range(0, 5).map(|v| v).subscribe(sub.clone());
    assert!(sub.values().is_empty());

    sub.request(2);
    assert_eq!(sub.values(), vec![0, 1]);

    sub.request(3);
    assert_eq!(sub.values(), vec![0, 1, 2, 3, 4]);
    assert!(sub.is_completed());
}
