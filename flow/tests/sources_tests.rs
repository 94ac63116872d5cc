// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use flow::prelude::*;
use flow_test_utils::RecordingSubscriber;

#[test]
fn just_emits_one_value_then_completes() {
    // Arrange
    let sub = RecordingSubscriber::new();

    // Act
    flow::just(42).subscribe(sub.clone());

    // Assert
    assert_eq!(sub.values(), vec![42]);
    assert!(sub.is_completed());
}

#[test]
fn just_is_independent_across_subscriptions() {
    let flow = flow::just("hello".to_string());

    let first = RecordingSubscriber::new();
    flow.clone().subscribe(first.clone());
    let second = RecordingSubscriber::new();
    flow.subscribe(second.clone());

    assert_eq!(first.values(), vec!["hello".to_string()]);
    assert_eq!(second.values(), vec!["hello".to_string()]);
}

#[test]
fn empty_completes_with_no_values() {
    let sub = RecordingSubscriber::<i32>::new();
    flow::empty().subscribe(sub.clone());
    assert!(sub.values().is_empty());
    assert!(sub.is_completed());
}

#[test]
fn error_delivers_the_error_without_any_values() {
    let sub = RecordingSubscriber::<i32>::new();
    flow::error(FlowError::constraint("boom")).subscribe(sub.clone());
    assert!(sub.values().is_empty());
    assert!(sub.error().unwrap().is_constraint());
}

#[test]
fn never_subscribes_but_never_terminates() {
    let sub = RecordingSubscriber::<i32>::new();
    flow::never().subscribe(sub.clone());
    assert!(sub.is_subscribed());
    assert!(!sub.is_terminated());
    assert!(sub.values().is_empty());
}

#[test]
fn range_emits_consecutive_integers() {
    let sub = RecordingSubscriber::new();
    flow::range(5, 4).subscribe(sub.clone());
    assert_eq!(sub.values(), vec![5, 6, 7, 8]);
    assert!(sub.is_completed());
}

#[test]
fn range_with_zero_count_completes_immediately() {
    let sub = RecordingSubscriber::new();
    flow::range(0, 0).subscribe(sub.clone());
    assert!(sub.values().is_empty());
    assert!(sub.is_completed());
}

#[test]
fn from_array_preserves_order() {
    let sub = RecordingSubscriber::new();
    flow::from_array(vec!["a", "b", "c"]).subscribe(sub.clone());
    assert_eq!(sub.values(), vec!["a", "b", "c"]);
}

#[test]
fn from_iterable_reruns_independently_per_subscription() {
    let source = flow::from_iterable(vec![1, 2, 3]);

    let first = RecordingSubscriber::new();
    source.clone().subscribe(first.clone());
    let second = RecordingSubscriber::new();
    source.subscribe(second.clone());

    assert_eq!(first.values(), vec![1, 2, 3]);
    assert_eq!(second.values(), vec![1, 2, 3]);
}

#[test]
fn defer_materializes_a_fresh_flow_per_subscription() {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    let counter = Arc::new(AtomicI32::new(0));
    let deferred = {
        let counter = Arc::clone(&counter);
        flow::defer(move || flow::just(counter.fetch_add(1, Ordering::SeqCst)))
    };

    let first = RecordingSubscriber::new();
    deferred.clone().subscribe(first.clone());
    let second = RecordingSubscriber::new();
    deferred.subscribe(second.clone());

    assert_eq!(first.values(), vec![0]);
    assert_eq!(second.values(), vec![1]);
}

#[test]
fn from_callable_invokes_the_supplier_lazily_on_first_demand() {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    let invoked = Arc::new(AtomicBool::new(false));
    let invoked_for_supplier = Arc::clone(&invoked);
    let flow = flow::from_callable(move || {
        invoked_for_supplier.store(true, Ordering::SeqCst);
        "computed".to_string()
    });

    assert!(!invoked.load(Ordering::SeqCst));
    let sub = RecordingSubscriber::new();
    flow.subscribe(sub.clone());

    assert!(invoked.load(Ordering::SeqCst));
    assert_eq!(sub.values(), vec!["computed".to_string()]);
    assert!(sub.is_completed());
}

#[test]
fn from_callable_supplier_panic_becomes_on_error() {
    let sub = RecordingSubscriber::<i32>::new();
    flow::from_callable(|| panic!("supplier exploded")).subscribe(sub.clone());
    assert!(sub.error().is_some());
    assert!(sub.values().is_empty());
}

#[test]
fn from_stream_emits_every_item_exactly_once() {
    let sub = RecordingSubscriber::new();
    flow::from_stream(vec![1, 2, 3].into_iter()).subscribe(sub.clone());
    assert_eq!(sub.values(), vec![1, 2, 3]);
    assert!(sub.is_completed());
}

#[test]
fn from_stream_rejects_a_second_subscription() {
    let source = flow::from_stream(vec![1, 2].into_iter());

    let first = RecordingSubscriber::new();
    source.clone().subscribe(first.clone());
    assert_eq!(first.values(), vec![1, 2]);

    let second = RecordingSubscriber::<i32>::new();
    source.subscribe(second.clone());
    assert!(second.values().is_empty());
    assert!(second.error().unwrap().is_constraint());
}

#[test]
fn from_future_delivers_the_resolved_value_then_completes() -> anyhow::Result<()> {
    let sub = RecordingSubscriber::new();
    flow::from_future(async { Ok(99) }).subscribe(sub.clone());

    // The future resolves on a dedicated polling thread; give it a
    // moment to land before asserting.
    for _ in 0..200 {
        if sub.is_terminated() {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    anyhow::ensure!(sub.is_completed(), "expected from_future to complete");
    assert_eq!(sub.values(), vec![99]);
    Ok(())
}

#[test]
fn from_future_delivers_a_rejection_as_on_error() {
    let sub = RecordingSubscriber::<i32>::new();
    flow::from_future(async { Err(FlowError::constraint("future failed")) }).subscribe(sub.clone());

    for _ in 0..200 {
        if sub.is_terminated() {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    assert!(sub.error().is_some());
    assert!(sub.values().is_empty());
}
