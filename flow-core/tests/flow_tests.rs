// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Exercises the `Flow<T>` façade itself — `lift`, `compose`, `to`,
//! `from_publisher`, `as_observable`, the plugin hooks, and the
//! `safe_subscribe` guard — independent of any concrete operator from
//! the `flow` crate.

use flow_core::{Flow, FlowError, NoopSubscription, Subscriber, Subscription};
use flow_test_utils::RecordingSubscriber;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn counting_source(count: Arc<AtomicUsize>) -> Flow<i32> {
    Flow::create(move |s: Arc<dyn Subscriber<i32>>| {
        count.fetch_add(1, Ordering::SeqCst);
        s.on_subscribe(Arc::new(NoopSubscription));
        s.on_next(1);
        s.on_next(2);
        s.on_complete();
    })
}

#[test]
fn subscribing_twice_runs_the_subscribe_function_twice() {
    let count = Arc::new(AtomicUsize::new(0));
    let flow = counting_source(Arc::clone(&count));

    flow.clone().subscribe(RecordingSubscriber::new());
    flow.subscribe(RecordingSubscriber::new());

    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn lift_wraps_the_downstream_subscriber_before_upstream_subscribes() {
    let upstream = counting_source(Arc::new(AtomicUsize::new(0)));
    let doubled = upstream.lift(|downstream: Arc<dyn Subscriber<i32>>| {
        Arc::new(DoublingSubscriber { downstream }) as Arc<dyn Subscriber<i32>>
    });

    let sub = RecordingSubscriber::new();
    doubled.subscribe(sub.clone());

    assert_eq!(sub.values(), vec![2, 4]);
    assert!(sub.is_completed());
}

struct DoublingSubscriber {
    downstream: Arc<dyn Subscriber<i32>>,
}

impl Subscriber<i32> for DoublingSubscriber {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        self.downstream.on_subscribe(subscription);
    }
    fn on_next(&self, value: i32) {
        self.downstream.on_next(value * 2);
    }
    fn on_error(&self, error: FlowError) {
        self.downstream.on_error(error);
    }
    fn on_complete(&self) {
        self.downstream.on_complete();
    }
}

#[test]
fn compose_applies_a_whole_flow_transformer() {
    let flow = counting_source(Arc::new(AtomicUsize::new(0)))
        .compose(|f: Flow<i32>| f.lift(|d: Arc<dyn Subscriber<i32>>| d));

    let sub = RecordingSubscriber::new();
    flow.subscribe(sub.clone());
    assert_eq!(sub.values(), vec![1, 2]);
}

#[test]
fn to_returns_whatever_the_transformer_returns() {
    let flow = counting_source(Arc::new(AtomicUsize::new(0)));
    let label: String = flow.to(|_f: Flow<i32>| "converted".to_string());
    assert_eq!(label, "converted");
}

#[test]
fn from_publisher_on_a_flow_is_the_identity() {
    let flow = counting_source(Arc::new(AtomicUsize::new(0)));
    let same = Flow::from_publisher(flow);
    let sub = RecordingSubscriber::new();
    same.subscribe(sub.clone());
    assert_eq!(sub.values(), vec![1, 2]);
}

#[test]
fn as_observable_forwards_every_signal_unchanged() {
    let flow = counting_source(Arc::new(AtomicUsize::new(0))).as_observable();
    let sub = RecordingSubscriber::new();
    flow.subscribe(sub.clone());
    assert_eq!(sub.values(), vec![1, 2]);
    assert!(sub.is_completed());
}

#[test]
fn a_panicking_subscribe_function_is_routed_to_the_plugin_error_hook_not_the_subscriber() {
    // Plugin hooks are process-wide, so this test owns both the error
    // hook and the assembly hook registries for `i32` end to end rather
    // than leaving either set when it returns, to avoid leaking state
    // into whichever other test happens to run concurrently against
    // `Flow<i32>`.
    flow_core::plugins::reset_for_tests::<i32>();
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let seen_for_hook = Arc::clone(&seen);
    flow_core::plugins::set_on_error(Some(Arc::new(move |e: &FlowError| {
        seen_for_hook.lock().unwrap().push(e.to_string());
    })));

    let flow: Flow<i32> = Flow::create(|_s: Arc<dyn Subscriber<i32>>| {
        panic!("subscribe-function exploded");
    });
    let sub = RecordingSubscriber::new();
    flow.subscribe(sub.clone());

    assert!(sub.signals().is_empty(), "subscriber must never see the ambiguous throw");
    assert_eq!(seen.lock().unwrap().len(), 1);

    flow_core::plugins::reset_for_tests::<i32>();
}

#[test]
fn safe_subscribe_makes_the_terminal_signal_idempotent() {
    let deliveries = Arc::new(AtomicUsize::new(0));
    let deliveries_for_sub = Arc::clone(&deliveries);

    struct DoubleCompleting {
        deliveries: Arc<AtomicUsize>,
    }
    impl Subscriber<i32> for DoubleCompleting {
        fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
            subscription.request(flow_core::UNBOUNDED);
        }
        fn on_next(&self, _value: i32) {}
        fn on_error(&self, _error: FlowError) {}
        fn on_complete(&self) {
            self.deliveries.fetch_add(1, Ordering::SeqCst);
        }
    }

    let flow: Flow<i32> = Flow::create(|s: Arc<dyn Subscriber<i32>>| {
        s.on_subscribe(Arc::new(NoopSubscription));
        s.on_complete();
        // A misbehaving upstream that double-signals; safe_subscribe
        // must absorb the second terminal signal rather than forward it.
        s.on_complete();
    });

    flow.safe_subscribe(DoubleCompleting {
        deliveries: deliveries_for_sub,
    });

    assert_eq!(deliveries.load(Ordering::SeqCst), 1);
}

#[test]
fn on_flow_assembly_hook_can_tag_every_created_flow() {
    flow_core::plugins::reset_for_tests::<i32>();
    flow_core::plugins::set_on_flow_assembly(Some(Arc::new(|f: Flow<i32>| f.with_scalar_hint(7))));

    let flow: Flow<i32> = Flow::create(|s: Arc<dyn Subscriber<i32>>| {
        s.on_subscribe(Arc::new(NoopSubscription));
        s.on_complete();
    });

    assert_eq!(flow.take_scalar_hint(), Some(7));
    flow_core::plugins::reset_for_tests::<i32>();
}
