// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `flatMap` / `merge`: the concurrent core.
//!
//! This is the most intricate operator in the kernel: it subscribes to
//! an upstream of values, maps each into an inner `Flow`, and merges
//! however many of those inners are allowed to run concurrently back
//! into a single downstream sequence — all while keeping every demand,
//! cancellation, and error-propagation invariant intact across a
//! topology that, unlike every other operator in this crate, is
//! genuinely N-to-1 rather than 1-to-1.
//!
//! The drain loop is a single [`Trampoline`]-protected worker: upstream,
//! each inner, downstream `request`, and `cancel` can all
//! observe new work concurrently, but only one of them actually walks
//! the inner queues at a time — everyone else just bumps the trampoline
//! counter and trusts the active drainer to notice.

use crate::support::catch_user;
use flow_core::subscription::saturating_add_demand;
use flow_core::trampoline::Trampoline;
use flow_core::{Flow, FlowError, Publisher, Subscriber, Subscription, UNBOUNDED};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Tuning knobs for [`flat_map`]: concurrency, per-inner prefetch, and
/// the fail-fast/delay-errors choice.
///
/// `Default` matches the conventional default `flatMap`: unbounded
/// concurrency, fail-fast, and [`crate::buffer_size`] as the per-inner
/// prefetch.
#[derive(Debug, Clone, Copy)]
pub struct FlatMapConfig {
    max_concurrency: usize,
    prefetch: usize,
    delay_errors: bool,
}

impl Default for FlatMapConfig {
    fn default() -> Self {
        Self {
            max_concurrency: usize::MAX,
            prefetch: flow_core::config::default_buffer_size(),
            delay_errors: false,
        }
    }
}

impl FlatMapConfig {
    /// Cap the number of inner `Flow`s subscribed concurrently.
    ///
    /// # Panics
    /// Panics if `n == 0`: `max_concurrency <= 0` is a constraint
    /// violation.
    #[must_use]
    pub fn max_concurrency(mut self, n: usize) -> Self {
        assert!(n >= 1, "flat_map: max_concurrency must be >= 1, got {n}");
        self.max_concurrency = n;
        self
    }

    /// Set the demand requested from each inner `Flow` up front.
    ///
    /// # Panics
    /// Panics if `n == 0`: `prefetch <= 0` is a constraint violation.
    #[must_use]
    pub fn prefetch(mut self, n: usize) -> Self {
        assert!(n >= 1, "flat_map: prefetch must be >= 1, got {n}");
        self.prefetch = n;
        self
    }

    /// Select error-accumulation (`true`) over fail-fast (`false`,
    /// the default).
    #[must_use]
    pub fn delay_errors(mut self, delay: bool) -> Self {
        self.delay_errors = delay;
        self
    }
}

/// `flatMap(mapper, delayErrors, maxConcurrency, prefetch)`.
///
/// For each upstream item, `mapper` produces an inner `Flow`; up to
/// `config.max_concurrency` inners run at once, each prefetching
/// `config.prefetch` items into a bounded per-inner queue that the drain
/// loop empties downstream in round-robin order as demand allows.
///
/// Scalar fast path: an inner built by `just(v)` (or
/// anything else tagged via `Flow::with_scalar_hint`) is recognized via
/// [`flow_core::Flow::take_scalar_hint`] and enqueued as an
/// already-complete single-item entry, skipping the subscribe-function,
/// `Subscriber`, and `Subscription` machinery a real subscription would
/// allocate for it — see [`FlatMapState::subscribe_inner`].
pub fn flat_map<T, R, F>(upstream: Flow<T>, mapper: F, config: FlatMapConfig) -> Flow<R>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
    F: Fn(T) -> Flow<R> + Send + Sync + 'static,
{
    let mapper = Arc::new(mapper);
    Flow::create(move |downstream: Arc<dyn Subscriber<R>>| {
        let state = Arc::new(FlatMapState::new(downstream, config));
        upstream.subscribe_publisher(Arc::new(UpstreamSubscriber {
            state: Arc::clone(&state),
            mapper: Arc::clone(&mapper),
            _marker: std::marker::PhantomData,
        }));
    })
}

/// `merge(sources...)`: `flatMap(identity)` over a fixed
/// set of sources, with concurrency equal to the source count so every
/// one of them runs at once (there is no backlog of not-yet-subscribed
/// sources to throttle, unlike the general `flatMap` case). Fail-fast.
#[must_use]
pub fn merge<T>(sources: Vec<Flow<T>>) -> Flow<T>
where
    T: Send + Sync + 'static,
{
    merge_with(sources, false)
}

/// `mergeDelayError(sources...)`: [`merge`] with
/// `delayErrors` selected, so a failing source doesn't cut the others
/// off.
#[must_use]
pub fn merge_delay_error<T>(sources: Vec<Flow<T>>) -> Flow<T>
where
    T: Send + Sync + 'static,
{
    merge_with(sources, true)
}

fn merge_with<T>(sources: Vec<Flow<T>>, delay_errors: bool) -> Flow<T>
where
    T: Send + Sync + 'static,
{
    let concurrency = sources.len().max(1);
    let config = FlatMapConfig::default()
        .max_concurrency(concurrency)
        .delay_errors(delay_errors);
    flat_map(crate::sources::from_iterable(sources), |inner| inner, config)
}

/// Per-inner bookkeeping: its buffered-not-yet-emitted items, whether it
/// has reached a terminal signal of its own, and the subscription used
/// to replenish its demand.
struct InnerEntry<R> {
    id: u64,
    queue: VecDeque<R>,
    done: bool,
    subscription: Option<Arc<dyn Subscription>>,
}

struct FlatMapState<R> {
    downstream: Arc<dyn Subscriber<R>>,
    max_concurrency: usize,
    prefetch: usize,
    delay_errors: bool,
    upstream_sub: Mutex<Option<Arc<dyn Subscription>>>,
    upstream_done: AtomicBool,
    cancelled: AtomicBool,
    terminated: AtomicBool,
    downstream_demand: AtomicU64,
    next_inner_id: AtomicU64,
    inners: Mutex<VecDeque<InnerEntry<R>>>,
    errors: Mutex<Vec<FlowError>>,
    trampoline: Trampoline,
}

impl<R: Send + Sync + 'static> FlatMapState<R> {
    fn new(downstream: Arc<dyn Subscriber<R>>, config: FlatMapConfig) -> Self {
        Self {
            downstream,
            max_concurrency: config.max_concurrency,
            prefetch: config.prefetch,
            delay_errors: config.delay_errors,
            upstream_sub: Mutex::new(None),
            upstream_done: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            terminated: AtomicBool::new(false),
            downstream_demand: AtomicU64::new(0),
            next_inner_id: AtomicU64::new(0),
            inners: Mutex::new(VecDeque::new()),
            errors: Mutex::new(Vec::new()),
            trampoline: Trampoline::new(),
        }
    }

    fn initial_request(&self) -> u64 {
        if self.max_concurrency == usize::MAX {
            UNBOUNDED
        } else {
            self.max_concurrency as u64
        }
    }

    /// Step 2: subscribe a freshly mapped inner `Flow`, allocate its
    /// queue, and request `prefetch` from it — or, if `inner` carries a
    /// scalar hint, skip straight to [`Self::emit_scalar`] and never
    /// subscribe it at all.
    ///
    /// Takes `state` as an explicit `&Arc<Self>` — rather than as a
    /// receiver — because it needs to clone the `Arc` itself into the
    /// new `InnerSubscriber`, and `self: &Arc<Self>` is not among the
    /// smart-pointer receiver types stable Rust special-cases (only
    /// `Self`, `&Self`, `&mut Self`, and owned `Box`/`Rc`/`Arc`/`Pin`
    /// receivers are).
    fn subscribe_inner(state: &Arc<Self>, inner: Flow<R>) {
        if state.cancelled.load(Ordering::Acquire) {
            return;
        }
        if let Some(value) = inner.take_scalar_hint() {
            Self::emit_scalar(state, value);
            return;
        }
        let id = state.next_inner_id.fetch_add(1, Ordering::AcqRel);
        state.inners.lock().push_back(InnerEntry {
            id,
            queue: VecDeque::new(),
            done: false,
            subscription: None,
        });
        inner.subscribe_publisher(Arc::new(InnerSubscriber {
            state: Arc::clone(state),
            id,
        }));
    }

    /// The scalar fast path itself: enqueue `value` as an already-`done`
    /// one-item entry, so the drain loop pops and frees it exactly as it
    /// would a real inner that emitted once and completed, without ever
    /// constructing a `Subscriber`/`Subscription` pair for it.
    fn emit_scalar(state: &Arc<Self>, value: R) {
        let id = state.next_inner_id.fetch_add(1, Ordering::AcqRel);
        let mut queue = VecDeque::with_capacity(1);
        queue.push_back(value);
        state.inners.lock().push_back(InnerEntry {
            id,
            queue,
            done: true,
            subscription: None,
        });
        state.drain();
    }

    /// Step 3: an inner emitted a value — enqueue it and drain.
    fn inner_next(&self, id: u64, value: R) {
        let mut inners = self.inners.lock();
        if let Some(entry) = inners.iter_mut().find(|e| e.id == id) {
            entry.queue.push_back(value);
        }
    }

    /// Step 2 (mapper failure) / step 5: an error from a mapper
    /// invocation or an inner `Flow`. Fail-fast terminates immediately;
    /// `delayErrors` accumulates and treats the source as done.
    fn inner_error(&self, id: Option<u64>, error: FlowError) {
        if self.delay_errors {
            self.errors.lock().push(error);
            if let Some(id) = id {
                self.mark_inner_done(id);
            }
            self.drain();
        } else {
            self.terminate_with_error(error);
        }
    }

    /// Step 4: an inner completed. If its queue is already empty, its
    /// slot is freed immediately; otherwise the drain loop frees it once
    /// the queue is exhausted.
    fn mark_inner_done(&self, id: u64) {
        let freed = {
            let mut inners = self.inners.lock();
            if let Some(pos) = inners.iter().position(|e| e.id == id) {
                if inners[pos].queue.is_empty() {
                    inners.remove(pos);
                    true
                } else {
                    inners[pos].done = true;
                    false
                }
            } else {
                false
            }
        };
        if freed {
            self.release_inner_slot();
        }
    }

    /// Step 4: release one concurrency slot and request one more source
    /// from upstream, unless upstream is already exhausted or cancelled.
    fn release_inner_slot(&self) {
        if self.upstream_done.load(Ordering::Acquire) || self.cancelled.load(Ordering::Acquire) {
            return;
        }
        if let Some(upstream) = self.upstream_sub.lock().as_ref() {
            upstream.request(1);
        }
    }

    fn request_one_inner(&self, id: u64) {
        let subscription = {
            let inners = self.inners.lock();
            inners
                .iter()
                .find(|e| e.id == id)
                .and_then(|e| e.subscription.clone())
        };
        if let Some(subscription) = subscription {
            subscription.request(1);
        }
    }

    /// The drain loop's trampoline entry point: every caller — upstream,
    /// an inner, downstream `request`, downstream `cancel` — routes
    /// through here, and exactly one of them at a time actually walks
    /// the queues.
    fn drain(&self) {
        if !self.trampoline.enter() {
            return;
        }
        loop {
            self.drain_pass();
            if !self.trampoline.leave() {
                break;
            }
        }
    }

    fn drain_pass(&self) {
        log_drain_iteration(self.inners.lock().len());
        if self.terminated.load(Ordering::Acquire) {
            return;
        }
        if self.cancelled.load(Ordering::Acquire) {
            self.clear_all();
            return;
        }
        loop {
            if self.cancelled.load(Ordering::Acquire) {
                self.clear_all();
                return;
            }
            let demand = self.downstream_demand.load(Ordering::Acquire);
            if demand == 0 {
                break;
            }
            match self.pop_next() {
                Some((item, id, still_alive)) => {
                    if demand != UNBOUNDED {
                        self.downstream_demand.fetch_sub(1, Ordering::AcqRel);
                    }
                    self.downstream.on_next(item);
                    if still_alive {
                        self.request_one_inner(id);
                    } else {
                        self.release_inner_slot();
                    }
                }
                None => break,
            }
        }
        self.maybe_finish();
    }

    /// Round-robin fairness — no inner may be starved indefinitely:
    /// rotate each inner with an empty queue to the back
    /// without consuming a turn, and pop from the first one that has
    /// something buffered. Returns the popped item, the inner's id, and
    /// whether the inner is still alive (has more to come) so the
    /// caller knows whether to replenish its demand or free its slot.
    fn pop_next(&self) -> Option<(R, u64, bool)> {
        let mut inners = self.inners.lock();
        let rounds = inners.len();
        for _ in 0..rounds {
            let mut entry = inners.pop_front()?;
            if let Some(item) = entry.queue.pop_front() {
                let id = entry.id;
                let still_alive = !(entry.done && entry.queue.is_empty());
                if still_alive {
                    inners.push_back(entry);
                }
                return Some((item, id, still_alive));
            }
            inners.push_back(entry);
        }
        None
    }

    /// Step 6 / drain-loop terminal condition (b): upstream exhausted,
    /// no inners left active, emit completion or the accumulated
    /// composite error.
    fn maybe_finish(&self) {
        if self.terminated.load(Ordering::Acquire) || self.cancelled.load(Ordering::Acquire) {
            return;
        }
        if !self.upstream_done.load(Ordering::Acquire) {
            return;
        }
        if !self.inners.lock().is_empty() {
            return;
        }
        if self.terminated.swap(true, Ordering::AcqRel) {
            return;
        }
        let errors = std::mem::take(&mut *self.errors.lock());
        if errors.is_empty() {
            self.downstream.on_complete();
        } else {
            self.downstream.on_error(FlowError::composite(errors));
        }
    }

    /// Fail-fast termination: cancel everything upstream and emit the
    /// error, guarded so a racing success path can never double-signal.
    fn terminate_with_error(&self, error: FlowError) {
        if self.terminated.swap(true, Ordering::AcqRel) {
            return;
        }
        self.cancel_all();
        self.downstream.on_error(error);
    }

    fn cancel_all(&self) {
        if let Some(upstream) = self.upstream_sub.lock().take() {
            upstream.cancel();
        }
        let mut inners = self.inners.lock();
        for entry in inners.iter_mut() {
            if let Some(subscription) = entry.subscription.take() {
                subscription.cancel();
            }
        }
        inners.clear();
    }

    /// Downstream `cancel` (terminal condition (a)): abandon the drain
    /// and release every resource without ever signaling downstream.
    fn clear_all(&self) {
        self.terminated.store(true, Ordering::Release);
        self.cancel_all();
    }
}

struct UpstreamSubscriber<T, R, F> {
    state: Arc<FlatMapState<R>>,
    mapper: Arc<F>,
    _marker: std::marker::PhantomData<fn(T)>,
}

impl<T, R, F> Subscriber<T> for UpstreamSubscriber<T, R, F>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
    F: Fn(T) -> Flow<R> + Send + Sync + 'static,
{
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        log_subscribed();
        let request_amount = self.state.initial_request();
        *self.state.upstream_sub.lock() = Some(Arc::clone(&subscription));
        self.state.downstream.on_subscribe(Arc::new(FlatMapSubscription {
            state: Arc::clone(&self.state),
        }));
        subscription.request(request_amount);
    }

    fn on_next(&self, value: T) {
        if self.state.cancelled.load(Ordering::Acquire) {
            return;
        }
        let mapper = Arc::clone(&self.mapper);
        match catch_user(move || mapper(value)) {
            Ok(inner) => FlatMapState::subscribe_inner(&self.state, inner),
            Err(error) => self.state.inner_error(None, error),
        }
    }

    fn on_error(&self, error: FlowError) {
        self.state.upstream_sub.lock().take();
        if self.state.delay_errors {
            self.state.errors.lock().push(error);
            self.state.upstream_done.store(true, Ordering::Release);
            self.state.drain();
        } else {
            self.state.terminate_with_error(error);
        }
    }

    fn on_complete(&self) {
        self.state.upstream_sub.lock().take();
        self.state.upstream_done.store(true, Ordering::Release);
        self.state.drain();
    }
}

struct InnerSubscriber<R> {
    state: Arc<FlatMapState<R>>,
    id: u64,
}

impl<R: Send + Sync + 'static> Subscriber<R> for InnerSubscriber<R> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        {
            let mut inners = self.state.inners.lock();
            if let Some(entry) = inners.iter_mut().find(|e| e.id == self.id) {
                entry.subscription = Some(Arc::clone(&subscription));
            }
        }
        #[allow(clippy::cast_possible_truncation)]
        let prefetch = self.state.prefetch as u64;
        subscription.request(prefetch);
    }

    fn on_next(&self, value: R) {
        self.state.inner_next(self.id, value);
        self.state.drain();
    }

    fn on_error(&self, error: FlowError) {
        self.state.inner_error(Some(self.id), error);
    }

    fn on_complete(&self) {
        self.state.mark_inner_done(self.id);
        self.state.drain();
    }
}

struct FlatMapSubscription<R> {
    state: Arc<FlatMapState<R>>,
}

impl<R: Send + Sync + 'static> Subscription for FlatMapSubscription<R> {
    fn request(&self, n: u64) {
        if n == 0 {
            self.state.terminate_with_error(FlowError::constraint("request(n) called with n == 0"));
            return;
        }
        log_demand_requested(n);
        self.state
            .downstream_demand
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |total| {
                Some(saturating_add_demand(total, n))
            })
            .ok();
        self.state.drain();
    }

    fn cancel(&self) {
        log_cancelled();
        self.state.cancelled.store(true, Ordering::Release);
        self.state.drain();
    }
}

fn log_subscribed() {
    #[cfg(feature = "tracing")]
    tracing::debug!("flat_map: subscribed to upstream");
}

fn log_cancelled() {
    #[cfg(feature = "tracing")]
    tracing::debug!("flat_map: downstream cancelled");
}

fn log_drain_iteration(active_inners: usize) {
    #[cfg(feature = "tracing")]
    tracing::trace!(active_inners, "flat_map: drain loop iteration");
    #[cfg(not(feature = "tracing"))]
    {
        let _ = active_inners;
    }
}

fn log_demand_requested(n: u64) {
    #[cfg(feature = "tracing")]
    tracing::trace!(n, "flat_map: downstream requested more demand");
    #[cfg(not(feature = "tracing"))]
    {
        let _ = n;
    }
}
