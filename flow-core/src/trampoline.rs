// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A reusable drain trampoline: serializes concurrent re-entrant work via
//! an atomic counter, avoiding both recursive call stacks and holding a
//! lock across user callbacks.
//!
//! # Usage
//!
//! ```
//! use flow_core::trampoline::Trampoline;
//! use std::sync::Arc;
//!
//! fn drain_once() { /* emit whatever is currently available */ }
//!
//! fn schedule(trampoline: &Trampoline) {
//!     if trampoline.enter() {
//!         loop {
//!             drain_once();
//!             if !trampoline.leave() {
//!                 break;
//!             }
//!         }
//!     }
//! }
//!
//! let trampoline = Arc::new(Trampoline::new());
//! schedule(&trampoline);
//! ```

use std::sync::atomic::{AtomicI64, Ordering};

/// An atomic work-in-progress counter implementing the trampoline
/// pattern: the first caller to `enter` while idle becomes the drainer
/// and loops until no further work was queued while it ran; every other
/// concurrent caller just increments the counter and returns, trusting
/// the active drainer to pick their work up on its next pass.
#[derive(Debug, Default)]
pub struct Trampoline {
    wip: AtomicI64,
}

impl Trampoline {
    /// Create an idle trampoline.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            wip: AtomicI64::new(0),
        }
    }

    /// Announce that there is work to drain. Returns `true` exactly for
    /// the caller that must actually perform the draining (the
    /// trampoline was idle); every other concurrent caller gets `false`
    /// and must not drain itself — the active drainer's next `leave`
    /// will observe its contribution instead.
    pub fn enter(&self) -> bool {
        self.wip.fetch_add(1, Ordering::SeqCst) == 0
    }

    /// Called by the active drainer after each pass. Returns `true` if
    /// more work arrived while draining (the drainer must loop again),
    /// or `false` if the trampoline is now idle and the drainer must
    /// stop.
    pub fn leave(&self) -> bool {
        self.wip.fetch_sub(1, Ordering::SeqCst) != 1
    }

    /// `true` if some caller is currently the active drainer.
    pub fn is_active(&self) -> bool {
        self.wip.load(Ordering::SeqCst) > 0
    }
}
