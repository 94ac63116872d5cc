// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the Flow reactive streaming protocol.
//!
//! [`FlowError`] is the single error type delivered through `onError` and
//! surfaced by constraint checks (null/invalid arguments, malformed
//! `request(n)` calls, and so on). See the module-level docs in `flow-core`
//! for how the three kinds map onto the protocol.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Root error type for all Flow operations.
///
/// `FlowError` is cheap to clone (the underlying cause is held behind an
/// `Arc`) so the same error can be delivered to a subscriber's `onError`
/// *and* handed to the plugin `on_error` hook without re-running or losing
/// the original cause.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FlowError {
    /// A programmer error raised synchronously at the call site: a null
    /// argument, `request(n)` with `n == 0`, a negative `take`/`skip`
    /// count, `range` overflow, or a non-positive `max_concurrency`/
    /// `prefetch`.
    #[error("constraint violation: {context}")]
    Constraint {
        /// What constraint was violated.
        context: String,
    },

    /// A failure raised by a source, mapper, predicate, or inner `Flow`.
    #[error("upstream failure: {0}")]
    Upstream(#[source] Arc<dyn StdError + Send + Sync>),

    /// The aggregated error `flat_map`/`merge` produce when `delay_errors`
    /// is set and more than one inner `Flow` failed.
    #[error("{} errors occurred", .0.len())]
    Composite(Arc<Vec<FlowError>>),
}

impl FlowError {
    /// Build a [`FlowError::Constraint`] from a context message.
    #[must_use]
    pub fn constraint(context: impl Into<String>) -> Self {
        Self::Constraint {
            context: context.into(),
        }
    }

    /// Wrap an arbitrary error as an [`FlowError::Upstream`] failure.
    pub fn upstream(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::Upstream(Arc::new(error))
    }

    /// Wrap an arbitrary error as an [`FlowError::Upstream`] failure from a
    /// plain message, for call sites that don't have a typed error handy.
    #[must_use]
    pub fn upstream_message(message: impl Into<String>) -> Self {
        Self::Upstream(Arc::new(MessageError(message.into())))
    }

    /// Aggregate several errors into a [`FlowError::Composite`].
    ///
    /// A single error is returned unwrapped rather than as a one-element
    /// composite, matching the fail-fast path's shape.
    #[must_use]
    pub fn composite(mut errors: Vec<FlowError>) -> Self {
        if errors.len() == 1 {
            return errors.remove(0);
        }
        Self::Composite(Arc::new(errors))
    }

    /// `true` for [`FlowError::Constraint`] — a programmer error raised at
    /// the call site rather than delivered through `onError`.
    #[must_use]
    pub const fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint { .. })
    }
}

#[derive(Debug)]
struct MessageError(String);

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for MessageError {}

/// Specialized `Result` for Flow operations.
pub type Result<T> = std::result::Result<T, FlowError>;
