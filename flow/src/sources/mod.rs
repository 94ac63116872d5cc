// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The cold source factories.

mod defer;
mod empty;
mod error;
mod from_callable;
mod from_future;
mod from_iterable;
mod from_stream;
pub(crate) mod iter_drain;
mod just;
mod never;
mod range;

pub use defer::defer;
pub use empty::empty;
pub use error::{error, error_with};
pub use from_callable::from_callable;
pub use from_future::from_future;
pub use from_iterable::{from_array, from_iterable};
pub use from_stream::from_stream;
pub use just::just;
pub use never::never;
pub use range::range;
