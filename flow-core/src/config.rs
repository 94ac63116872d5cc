// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Process-level configuration.
//!
//! A single integer, `default_buffer_size`, read once at initialization:
//! the maximum of 16 and a caller-supplied value (default 128), used as
//! the default prefetch for `flat_map`/`merge`.

use std::sync::OnceLock;

const MIN_BUFFER_SIZE: usize = 16;
const DEFAULT_BUFFER_SIZE: usize = 128;

fn buffer_size_cell() -> &'static OnceLock<usize> {
    static CELL: OnceLock<usize> = OnceLock::new();
    &CELL
}

/// Set the default buffer size before it is first read.
///
/// This is set-before-use configuration, matching the plugin hook
/// lifecycle: once any call to [`default_buffer_size`] has happened
/// (directly, or via the first `flat_map`/`merge` built without an
/// explicit prefetch), the value is latched and further calls to this
/// function have no effect. `requested` is floored at 16 regardless of
/// what's passed.
pub fn configure_buffer_size(requested: usize) {
    let _ = buffer_size_cell().get_or_init(|| requested.max(MIN_BUFFER_SIZE));
}

/// The process's default prefetch/buffer size, used when `flat_map`/
/// `merge` are built without an explicit prefetch.
#[must_use]
pub fn default_buffer_size() -> usize {
    *buffer_size_cell().get_or_init(|| DEFAULT_BUFFER_SIZE)
}
