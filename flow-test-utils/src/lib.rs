// Copyright 2026 The Flow Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test collaborators for the Flow workspace: subscribers that record
//! signals for assertions, and a couple of small fixture types for
//! readable test data. Not part of the production `flow` crate's
//! dependency graph — this crate is a dev-dependency only.

pub mod animal;
pub mod manual_subscriber;
pub mod person;
pub mod recorder;
pub mod recording_subscriber;

pub use animal::Animal;
pub use manual_subscriber::ManualSubscriber;
pub use person::Person;
pub use recorder::{Recorder, Signal};
pub use recording_subscriber::RecordingSubscriber;
