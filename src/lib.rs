// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate log;

pub mod logger;

pub mod collector;
pub mod config;
mod error;
pub mod observations;
pub mod plot;
pub mod record;
pub mod render;
pub mod trace;

pub use crate::collector::{Point, ResultCollector, Series};
pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::observations::{Observation, ObservationTable};
pub use crate::record::{commit_label, BenchmarkId, BenchmarkRecord, Timestamp};
pub use crate::trace::{InferenceTrace, Summary, Variable};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
