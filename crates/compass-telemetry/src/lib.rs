//! COMPASS Telemetry - observability backend seam
//!
//! Defines the [`TelemetryProvider`] trait that specialist agents and
//! disproof strategies query, plus a deterministic in-memory
//! implementation for tests and demos.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod memory;
pub mod provider;

pub use memory::MemoryTelemetry;
pub use provider::{MetricQuery, Sample, TelemetryError, TelemetryProvider, TimeRange};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
