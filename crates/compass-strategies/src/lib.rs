//! COMPASS Strategies - pluggable falsification
//!
//! Disproof strategies are the Act-phase workers: each one knows how to
//! attack one kind of claim. Outcomes are explicit values (survived /
//! disproven / inconclusive); errors are reserved for trials that could
//! not run at all.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod registry;
pub mod scope;
pub mod strategy;
pub mod temporal;
pub mod threshold;

pub use registry::StrategyRegistry;
pub use scope::ScopeVerificationStrategy;
pub use strategy::{DisproofStrategy, StrategyError, StrategyOutcome, StrategyVerdict};
pub use temporal::TemporalContradictionStrategy;
pub use threshold::MetricThresholdStrategy;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
