//! COMPASS Agents - domain specialists
//!
//! The Observe/Orient workers of an investigation. Each specialist covers
//! one domain (application, database, network), turns telemetry into typed
//! observations, proposes falsifiable hypotheses, and meters its own
//! spend.
//!
//! # Example
//!
//! ```rust,ignore
//! use compass_agents::{ApplicationAgent, SpecialistAgent};
//! use std::sync::Arc;
//!
//! # async fn example(provider: Arc<dyn compass_telemetry::TelemetryProvider>) {
//! let agent = ApplicationAgent::new(provider);
//! let observations = agent.observe(&incident).await?;
//! let hypotheses = agent.generate_hypotheses(&observations).await?;
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod agent;
pub mod application;
pub mod database;
pub mod network;

pub use agent::{incident_window, AgentError, CostMeter, SpecialistAgent};
pub use application::ApplicationAgent;
pub use database::DatabaseAgent;
pub use network::NetworkAgent;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
