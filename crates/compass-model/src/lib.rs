//! COMPASS Model - the scientific framework
//!
//! Leaf data model for incident investigations:
//! - Incidents, observations, and the specialist roles that produce them
//! - Hypotheses with typed claims and a status state machine
//! - Quality-tagged evidence and disproof attempt records
//! - The confidence recalculation rule
//! - Monetary cost units for budget accounting

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod claim;
pub mod confidence;
pub mod cost;
pub mod disproof;
pub mod error;
pub mod evidence;
pub mod hypothesis;
pub mod ids;
pub mod incident;
pub mod observation;
pub mod status;

// Re-exports for convenience
pub use claim::{ClaimKind, HypothesisClaim, ThresholdOperator};
pub use cost::{Cost, CostMeter};
pub use disproof::DisproofAttempt;
pub use error::ModelError;
pub use evidence::{Evidence, EvidenceQuality};
pub use hypothesis::Hypothesis;
pub use ids::{HypothesisId, IncidentId, ObservationId};
pub use incident::{Incident, Severity};
pub use observation::{AgentRole, Observation, ObservationPayload};
pub use status::{allowed_transitions, validate_transition, HypothesisStatus};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
