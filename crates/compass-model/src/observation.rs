//! Observations and the specialist roles that produce them

use crate::ids::ObservationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Specialist agent role
///
/// Agents are always invoked in the declared order below, which keeps
/// investigation runs deterministic and log output reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    /// Application-layer specialist (error rates, request latency)
    Application,
    /// Database specialist (query latency, connection pools)
    Database,
    /// Network specialist (packet loss, retransmits)
    Network,
}

impl AgentRole {
    /// All roles in invocation order
    pub const ALL: [AgentRole; 3] = [AgentRole::Application, AgentRole::Database, AgentRole::Network];

    /// String form for logs and cost-ledger labels
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Application => "application",
            AgentRole::Database => "database",
            AgentRole::Network => "network",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed observation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObservationPayload {
    /// Summary of a metric series over the incident window
    MetricSummary {
        /// Service the metric belongs to
        service: String,
        /// Metric name
        metric: String,
        /// Mean over the window
        mean: f64,
        /// Peak over the window
        peak: f64,
        /// Number of samples summarized
        sample_count: usize,
    },
    /// Error volume for a service over the incident window
    ErrorVolume {
        /// Service name
        service: String,
        /// Error count
        count: u64,
    },
    /// Detected anomaly onset in a metric series
    AnomalyOnset {
        /// Service the metric belongs to
        service: String,
        /// Metric name
        metric: String,
        /// When the series first left its baseline
        onset: DateTime<Utc>,
        /// Peak value reached after onset
        magnitude: f64,
    },
    /// Free-form analyst note
    Note(String),
}

/// A typed fact produced by a specialist agent
///
/// Appended to the investigation's observation list; never mutated after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Observation identifier
    pub id: ObservationId,
    /// Agent that produced this observation
    pub source: AgentRole,
    /// The observed fact
    pub payload: ObservationPayload,
    /// When the observation was recorded
    pub recorded_at: DateTime<Utc>,
    /// Confidence in the collection itself, in [0.0, 1.0]
    pub collection_confidence: f64,
}

impl Observation {
    /// Create a new observation, clamping collection confidence into range
    #[must_use]
    pub fn new(source: AgentRole, payload: ObservationPayload, collection_confidence: f64) -> Self {
        Self {
            id: ObservationId::new(),
            source,
            payload,
            recorded_at: Utc::now(),
            collection_confidence: collection_confidence.clamp(0.0, 1.0),
        }
    }
}
