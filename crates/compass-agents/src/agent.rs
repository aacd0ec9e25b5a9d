//! Specialist agent capability interface
//!
//! Agents are the Observe/Orient workers of the investigation: each one
//! watches a domain (application, database, network), turns telemetry into
//! observations, and proposes falsifiable hypotheses. The orchestrator
//! treats them uniformly through [`SpecialistAgent`] and reads each
//! agent's running cost counter after every call.

use compass_model::{AgentRole, Cost, Hypothesis, Incident, ModelError, Observation};
use compass_telemetry::{TelemetryError, TimeRange};
use chrono::Duration;

pub use compass_model::CostMeter;

/// Agent-level errors
///
/// All of these are recoverable from the orchestrator's point of view: a
/// failing agent degrades the investigation, it does not abort it.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The telemetry backend failed
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    /// Hypothesis construction failed
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Any other agent failure
    #[error("agent failure: {0}")]
    Failed(String),
}

/// Specialist agent capability set
#[async_trait::async_trait]
pub trait SpecialistAgent: Send + Sync + std::fmt::Debug {
    /// Domain this agent covers
    fn role(&self) -> AgentRole;

    /// Observe the incident and return typed facts
    async fn observe(&self, incident: &Incident) -> Result<Vec<Observation>, AgentError>;

    /// Propose hypotheses from the full observation set
    async fn generate_hypotheses(
        &self,
        observations: &[Observation],
    ) -> Result<Vec<Hypothesis>, AgentError>;

    /// Read-only running cost counter
    fn cost(&self) -> Cost;
}

/// Query window around an incident start
///
/// Half an hour back for baseline, half an hour forward for the incident
/// itself.
#[must_use]
pub fn incident_window(incident: &Incident) -> TimeRange {
    TimeRange::around(
        incident.started_at,
        Duration::minutes(30),
        Duration::minutes(30),
    )
}

/// Mean/peak summary of a metric series
#[derive(Debug, Clone, Copy)]
pub(crate) struct SeriesSummary {
    pub(crate) mean: f64,
    pub(crate) peak: f64,
    pub(crate) sample_count: usize,
}

/// Summarize a series; `None` when empty
pub(crate) fn summarize(samples: &[compass_telemetry::Sample]) -> Option<SeriesSummary> {
    if samples.is_empty() {
        return None;
    }
    let sum: f64 = samples.iter().map(|s| s.value).sum();
    let peak = samples.iter().map(|s| s.value).fold(f64::MIN, f64::max);
    Some(SeriesSummary {
        mean: sum / samples.len() as f64,
        peak,
        sample_count: samples.len(),
    })
}

/// First timestamp at which a series crosses `threshold`, with the peak
/// value reached over the whole series
pub(crate) fn detect_onset(
    samples: &[compass_telemetry::Sample],
    threshold: f64,
) -> Option<(chrono::DateTime<chrono::Utc>, f64)> {
    let onset = samples.iter().find(|s| s.value > threshold)?;
    let peak = samples.iter().map(|s| s.value).fold(f64::MIN, f64::max);
    Some((onset.at, peak))
}
