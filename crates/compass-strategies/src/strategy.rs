//! Disproof strategy trait and outcome types
//!
//! A strategy is one falsification procedure. Its result is an explicit
//! [`StrategyOutcome`] (survived, disproven, or inconclusive) so that
//! "the hypothesis held", "the hypothesis is dead", and "the data source
//! had nothing to say" are three different values, not three ways of
//! (mis)using exceptions.

use chrono::Duration;
use compass_model::{ClaimKind, Cost, Evidence, Hypothesis, Incident};
use compass_telemetry::{TelemetryError, TimeRange};

/// Trial verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyVerdict {
    /// The hypothesis survived the trial
    Survived,
    /// The trial disproved the hypothesis
    Disproven,
    /// The trial could not reach a conclusion (e.g. no data in the window)
    Inconclusive,
}

/// Result of one executed falsification trial
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    /// Verdict of the trial
    pub verdict: StrategyVerdict,
    /// How the trial was performed
    pub method: String,
    /// What would hold if the hypothesis were true
    pub prediction: String,
    /// What was actually observed
    pub observed: String,
    /// Evidence collected during the trial
    pub evidence: Vec<Evidence>,
    /// Free-text reasoning
    pub reasoning: String,
}

impl StrategyOutcome {
    /// Outcome for a trial the hypothesis survived
    ///
    /// Evidence items must support the hypothesis.
    #[must_use]
    pub fn survived(
        method: impl Into<String>,
        prediction: impl Into<String>,
        observed: impl Into<String>,
        evidence: Vec<Evidence>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            verdict: StrategyVerdict::Survived,
            method: method.into(),
            prediction: prediction.into(),
            observed: observed.into(),
            evidence,
            reasoning: reasoning.into(),
        }
    }

    /// Outcome for a trial that disproved the hypothesis
    ///
    /// Evidence items must contradict the hypothesis.
    #[must_use]
    pub fn disproven(
        method: impl Into<String>,
        prediction: impl Into<String>,
        observed: impl Into<String>,
        evidence: Vec<Evidence>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            verdict: StrategyVerdict::Disproven,
            method: method.into(),
            prediction: prediction.into(),
            observed: observed.into(),
            evidence,
            reasoning: reasoning.into(),
        }
    }

    /// Outcome for a trial that could not conclude
    #[must_use]
    pub fn inconclusive(
        method: impl Into<String>,
        prediction: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            verdict: StrategyVerdict::Inconclusive,
            method: method.into(),
            prediction: prediction.into(),
            observed: "no conclusive data".to_string(),
            evidence: Vec::new(),
            reasoning: reasoning.into(),
        }
    }
}

/// Strategy execution errors
///
/// Only raised when the trial could not run at all; "ran and found
/// nothing" is [`StrategyVerdict::Inconclusive`], not an error.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// The telemetry backend failed
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    /// The strategy was handed a claim kind it does not test
    #[error("strategy {strategy} does not apply to {kind:?} claims")]
    ClaimMismatch {
        /// Strategy name
        strategy: &'static str,
        /// Claim kind that was offered
        kind: ClaimKind,
    },
}

/// A pluggable falsification procedure
#[async_trait::async_trait]
pub trait DisproofStrategy: Send + Sync + std::fmt::Debug {
    /// Strategy name (used in attempt records and the cost ledger)
    fn name(&self) -> &'static str;

    /// Whether this strategy can test the given claim kind
    fn applies_to(&self, kind: ClaimKind) -> bool;

    /// Execute one trial against the hypothesis
    async fn execute(
        &self,
        hypothesis: &Hypothesis,
        incident: &Incident,
    ) -> Result<StrategyOutcome, StrategyError>;

    /// Read-only running cost counter
    fn cost(&self) -> Cost;
}

/// Query window around an incident start
pub(crate) fn incident_window(incident: &Incident) -> TimeRange {
    TimeRange::around(
        incident.started_at,
        Duration::minutes(30),
        Duration::minutes(30),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inconclusive_outcome_has_no_evidence() {
        let outcome = StrategyOutcome::inconclusive("query series", "peak > 0.05", "no samples");
        assert_eq!(outcome.verdict, StrategyVerdict::Inconclusive);
        assert!(outcome.evidence.is_empty());
    }
}
