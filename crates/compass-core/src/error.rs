//! Error taxonomy for the orchestrator
//!
//! Three classes cross component boundaries:
//! - budget-exceeded: fatal, never suppressed, carries the full cost
//!   breakdown so the caller can report where the money went;
//! - human cancellation: distinct from failure, re-raised so the caller
//!   exits cleanly;
//! - input validation: fatal for the offending call, with a specific
//!   message.
//!
//! Everything else (agent failures, strategy failures, timeouts) is
//! absorbed at the point of occurrence and degrades the investigation
//! instead of aborting it, so it never appears here.

use crate::types::Phase;
use compass_model::{Cost, HypothesisId, IncidentId, ModelError};

/// Main orchestrator error type
#[derive(Debug, thiserror::Error)]
pub enum CompassError {
    /// Cumulative cost crossed the configured ceiling
    #[error(
        "budget exceeded during {phase} at {boundary}: spent {spent} of {limit} ceiling"
    )]
    BudgetExceeded {
        /// Phase in which the ceiling was crossed
        phase: Phase,
        /// Agent or strategy boundary attributable for the overage
        boundary: String,
        /// Total spent at the point of failure
        spent: Cost,
        /// Configured ceiling
        limit: Cost,
        /// Per-source cost breakdown at the point of failure
        breakdown: Vec<(String, Cost)>,
    },

    /// Decide called with nothing to present
    #[error("no hypotheses to present for incident {incident_id}")]
    NoHypotheses {
        /// Incident under investigation
        incident_id: IncidentId,
    },

    /// The human selected a hypothesis that was not presented
    #[error("selected hypothesis {hypothesis_id} was not among those presented")]
    UnknownSelection {
        /// The unknown id
        hypothesis_id: HypothesisId,
    },

    /// The operator aborted the decision prompt
    #[error("decision cancelled by operator")]
    DecisionCancelled,

    /// The decision interface failed outright
    #[error("decision interface failure: {0}")]
    DecisionFailed(String),

    /// Orchestrator construction error
    #[error("configuration error: {0}")]
    Config(String),

    /// Model invariant violation
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl CompassError {
    /// Whether this is the non-recoverable budget failure
    #[inline]
    #[must_use]
    pub fn is_budget_exceeded(&self) -> bool {
        matches!(self, Self::BudgetExceeded { .. })
    }

    /// Whether this is a human cancellation rather than a failure
    #[inline]
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::DecisionCancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_error_names_boundary_and_costs() {
        let err = CompassError::BudgetExceeded {
            phase: Phase::Observe,
            boundary: "database".to_string(),
            spent: Cost::from_dollars(11.0),
            limit: Cost::from_dollars(10.0),
            breakdown: vec![],
        };
        let msg = err.to_string();
        assert!(msg.contains("observe"));
        assert!(msg.contains("database"));
        assert!(msg.contains("$11.00"));
        assert!(msg.contains("$10.00"));
        assert!(err.is_budget_exceeded());
    }

    #[test]
    fn no_hypotheses_error_is_descriptive() {
        let err = CompassError::NoHypotheses {
            incident_id: IncidentId::new(),
        };
        assert!(err.to_string().contains("no hypotheses to present"));
    }

    #[test]
    fn cancellation_is_not_budget() {
        let err = CompassError::DecisionCancelled;
        assert!(err.is_cancellation());
        assert!(!err.is_budget_exceeded());
    }
}
