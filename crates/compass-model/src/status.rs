//! Hypothesis status state machine

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HypothesisStatus {
    /// Proposed by an agent, not yet tested
    Proposed,
    /// Under (or between rounds of) disproof testing
    Validating,
    /// Survived testing with confidence above the validation threshold
    Validated,
    /// At least one disproof attempt succeeded
    Disproven,
    /// Testing executed no conclusive trials; may be retried
    Inconclusive,
}

impl HypothesisStatus {
    /// Whether this status is terminal
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, HypothesisStatus::Validated | HypothesisStatus::Disproven)
    }

    /// String form for logs
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            HypothesisStatus::Proposed => "proposed",
            HypothesisStatus::Validating => "validating",
            HypothesisStatus::Validated => "validated",
            HypothesisStatus::Disproven => "disproven",
            HypothesisStatus::Inconclusive => "inconclusive",
        }
    }
}

impl std::fmt::Display for HypothesisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Statuses reachable from `from`
///
/// `Validating -> Validating` is allowed: a hypothesis below the validation
/// threshold stays testable. `Inconclusive -> Validating` is the retry edge
/// for re-testing with a different strategy.
#[must_use]
pub fn allowed_transitions(from: HypothesisStatus) -> Vec<HypothesisStatus> {
    use HypothesisStatus::*;
    match from {
        Proposed => vec![Validating],
        Validating => vec![Validating, Validated, Disproven, Inconclusive],
        Inconclusive => vec![Validating],
        Validated => vec![],
        Disproven => vec![],
    }
}

/// Validate a status transition
///
/// # Errors
/// `ModelError::IllegalTransition` if the edge is not allowed.
pub fn validate_transition(
    from: HypothesisStatus,
    to: HypothesisStatus,
) -> Result<(), ModelError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(ModelError::IllegalTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposed_transitions() {
        assert!(validate_transition(HypothesisStatus::Proposed, HypothesisStatus::Validating).is_ok());
        assert!(validate_transition(HypothesisStatus::Proposed, HypothesisStatus::Validated).is_err());
        assert!(validate_transition(HypothesisStatus::Proposed, HypothesisStatus::Disproven).is_err());
    }

    #[test]
    fn terminal_states_have_no_exits() {
        assert!(allowed_transitions(HypothesisStatus::Validated).is_empty());
        assert!(allowed_transitions(HypothesisStatus::Disproven).is_empty());
    }

    #[test]
    fn inconclusive_is_retryable() {
        assert!(!HypothesisStatus::Inconclusive.is_terminal());
        assert!(
            validate_transition(HypothesisStatus::Inconclusive, HypothesisStatus::Validating).is_ok()
        );
    }

    #[test]
    fn validating_self_edge() {
        assert!(
            validate_transition(HypothesisStatus::Validating, HypothesisStatus::Validating).is_ok()
        );
    }
}
