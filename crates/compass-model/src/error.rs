//! Error types for the investigation model

use crate::status::HypothesisStatus;

/// Model-level validation errors
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Incident failed creation-time validation
    #[error("invalid incident: {0}")]
    InvalidIncident(String),

    /// Hypothesis claim failed creation-time validation
    #[error("invalid claim: {0}")]
    InvalidClaim(String),

    /// Confidence value outside [0.0, 1.0]
    #[error("confidence {0} outside [0.0, 1.0]")]
    InvalidConfidence(f64),

    /// Disproof attempt evidence contradicts its own outcome
    #[error(
        "attempt outcome mismatch: disproven={disproven} but evidence item has supports_hypothesis={supports}"
    )]
    AttemptEvidenceMismatch {
        /// The attempt's recorded outcome
        disproven: bool,
        /// The offending evidence item's flag
        supports: bool,
    },

    /// Illegal hypothesis status transition
    #[error("illegal status transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current status
        from: HypothesisStatus,
        /// Requested status
        to: HypothesisStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_display() {
        let err = ModelError::InvalidClaim("empty metric".to_string());
        assert!(err.to_string().contains("invalid claim"));
    }

    #[test]
    fn transition_error_names_states() {
        let err = ModelError::IllegalTransition {
            from: HypothesisStatus::Validated,
            to: HypothesisStatus::Validating,
        };
        assert!(err.to_string().contains("Validated"));
    }
}
