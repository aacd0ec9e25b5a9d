//! Disproof attempt records
//!
//! A disproof attempt is the record of one falsification trial against a
//! hypothesis. Attempts are immutable once created and appended to the
//! owning hypothesis's attempt list.

use crate::error::ModelError;
use crate::evidence::Evidence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of one falsification trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisproofAttempt {
    /// Strategy that ran the trial
    pub strategy: String,
    /// Method description
    pub method: String,
    /// What would hold if the hypothesis were true
    pub prediction: String,
    /// What was actually observed
    pub observed: String,
    /// Whether the trial disproved the hypothesis
    pub disproven: bool,
    /// Evidence collected during the trial
    pub evidence: Vec<Evidence>,
    /// Free-text reasoning
    pub reasoning: String,
    /// When the trial executed
    pub executed_at: DateTime<Utc>,
}

impl DisproofAttempt {
    /// Create a new attempt, enforcing the outcome/evidence invariant:
    /// a disproving attempt may only carry contradicting evidence, and a
    /// surviving attempt may only carry supporting evidence.
    ///
    /// # Errors
    /// `ModelError::AttemptEvidenceMismatch` if any evidence item's
    /// `supports_hypothesis` flag conflicts with the outcome.
    pub fn new(
        strategy: impl Into<String>,
        method: impl Into<String>,
        prediction: impl Into<String>,
        observed: impl Into<String>,
        disproven: bool,
        evidence: Vec<Evidence>,
        reasoning: impl Into<String>,
    ) -> Result<Self, ModelError> {
        for item in &evidence {
            if item.supports_hypothesis == disproven {
                return Err(ModelError::AttemptEvidenceMismatch {
                    disproven,
                    supports: item.supports_hypothesis,
                });
            }
        }
        Ok(Self {
            strategy: strategy.into(),
            method: method.into(),
            prediction: prediction.into(),
            observed: observed.into(),
            disproven,
            evidence,
            reasoning: reasoning.into(),
            executed_at: Utc::now(),
        })
    }

    /// Create an inconclusive attempt for a trial that could not execute
    /// (e.g. the backing data source was unavailable)
    ///
    /// Carries no evidence and never disproves.
    #[must_use]
    pub fn inconclusive(strategy: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            method: "not executed".to_string(),
            prediction: String::new(),
            observed: "no data collected".to_string(),
            disproven: false,
            evidence: Vec::new(),
            reasoning: reasoning.into(),
            executed_at: Utc::now(),
        }
    }
}
