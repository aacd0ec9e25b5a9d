//! Hypotheses
//!
//! The mutable center of the model. A hypothesis is created by a specialist
//! agent during Orient and mutated only through the methods here, which
//! keep three invariants:
//!
//! - `current_confidence` is recalculated on every evidence or attempt
//!   addition and always lies in [0.0, 1.0];
//! - a disproving attempt forces confidence to 0.0 and status to
//!   `Disproven`;
//! - status changes only along the edges of the status state machine.

use crate::claim::HypothesisClaim;
use crate::confidence;
use crate::disproof::DisproofAttempt;
use crate::error::ModelError;
use crate::evidence::Evidence;
use crate::ids::HypothesisId;
use crate::observation::AgentRole;
use crate::status::{validate_transition, HypothesisStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A falsifiable candidate explanation for an incident
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypothesis {
    id: HypothesisId,
    statement: String,
    origin: AgentRole,
    claim: HypothesisClaim,
    initial_confidence: f64,
    current_confidence: f64,
    status: HypothesisStatus,
    supporting_evidence: Vec<Evidence>,
    contradicting_evidence: Vec<Evidence>,
    disproof_attempts: Vec<DisproofAttempt>,
    created_at: DateTime<Utc>,
}

impl Hypothesis {
    /// Create a new hypothesis in `Proposed` status
    ///
    /// # Errors
    /// - `ModelError::InvalidClaim` if the claim fails validation
    /// - `ModelError::InvalidConfidence` if the initial confidence is
    ///   outside [0.0, 1.0]
    pub fn new(
        statement: impl Into<String>,
        origin: AgentRole,
        claim: HypothesisClaim,
        initial_confidence: f64,
    ) -> Result<Self, ModelError> {
        claim.validate()?;
        if !initial_confidence.is_finite() || !(0.0..=1.0).contains(&initial_confidence) {
            return Err(ModelError::InvalidConfidence(initial_confidence));
        }
        Ok(Self {
            id: HypothesisId::new(),
            statement: statement.into(),
            origin,
            claim,
            initial_confidence,
            current_confidence: initial_confidence,
            status: HypothesisStatus::Proposed,
            supporting_evidence: Vec::new(),
            contradicting_evidence: Vec::new(),
            disproof_attempts: Vec::new(),
            created_at: Utc::now(),
        })
    }

    /// Hypothesis identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> HypothesisId {
        self.id
    }

    /// The falsifiable statement
    #[inline]
    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Agent that proposed this hypothesis
    #[inline]
    #[must_use]
    pub fn origin(&self) -> AgentRole {
        self.origin
    }

    /// The typed claim under test
    #[inline]
    #[must_use]
    pub fn claim(&self) -> &HypothesisClaim {
        &self.claim
    }

    /// Confidence assigned at creation; never changes
    #[inline]
    #[must_use]
    pub fn initial_confidence(&self) -> f64 {
        self.initial_confidence
    }

    /// Confidence after the latest recalculation
    #[inline]
    #[must_use]
    pub fn current_confidence(&self) -> f64 {
        self.current_confidence
    }

    /// Current lifecycle status
    #[inline]
    #[must_use]
    pub fn status(&self) -> HypothesisStatus {
        self.status
    }

    /// Evidence supporting the hypothesis, in collection order
    #[inline]
    #[must_use]
    pub fn supporting_evidence(&self) -> &[Evidence] {
        &self.supporting_evidence
    }

    /// Evidence contradicting the hypothesis, in collection order
    #[inline]
    #[must_use]
    pub fn contradicting_evidence(&self) -> &[Evidence] {
        &self.contradicting_evidence
    }

    /// All disproof attempts, in execution order
    #[inline]
    #[must_use]
    pub fn disproof_attempts(&self) -> &[DisproofAttempt] {
        &self.disproof_attempts
    }

    /// When the hypothesis was proposed
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Number of attempts that failed to disprove
    #[inline]
    #[must_use]
    pub fn survived_attempts(&self) -> usize {
        self.disproof_attempts.iter().filter(|a| !a.disproven).count()
    }

    /// Append an evidence item and recalculate confidence
    pub fn add_evidence(&mut self, evidence: Evidence) {
        if evidence.supports_hypothesis {
            self.supporting_evidence.push(evidence);
        } else {
            self.contradicting_evidence.push(evidence);
        }
        self.recalculate();
    }

    /// Enter (or re-enter) the `Validating` status
    ///
    /// # Errors
    /// `ModelError::IllegalTransition` from terminal statuses.
    pub fn begin_validation(&mut self) -> Result<(), ModelError> {
        validate_transition(self.status, HypothesisStatus::Validating)?;
        self.status = HypothesisStatus::Validating;
        Ok(())
    }

    /// Record a disproof attempt: fold its evidence into the audit trail,
    /// recalculate confidence, and transition to `Disproven` if the trial
    /// succeeded
    ///
    /// # Errors
    /// `ModelError::IllegalTransition` unless the hypothesis is currently
    /// `Validating`.
    pub fn record_attempt(&mut self, attempt: DisproofAttempt) -> Result<(), ModelError> {
        if self.status != HypothesisStatus::Validating {
            return Err(ModelError::IllegalTransition {
                from: self.status,
                to: HypothesisStatus::Validating,
            });
        }
        for item in &attempt.evidence {
            if item.supports_hypothesis {
                self.supporting_evidence.push(item.clone());
            } else {
                self.contradicting_evidence.push(item.clone());
            }
        }
        let disproven = attempt.disproven;
        self.disproof_attempts.push(attempt);
        self.recalculate();
        if disproven {
            validate_transition(self.status, HypothesisStatus::Disproven)?;
            self.status = HypothesisStatus::Disproven;
        }
        Ok(())
    }

    /// Mark the hypothesis validated (terminal)
    ///
    /// # Errors
    /// `ModelError::IllegalTransition` unless currently `Validating`.
    pub fn mark_validated(&mut self) -> Result<(), ModelError> {
        validate_transition(self.status, HypothesisStatus::Validated)?;
        self.status = HypothesisStatus::Validated;
        Ok(())
    }

    /// Mark the hypothesis inconclusive (retryable)
    ///
    /// # Errors
    /// `ModelError::IllegalTransition` unless currently `Validating`.
    pub fn mark_inconclusive(&mut self) -> Result<(), ModelError> {
        validate_transition(self.status, HypothesisStatus::Inconclusive)?;
        self.status = HypothesisStatus::Inconclusive;
        Ok(())
    }

    fn recalculate(&mut self) {
        self.current_confidence = confidence::recalculate(
            self.initial_confidence,
            &self.supporting_evidence,
            &self.contradicting_evidence,
            &self.disproof_attempts,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::ThresholdOperator;
    use crate::evidence::EvidenceQuality;

    fn threshold_claim() -> HypothesisClaim {
        HypothesisClaim::Threshold {
            metric: "http.server.error_rate".to_string(),
            operator: ThresholdOperator::GreaterThan,
            threshold: 0.05,
        }
    }

    fn hypothesis(initial: f64) -> Hypothesis {
        Hypothesis::new(
            "deployment regression in checkout",
            AgentRole::Application,
            threshold_claim(),
            initial,
        )
        .unwrap()
    }

    fn survived_attempt() -> DisproofAttempt {
        DisproofAttempt::new(
            "metric_threshold",
            "evaluate",
            "holds",
            "held",
            false,
            vec![],
            "survived",
        )
        .unwrap()
    }

    #[test]
    fn new_hypothesis_starts_proposed() {
        let h = hypothesis(0.6);
        assert_eq!(h.status(), HypothesisStatus::Proposed);
        assert_eq!(h.current_confidence(), 0.6);
        assert_eq!(h.initial_confidence(), 0.6);
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        let result = Hypothesis::new(
            "x",
            AgentRole::Database,
            HypothesisClaim::Scope {
                claimed_scope: "shared db".to_string(),
                service_count: 3,
            },
            1.4,
        );
        assert!(matches!(result, Err(ModelError::InvalidConfidence(_))));
    }

    #[test]
    fn rejects_invalid_claim() {
        let result = Hypothesis::new(
            "x",
            AgentRole::Network,
            HypothesisClaim::Temporal {
                suspected_at: Utc::now(),
                metric: String::new(),
            },
            0.5,
        );
        assert!(matches!(result, Err(ModelError::InvalidClaim(_))));
    }

    #[test]
    fn evidence_routes_by_support_flag() {
        let mut h = hypothesis(0.5);
        h.add_evidence(Evidence::new("supports", EvidenceQuality::Indirect, true));
        h.add_evidence(Evidence::new("contradicts", EvidenceQuality::Direct, false));
        assert_eq!(h.supporting_evidence().len(), 1);
        assert_eq!(h.contradicting_evidence().len(), 1);
    }

    #[test]
    fn record_attempt_requires_validating() {
        let mut h = hypothesis(0.5);
        let err = h.record_attempt(survived_attempt());
        assert!(matches!(err, Err(ModelError::IllegalTransition { .. })));
    }

    #[test]
    fn three_survived_attempts_recalculate() {
        let mut h = hypothesis(0.5);
        h.begin_validation().unwrap();
        for _ in 0..3 {
            h.record_attempt(survived_attempt()).unwrap();
        }
        assert!((h.current_confidence() - 0.30).abs() < 0.01);
        assert_eq!(h.survived_attempts(), 3);
        assert_eq!(h.status(), HypothesisStatus::Validating);
    }

    #[test]
    fn disproving_attempt_is_terminal() {
        let mut h = hypothesis(0.9);
        h.begin_validation().unwrap();
        let attempt = DisproofAttempt::new(
            "scope_verification",
            "count affected services",
            "at most 1 service affected",
            "4 services affected",
            true,
            vec![Evidence::new("4 services show errors", EvidenceQuality::Direct, false)],
            "blast radius contradicts claim",
        )
        .unwrap();
        h.record_attempt(attempt).unwrap();
        assert_eq!(h.status(), HypothesisStatus::Disproven);
        assert_eq!(h.current_confidence(), 0.0);
        assert!(h.begin_validation().is_err());
    }

    #[test]
    fn attempt_evidence_folds_into_trail() {
        let mut h = hypothesis(0.5);
        h.begin_validation().unwrap();
        let attempt = DisproofAttempt::new(
            "metric_threshold",
            "evaluate",
            "error rate > 0.05",
            "peak 0.12",
            false,
            vec![Evidence::new("peak 0.12", EvidenceQuality::Direct, true)],
            "held",
        )
        .unwrap();
        h.record_attempt(attempt).unwrap();
        assert_eq!(h.supporting_evidence().len(), 1);
        assert_eq!(h.disproof_attempts().len(), 1);
    }

    #[test]
    fn inconclusive_then_retry() {
        let mut h = hypothesis(0.5);
        h.begin_validation().unwrap();
        h.mark_inconclusive().unwrap();
        assert_eq!(h.status(), HypothesisStatus::Inconclusive);
        h.begin_validation().unwrap();
        assert_eq!(h.status(), HypothesisStatus::Validating);
    }
}
