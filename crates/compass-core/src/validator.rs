//! Act-phase hypothesis validator
//!
//! Runs every applicable disproof strategy against a hypothesis, folds
//! each trial into the hypothesis (triggering confidence recalculation),
//! and classifies the outcome:
//!
//! - any disproving trial: `Disproven`, confidence forced to 0.0 (terminal)
//! - all trials survived, confidence at or above the threshold: `Validated`
//! - all trials survived below the threshold: stays `Validating`
//! - zero conclusive trials: `Inconclusive`, explicit and never silently
//!   equated with validated
//!
//! Strategy execution failures (data source down) degrade to inconclusive
//! attempts and are never fatal. The only fatal outcome here is crossing
//! the budget ceiling, checked before each trial.

use crate::error::CompassError;
use crate::ledger::CostLedger;
use crate::types::Phase;
use compass_model::{Cost, DisproofAttempt, Hypothesis, Incident};
use compass_strategies::{StrategyOutcome, StrategyRegistry, StrategyVerdict};

/// Act-phase validator over a strategy registry
#[derive(Debug, Clone)]
pub struct HypothesisValidator {
    registry: StrategyRegistry,
    validation_threshold: f64,
}

impl HypothesisValidator {
    /// Create a validator with the default 0.9 validation threshold
    #[inline]
    #[must_use]
    pub fn new(registry: StrategyRegistry) -> Self {
        Self {
            registry,
            validation_threshold: 0.9,
        }
    }

    /// Override the validation confidence threshold
    #[inline]
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.validation_threshold = threshold;
        self
    }

    /// The configured validation threshold
    #[inline]
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.validation_threshold
    }

    /// Run one round of disproof trials against a hypothesis
    ///
    /// Mutates the hypothesis in place: records attempts, folds evidence,
    /// recalculates confidence, and assigns the resulting status.
    ///
    /// # Errors
    /// - `CompassError::BudgetExceeded` if the running total crosses the
    ///   ceiling at a strategy boundary (fatal; attempts already recorded
    ///   are retained)
    /// - `CompassError::Model` if the hypothesis is in a terminal status
    pub async fn validate(
        &self,
        hypothesis: &mut Hypothesis,
        incident: &Incident,
        ledger: &mut CostLedger,
        budget_limit: Cost,
    ) -> Result<(), CompassError> {
        hypothesis.begin_validation()?;

        let strategies = self.registry.for_claim(hypothesis.claim().kind());
        let mut conclusive = 0usize;

        for strategy in strategies {
            let spent = ledger.total();
            if spent > budget_limit {
                return Err(CompassError::BudgetExceeded {
                    phase: Phase::Act,
                    boundary: strategy.name().to_string(),
                    spent,
                    limit: budget_limit,
                    breakdown: ledger.breakdown(),
                });
            }

            let attempt = match strategy.execute(hypothesis, incident).await {
                Ok(outcome) => {
                    if outcome.verdict != StrategyVerdict::Inconclusive {
                        conclusive += 1;
                    }
                    attempt_from_outcome(strategy.name(), outcome)?
                }
                Err(e) => {
                    tracing::warn!(
                        strategy = strategy.name(),
                        hypothesis_id = %hypothesis.id(),
                        error = %e,
                        "strategy execution failed; recording inconclusive attempt"
                    );
                    DisproofAttempt::inconclusive(
                        strategy.name(),
                        format!("strategy execution failed: {e}"),
                    )
                }
            };
            ledger.record(strategy.name(), strategy.cost());

            hypothesis.record_attempt(attempt)?;
            if hypothesis.status().is_terminal() {
                break;
            }
        }

        if hypothesis.status() == compass_model::HypothesisStatus::Validating {
            if conclusive == 0 {
                hypothesis.mark_inconclusive()?;
            } else if hypothesis.current_confidence() >= self.validation_threshold {
                hypothesis.mark_validated()?;
            }
        }

        tracing::info!(
            hypothesis_id = %hypothesis.id(),
            status = %hypothesis.status(),
            confidence = hypothesis.current_confidence(),
            attempts = hypothesis.disproof_attempts().len(),
            "hypothesis validation round complete"
        );
        Ok(())
    }
}

fn attempt_from_outcome(
    strategy: &str,
    outcome: StrategyOutcome,
) -> Result<DisproofAttempt, CompassError> {
    let disproven = outcome.verdict == StrategyVerdict::Disproven;
    let evidence = match outcome.verdict {
        StrategyVerdict::Inconclusive => Vec::new(),
        _ => outcome.evidence,
    };
    Ok(DisproofAttempt::new(
        strategy,
        outcome.method,
        outcome.prediction,
        outcome.observed,
        disproven,
        evidence,
        outcome.reasoning,
    )?)
}
