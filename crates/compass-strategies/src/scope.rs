//! Scope verification strategy
//!
//! Tests scope claims: if the fault really is confined to the claimed
//! number of services, no more than that many services should be emitting
//! errors in the incident window.

use crate::strategy::{incident_window, DisproofStrategy, StrategyError, StrategyOutcome};
use compass_model::{
    ClaimKind, Cost, CostMeter, Evidence, EvidenceQuality, Hypothesis, HypothesisClaim, Incident,
};
use compass_telemetry::TelemetryProvider;
use std::sync::Arc;

/// Disproves scope claims whose measured blast radius is wider than claimed
#[derive(Debug)]
pub struct ScopeVerificationStrategy {
    provider: Arc<dyn TelemetryProvider>,
    cost_per_query: Cost,
    meter: CostMeter,
}

impl ScopeVerificationStrategy {
    /// Create a strategy over a telemetry backend
    #[must_use]
    pub fn new(provider: Arc<dyn TelemetryProvider>) -> Self {
        Self {
            provider,
            cost_per_query: Cost::from_dollars(0.10),
            meter: CostMeter::new(),
        }
    }

    /// Override the per-query charge
    #[inline]
    #[must_use]
    pub fn with_cost_per_query(mut self, cost: Cost) -> Self {
        self.cost_per_query = cost;
        self
    }
}

#[async_trait::async_trait]
impl DisproofStrategy for ScopeVerificationStrategy {
    fn name(&self) -> &'static str {
        "scope_verification"
    }

    fn applies_to(&self, kind: ClaimKind) -> bool {
        kind == ClaimKind::Scope
    }

    async fn execute(
        &self,
        hypothesis: &Hypothesis,
        incident: &Incident,
    ) -> Result<StrategyOutcome, StrategyError> {
        let HypothesisClaim::Scope {
            claimed_scope,
            service_count,
        } = hypothesis.claim()
        else {
            return Err(StrategyError::ClaimMismatch {
                strategy: self.name(),
                kind: hypothesis.claim().kind(),
            });
        };

        let range = incident_window(incident);
        let prediction =
            format!("at most {service_count} services emit errors ({claimed_scope})");
        let method = "count services with error volume in the incident window".to_string();

        let mut erroring: Vec<&str> = Vec::new();
        for service in &incident.affected_services {
            self.meter.charge(self.cost_per_query);
            let count = self.provider.error_count(service, &range).await?;
            if count > 0 {
                erroring.push(service.as_str());
            }
        }

        let actual = erroring.len();
        tracing::debug!(
            strategy = self.name(),
            actual,
            claimed = *service_count,
            "blast radius measured"
        );
        if actual == 0 {
            return Ok(StrategyOutcome::inconclusive(
                method,
                prediction,
                "no service emitted errors in the window; scope cannot be measured",
            ));
        }

        let observed = format!("{actual} services emitting errors: {}", erroring.join(", "));
        if actual > *service_count {
            Ok(StrategyOutcome::disproven(
                method,
                prediction,
                observed,
                vec![Evidence::new(
                    format!(
                        "{actual} services show errors but the claim allows {service_count}"
                    ),
                    EvidenceQuality::Direct,
                    false,
                )],
                "measured blast radius exceeds the claimed scope",
            ))
        } else {
            Ok(StrategyOutcome::survived(
                method,
                prediction,
                observed,
                vec![Evidence::new(
                    format!("error volume confined to {actual} of {service_count} claimed services"),
                    EvidenceQuality::Corroborated,
                    true,
                )],
                "measured blast radius fits the claimed scope",
            ))
        }
    }

    fn cost(&self) -> Cost {
        self.meter.total()
    }
}
