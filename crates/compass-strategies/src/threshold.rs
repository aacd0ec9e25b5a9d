//! Metric threshold validation strategy
//!
//! Tests threshold claims directly: fetch the series the claim is about
//! and check whether its peak actually satisfies the claimed comparison.

use crate::strategy::{incident_window, DisproofStrategy, StrategyError, StrategyOutcome};
use compass_model::{
    ClaimKind, Cost, CostMeter, Evidence, EvidenceQuality, Hypothesis, HypothesisClaim, Incident,
};
use compass_telemetry::{MetricQuery, TelemetryProvider};
use std::sync::Arc;

/// Disproves threshold claims the series does not bear out
#[derive(Debug)]
pub struct MetricThresholdStrategy {
    provider: Arc<dyn TelemetryProvider>,
    cost_per_query: Cost,
    meter: CostMeter,
}

impl MetricThresholdStrategy {
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
impl DisproofStrategy for MetricThresholdStrategy {
    fn name(&self) -> &'static str {
        "metric_threshold"
    }

    fn applies_to(&self, kind: ClaimKind) -> bool {
        kind == ClaimKind::Threshold
    }

    async fn execute(
        &self,
        hypothesis: &Hypothesis,
        incident: &Incident,
    ) -> Result<StrategyOutcome, StrategyError> {
        let HypothesisClaim::Threshold {
            metric,
            operator,
            threshold,
        } = hypothesis.claim()
        else {
            return Err(StrategyError::ClaimMismatch {
                strategy: self.name(),
                kind: hypothesis.claim().kind(),
            });
        };

        let range = incident_window(incident);
        let prediction = format!("peak of {metric} {operator} {threshold}");
        let method = format!("evaluate {metric} peak against the claimed threshold");

        let mut peak: Option<f64> = None;
        for service in &incident.affected_services {
            self.meter.charge(self.cost_per_query);
            let samples = self
                .provider
                .metric_series(&MetricQuery::new(service, metric.as_str(), range))
                .await?;
            for sample in samples {
                peak = Some(match peak {
                    Some(current) if current >= sample.value => current,
                    _ => sample.value,
                });
            }
        }

        tracing::debug!(strategy = self.name(), peak = ?peak, "series peak measured");

        let Some(peak) = peak else {
            return Ok(StrategyOutcome::inconclusive(
                method,
                prediction,
                format!("no samples for {metric} in the incident window"),
            ));
        };

        let observed = format!("peak {peak:.4}");
        if operator.evaluate(peak, *threshold) {
            Ok(StrategyOutcome::survived(
                method,
                prediction,
                observed,
                vec![Evidence::new(
                    format!("{metric} peaked at {peak:.4}, satisfying {operator} {threshold}"),
                    EvidenceQuality::Direct,
                    true,
                )],
                "the claimed comparison holds over the incident window",
            ))
        } else {
            Ok(StrategyOutcome::disproven(
                method,
                prediction,
                observed,
                vec![Evidence::new(
                    format!("{metric} peaked at {peak:.4}, violating {operator} {threshold}"),
                    EvidenceQuality::Direct,
                    false,
                )],
                "the series never satisfied the claimed comparison",
            ))
        }
    }

    fn cost(&self) -> Cost {
        self.meter.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::StrategyVerdict;
    use chrono::{Duration, Utc};
    use compass_model::{AgentRole, IncidentId, Severity, ThresholdOperator};
    use compass_telemetry::{MemoryTelemetry, Sample};

    fn incident() -> Incident {
        Incident::new(
            IncidentId::new(),
            "error spike",
            Utc::now(),
            vec!["checkout".to_string()],
            Severity::Routine,
        )
        .unwrap()
    }

    fn threshold_hypothesis() -> Hypothesis {
        Hypothesis::new(
            "error rate exceeded 5%",
            AgentRole::Application,
            HypothesisClaim::Threshold {
                metric: "http.server.error_rate".to_string(),
                operator: ThresholdOperator::GreaterThan,
                threshold: 0.05,
            },
            0.7,
        )
        .unwrap()
    }

    fn series(values: &[f64]) -> Vec<Sample> {
        let base = Utc::now() - Duration::minutes(15);
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Sample::new(base + Duration::minutes(i as i64), *v))
            .collect()
    }

    #[tokio::test]
    async fn satisfied_threshold_survives() {
        let provider = Arc::new(MemoryTelemetry::new().with_series(
            "checkout",
            "http.server.error_rate",
            series(&[0.01, 0.08, 0.12]),
        ));
        let strategy = MetricThresholdStrategy::new(provider);

        let outcome = strategy
            .execute(&threshold_hypothesis(), &incident())
            .await
            .unwrap();
        assert_eq!(outcome.verdict, StrategyVerdict::Survived);
        assert!(outcome.evidence.iter().all(|e| e.supports_hypothesis));
    }

    #[tokio::test]
    async fn unsatisfied_threshold_disproves() {
        let provider = Arc::new(MemoryTelemetry::new().with_series(
            "checkout",
            "http.server.error_rate",
            series(&[0.01, 0.02, 0.015]),
        ));
        let strategy = MetricThresholdStrategy::new(provider);

        let outcome = strategy
            .execute(&threshold_hypothesis(), &incident())
            .await
            .unwrap();
        assert_eq!(outcome.verdict, StrategyVerdict::Disproven);
    }

    #[tokio::test]
    async fn missing_series_is_inconclusive() {
        let provider = Arc::new(MemoryTelemetry::new());
        let strategy = MetricThresholdStrategy::new(provider);

        let outcome = strategy
            .execute(&threshold_hypothesis(), &incident())
            .await
            .unwrap();
        assert_eq!(outcome.verdict, StrategyVerdict::Inconclusive);
    }

    #[tokio::test]
    async fn backend_outage_is_an_error() {
        let provider = Arc::new(MemoryTelemetry::new().with_outage("prometheus down"));
        let strategy = MetricThresholdStrategy::new(provider);

        let result = strategy.execute(&threshold_hypothesis(), &incident()).await;
        assert!(matches!(result, Err(StrategyError::Telemetry(_))));
    }
}
