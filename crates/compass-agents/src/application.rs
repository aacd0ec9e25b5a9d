//! Application-layer specialist
//!
//! Watches request error rates and tail latency for the affected
//! services; proposes deployment-regression hypotheses when either
//! deviates.

use crate::agent::{incident_window, summarize, AgentError, CostMeter, SpecialistAgent};
use compass_model::{
    AgentRole, Cost, Hypothesis, HypothesisClaim, Incident, Observation, ObservationPayload,
    ThresholdOperator,
};
use compass_telemetry::{MetricQuery, TelemetryProvider};
use std::sync::Arc;

/// Request error-rate metric
pub const ERROR_RATE_METRIC: &str = "http.server.error_rate";
/// Request tail-latency metric (seconds)
pub const LATENCY_P99_METRIC: &str = "http.server.latency.p99";

/// Error rate above which a regression hypothesis is proposed
const ERROR_RATE_THRESHOLD: f64 = 0.05;
/// Peak-over-mean ratio that counts as a latency regression
const LATENCY_DEVIATION_RATIO: f64 = 2.0;

/// Application-layer specialist agent
#[derive(Debug)]
pub struct ApplicationAgent {
    provider: Arc<dyn TelemetryProvider>,
    cost_per_query: Cost,
    meter: CostMeter,
}

impl ApplicationAgent {
    /// Create an agent over a telemetry backend
    #[must_use]
    pub fn new(provider: Arc<dyn TelemetryProvider>) -> Self {
        Self {
            provider,
            cost_per_query: Cost::from_dollars(0.25),
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
impl SpecialistAgent for ApplicationAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Application
    }

    async fn observe(&self, incident: &Incident) -> Result<Vec<Observation>, AgentError> {
        let range = incident_window(incident);
        let mut observations = Vec::new();

        for service in &incident.affected_services {
            for metric in [ERROR_RATE_METRIC, LATENCY_P99_METRIC] {
                self.meter.charge(self.cost_per_query);
                let samples = self
                    .provider
                    .metric_series(&MetricQuery::new(service, metric, range))
                    .await?;
                if let Some(summary) = summarize(&samples) {
                    let confidence = if summary.sample_count >= 10 { 0.9 } else { 0.6 };
                    observations.push(Observation::new(
                        AgentRole::Application,
                        ObservationPayload::MetricSummary {
                            service: service.clone(),
                            metric: metric.to_string(),
                            mean: summary.mean,
                            peak: summary.peak,
                            sample_count: summary.sample_count,
                        },
                        confidence,
                    ));
                }
            }

            self.meter.charge(self.cost_per_query);
            let errors = self.provider.error_count(service, &range).await?;
            if errors > 0 {
                observations.push(Observation::new(
                    AgentRole::Application,
                    ObservationPayload::ErrorVolume {
                        service: service.clone(),
                        count: errors,
                    },
                    0.9,
                ));
            }
        }

        tracing::debug!(
            count = observations.len(),
            "application agent collected observations"
        );
        Ok(observations)
    }

    async fn generate_hypotheses(
        &self,
        observations: &[Observation],
    ) -> Result<Vec<Hypothesis>, AgentError> {
        self.meter.charge(self.cost_per_query);
        let mut hypotheses = Vec::new();

        for obs in observations {
            let ObservationPayload::MetricSummary {
                service,
                metric,
                mean,
                peak,
                ..
            } = &obs.payload
            else {
                continue;
            };

            if metric == ERROR_RATE_METRIC && *peak > ERROR_RATE_THRESHOLD {
                hypotheses.push(Hypothesis::new(
                    format!(
                        "Deployment regression in {service}: error rate peaked at {peak:.3}"
                    ),
                    AgentRole::Application,
                    HypothesisClaim::Threshold {
                        metric: ERROR_RATE_METRIC.to_string(),
                        operator: ThresholdOperator::GreaterThan,
                        threshold: ERROR_RATE_THRESHOLD,
                    },
                    (0.5 + peak).min(0.9),
                )?);
            } else if metric == LATENCY_P99_METRIC
                && *mean > 0.0
                && *peak > LATENCY_DEVIATION_RATIO * mean
            {
                hypotheses.push(Hypothesis::new(
                    format!(
                        "Latency regression in {service}: p99 peaked at {peak:.3}s against a {mean:.3}s baseline"
                    ),
                    AgentRole::Application,
                    HypothesisClaim::Threshold {
                        metric: LATENCY_P99_METRIC.to_string(),
                        operator: ThresholdOperator::GreaterThan,
                        threshold: LATENCY_DEVIATION_RATIO * mean,
                    },
                    0.55,
                )?);
            }
        }

        Ok(hypotheses)
    }

    fn cost(&self) -> Cost {
        self.meter.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use compass_model::{IncidentId, Severity};
    use compass_telemetry::{MemoryTelemetry, Sample};
    use pretty_assertions::assert_eq;

    fn incident() -> Incident {
        Incident::new(
            IncidentId::new(),
            "checkout errors",
            Utc::now(),
            vec!["checkout".to_string()],
            Severity::Routine,
        )
        .unwrap()
    }

    fn error_rate_samples(values: &[f64]) -> Vec<Sample> {
        let base = Utc::now() - Duration::minutes(20);
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Sample::new(base + Duration::minutes(i as i64), *v))
            .collect()
    }

    #[tokio::test]
    async fn observe_summarizes_series_and_errors() {
        let provider = Arc::new(
            MemoryTelemetry::new()
                .with_series(
                    "checkout",
                    ERROR_RATE_METRIC,
                    error_rate_samples(&[0.01, 0.08, 0.12]),
                )
                .with_error_count("checkout", 42),
        );
        let agent = ApplicationAgent::new(provider);

        let observations = agent.observe(&incident()).await.unwrap();
        assert_eq!(observations.len(), 2); // summary + error volume
        assert!(agent.cost() > Cost::ZERO);
    }

    #[tokio::test]
    async fn elevated_error_rate_yields_threshold_hypothesis() {
        let provider = Arc::new(MemoryTelemetry::new().with_series(
            "checkout",
            ERROR_RATE_METRIC,
            error_rate_samples(&[0.01, 0.08, 0.12]),
        ));
        let agent = ApplicationAgent::new(provider);

        let observations = agent.observe(&incident()).await.unwrap();
        let hypotheses = agent.generate_hypotheses(&observations).await.unwrap();

        assert_eq!(hypotheses.len(), 1);
        let h = &hypotheses[0];
        assert_eq!(h.origin(), AgentRole::Application);
        assert!(h.statement().contains("checkout"));
        assert!(matches!(h.claim(), HypothesisClaim::Threshold { .. }));
    }

    #[tokio::test]
    async fn quiet_series_yields_no_hypotheses() {
        let provider = Arc::new(MemoryTelemetry::new().with_series(
            "checkout",
            ERROR_RATE_METRIC,
            error_rate_samples(&[0.001, 0.002, 0.001]),
        ));
        let agent = ApplicationAgent::new(provider);

        let observations = agent.observe(&incident()).await.unwrap();
        let hypotheses = agent.generate_hypotheses(&observations).await.unwrap();
        assert!(hypotheses.is_empty());
    }

    #[tokio::test]
    async fn backend_outage_propagates_as_agent_error() {
        let provider = Arc::new(MemoryTelemetry::new().with_outage("prometheus down"));
        let agent = ApplicationAgent::new(provider);

        let result = agent.observe(&incident()).await;
        assert!(matches!(result, Err(AgentError::Telemetry(_))));
    }
}
