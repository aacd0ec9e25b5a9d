//! Database specialist
//!
//! Watches query latency and connection-pool pressure. When several
//! services degrade together it suspects the shared database rather than
//! any one service.

use crate::agent::{incident_window, summarize, AgentError, CostMeter, SpecialistAgent};
use compass_model::{
    AgentRole, Cost, Hypothesis, HypothesisClaim, Incident, Observation, ObservationPayload,
    ThresholdOperator,
};
use compass_telemetry::{MetricQuery, TelemetryProvider};
use std::sync::Arc;

/// Query latency metric (milliseconds)
pub const DB_LATENCY_METRIC: &str = "db.query.latency.p95";
/// Active connection count metric
pub const DB_CONNECTIONS_METRIC: &str = "db.connections.active";

/// p95 latency (ms) above which queries count as degraded
const DB_LATENCY_THRESHOLD_MS: f64 = 250.0;

/// Database specialist agent
#[derive(Debug)]
pub struct DatabaseAgent {
    provider: Arc<dyn TelemetryProvider>,
    cost_per_query: Cost,
    meter: CostMeter,
}

impl DatabaseAgent {
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
impl SpecialistAgent for DatabaseAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Database
    }

    async fn observe(&self, incident: &Incident) -> Result<Vec<Observation>, AgentError> {
        let range = incident_window(incident);
        let mut observations = Vec::new();

        for service in &incident.affected_services {
            for metric in [DB_LATENCY_METRIC, DB_CONNECTIONS_METRIC] {
                self.meter.charge(self.cost_per_query);
                let samples = self
                    .provider
                    .metric_series(&MetricQuery::new(service, metric, range))
                    .await?;
                if let Some(summary) = summarize(&samples) {
                    let confidence = if summary.sample_count >= 10 { 0.9 } else { 0.6 };
                    observations.push(Observation::new(
                        AgentRole::Database,
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
        }

        tracing::debug!(
            count = observations.len(),
            "database agent collected observations"
        );
        Ok(observations)
    }

    async fn generate_hypotheses(
        &self,
        observations: &[Observation],
    ) -> Result<Vec<Hypothesis>, AgentError> {
        self.meter.charge(self.cost_per_query);

        // Services whose query latency left the acceptable band.
        let mut degraded: Vec<(&str, f64)> = Vec::new();
        for obs in observations {
            if let ObservationPayload::MetricSummary {
                service,
                metric,
                peak,
                ..
            } = &obs.payload
            {
                if metric == DB_LATENCY_METRIC && *peak > DB_LATENCY_THRESHOLD_MS {
                    degraded.push((service.as_str(), *peak));
                }
            }
        }

        let mut hypotheses = Vec::new();
        match degraded.len() {
            0 => {}
            1 => {
                let (service, peak) = degraded[0];
                hypotheses.push(Hypothesis::new(
                    format!(
                        "Slow queries in {service}: p95 latency peaked at {peak:.0}ms"
                    ),
                    AgentRole::Database,
                    HypothesisClaim::Threshold {
                        metric: DB_LATENCY_METRIC.to_string(),
                        operator: ThresholdOperator::GreaterThan,
                        threshold: DB_LATENCY_THRESHOLD_MS,
                    },
                    (0.5 + peak / 2000.0).min(0.8),
                )?);
            }
            n => {
                hypotheses.push(Hypothesis::new(
                    format!("Shared database saturation degrading {n} services"),
                    AgentRole::Database,
                    HypothesisClaim::Scope {
                        claimed_scope: "shared database, all dependent services".to_string(),
                        service_count: n,
                    },
                    (0.5 + 0.1 * n as f64).min(0.85),
                )?);
            }
        }

        Ok(hypotheses)
    }

    fn cost(&self) -> Cost {
        self.meter.total()
    }
}
