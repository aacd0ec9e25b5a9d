//! Network specialist
//!
//! Watches retransmit rates and packet loss, and pins down when a series
//! first left its baseline. Network hypotheses are temporal claims
//! anchored at that onset.

use crate::agent::{detect_onset, incident_window, summarize, AgentError, CostMeter, SpecialistAgent};
use compass_model::{
    AgentRole, Cost, Hypothesis, HypothesisClaim, Incident, Observation, ObservationPayload,
};
use compass_telemetry::{MetricQuery, TelemetryProvider};
use std::sync::Arc;

/// TCP retransmit-rate metric
pub const RETRANSMIT_METRIC: &str = "net.tcp.retransmit_rate";
/// Packet-loss metric
pub const PACKET_LOSS_METRIC: &str = "net.packet_loss";

/// Retransmit rate above which the network counts as degraded
const RETRANSMIT_THRESHOLD: f64 = 0.02;
/// Packet loss above which the network counts as degraded
const PACKET_LOSS_THRESHOLD: f64 = 0.01;

/// Network specialist agent
#[derive(Debug)]
pub struct NetworkAgent {
    provider: Arc<dyn TelemetryProvider>,
    cost_per_query: Cost,
    meter: CostMeter,
}

impl NetworkAgent {
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

    fn onset_threshold(metric: &str) -> f64 {
        if metric == PACKET_LOSS_METRIC {
            PACKET_LOSS_THRESHOLD
        } else {
            RETRANSMIT_THRESHOLD
        }
    }
}

#[async_trait::async_trait]
impl SpecialistAgent for NetworkAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Network
    }

    async fn observe(&self, incident: &Incident) -> Result<Vec<Observation>, AgentError> {
        let range = incident_window(incident);
        let mut observations = Vec::new();

        for service in &incident.affected_services {
            for metric in [RETRANSMIT_METRIC, PACKET_LOSS_METRIC] {
                self.meter.charge(self.cost_per_query);
                let samples = self
                    .provider
                    .metric_series(&MetricQuery::new(service, metric, range))
                    .await?;
                let Some(summary) = summarize(&samples) else {
                    continue;
                };
                let confidence = if summary.sample_count >= 10 { 0.9 } else { 0.6 };
                observations.push(Observation::new(
                    AgentRole::Network,
                    ObservationPayload::MetricSummary {
                        service: service.clone(),
                        metric: metric.to_string(),
                        mean: summary.mean,
                        peak: summary.peak,
                        sample_count: summary.sample_count,
                    },
                    confidence,
                ));

                if let Some((onset, magnitude)) =
                    detect_onset(&samples, Self::onset_threshold(metric))
                {
                    observations.push(Observation::new(
                        AgentRole::Network,
                        ObservationPayload::AnomalyOnset {
                            service: service.clone(),
                            metric: metric.to_string(),
                            onset,
                            magnitude,
                        },
                        confidence,
                    ));
                }
            }
        }

        tracing::debug!(
            count = observations.len(),
            "network agent collected observations"
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
            let ObservationPayload::AnomalyOnset {
                service,
                metric,
                onset,
                magnitude,
            } = &obs.payload
            else {
                continue;
            };
            if metric != RETRANSMIT_METRIC && metric != PACKET_LOSS_METRIC {
                continue;
            }

            hypotheses.push(Hypothesis::new(
                format!(
                    "Network degradation on {service}: {metric} left baseline at {} (peak {magnitude:.3})",
                    onset.format("%H:%M:%SZ")
                ),
                AgentRole::Network,
                HypothesisClaim::Temporal {
                    suspected_at: *onset,
                    metric: metric.clone(),
                },
                (0.4 + magnitude * 5.0).clamp(0.3, 0.8),
            )?);
        }

        Ok(hypotheses)
    }

    fn cost(&self) -> Cost {
        self.meter.total()
    }
}
