//! Temporal contradiction strategy
//!
//! Tests temporal claims: if the suspected cause is real, the metric's
//! anomaly onset cannot precede it. An onset measurably earlier than the
//! claimed time disproves the hypothesis.

use crate::strategy::{incident_window, DisproofStrategy, StrategyError, StrategyOutcome};
use chrono::{DateTime, Duration, Utc};
use compass_model::{
    ClaimKind, Cost, CostMeter, Evidence, EvidenceQuality, Hypothesis, HypothesisClaim, Incident,
};
use compass_telemetry::{MetricQuery, Sample, TelemetryProvider};
use std::sync::Arc;

/// Slack allowed between claimed time and measured onset
const ONSET_TOLERANCE_MINUTES: i64 = 5;

/// Disproves temporal claims whose metric moved before the suspected time
#[derive(Debug)]
pub struct TemporalContradictionStrategy {
    provider: Arc<dyn TelemetryProvider>,
    cost_per_query: Cost,
    meter: CostMeter,
}

impl TemporalContradictionStrategy {
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

    /// First sample that doubled the series baseline
    fn onset_of(samples: &[Sample]) -> Option<DateTime<Utc>> {
        let baseline = samples.first()?.value;
        samples
            .iter()
            .find(|s| s.value > baseline * 2.0 + f64::EPSILON)
            .map(|s| s.at)
    }
}

#[async_trait::async_trait]
impl DisproofStrategy for TemporalContradictionStrategy {
    fn name(&self) -> &'static str {
        "temporal_contradiction"
    }

    fn applies_to(&self, kind: ClaimKind) -> bool {
        kind == ClaimKind::Temporal
    }

    async fn execute(
        &self,
        hypothesis: &Hypothesis,
        incident: &Incident,
    ) -> Result<StrategyOutcome, StrategyError> {
        let HypothesisClaim::Temporal { suspected_at, metric } = hypothesis.claim() else {
            return Err(StrategyError::ClaimMismatch {
                strategy: self.name(),
                kind: hypothesis.claim().kind(),
            });
        };

        let range = incident_window(incident);
        let prediction = format!("anomaly onset of {metric} at or after {suspected_at}");
        let method = format!("compare measured onset of {metric} against the claimed time");

        // Earliest onset across the affected services.
        let mut earliest: Option<DateTime<Utc>> = None;
        for service in &incident.affected_services {
            self.meter.charge(self.cost_per_query);
            let samples = self
                .provider
                .metric_series(&MetricQuery::new(service, metric.as_str(), range))
                .await?;
            if let Some(onset) = Self::onset_of(&samples) {
                earliest = Some(match earliest {
                    Some(current) if current <= onset => current,
                    _ => onset,
                });
            }
        }

        tracing::debug!(strategy = self.name(), onset = ?earliest, "onset measured");

        let Some(onset) = earliest else {
            return Ok(StrategyOutcome::inconclusive(
                method,
                prediction,
                format!("no anomaly onset found for {metric} in the incident window"),
            ));
        };

        let tolerance = Duration::minutes(ONSET_TOLERANCE_MINUTES);
        if onset < *suspected_at - tolerance {
            Ok(StrategyOutcome::disproven(
                method,
                prediction,
                format!("onset measured at {onset}"),
                vec![Evidence::new(
                    format!("{metric} left baseline at {onset}, before the suspected time {suspected_at}"),
                    EvidenceQuality::Direct,
                    false,
                )],
                "the metric moved before the suspected cause, so the cause cannot explain it",
            ))
        } else {
            Ok(StrategyOutcome::survived(
                method,
                prediction,
                format!("onset measured at {onset}"),
                vec![Evidence::new(
                    format!("{metric} onset {onset} is consistent with the suspected time"),
                    EvidenceQuality::Direct,
                    true,
                )],
                "measured onset does not contradict the claimed time",
            ))
        }
    }

    fn cost(&self) -> Cost {
        self.meter.total()
    }
}
