//! In-memory telemetry backend
//!
//! Deterministic `TelemetryProvider` over preloaded series and error
//! counts. Used by tests and demos; production deployments plug real
//! Prometheus/Loki clients into the same trait.

use crate::provider::{MetricQuery, Sample, TelemetryError, TelemetryProvider, TimeRange};
use std::collections::HashMap;

/// Preloaded, deterministic telemetry backend
#[derive(Debug, Default)]
pub struct MemoryTelemetry {
    series: HashMap<(String, String), Vec<Sample>>,
    errors: HashMap<String, u64>,
    outage: Option<String>,
}

impl MemoryTelemetry {
    /// Create an empty backend
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a metric series for a service
    #[must_use]
    pub fn with_series(
        mut self,
        service: impl Into<String>,
        metric: impl Into<String>,
        mut samples: Vec<Sample>,
    ) -> Self {
        samples.sort_by_key(|s| s.at);
        self.series.insert((service.into(), metric.into()), samples);
        self
    }

    /// Preload an error count for a service
    #[must_use]
    pub fn with_error_count(mut self, service: impl Into<String>, count: u64) -> Self {
        self.errors.insert(service.into(), count);
        self
    }

    /// Simulate a backend outage: every query fails with `Unavailable`
    #[must_use]
    pub fn with_outage(mut self, reason: impl Into<String>) -> Self {
        self.outage = Some(reason.into());
        self
    }
}

#[async_trait::async_trait]
impl TelemetryProvider for MemoryTelemetry {
    async fn metric_series(&self, query: &MetricQuery) -> Result<Vec<Sample>, TelemetryError> {
        if let Some(reason) = &self.outage {
            return Err(TelemetryError::Unavailable(reason.clone()));
        }
        let key = (query.service.clone(), query.metric.clone());
        Ok(self
            .series
            .get(&key)
            .map(|samples| {
                samples
                    .iter()
                    .copied()
                    .filter(|s| query.range.contains(s.at))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn error_count(&self, service: &str, _range: &TimeRange) -> Result<u64, TelemetryError> {
        if let Some(reason) = &self.outage {
            return Err(TelemetryError::Unavailable(reason.clone()));
        }
        Ok(self.errors.get(service).copied().unwrap_or(0))
    }
}
