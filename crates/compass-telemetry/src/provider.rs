//! Telemetry provider interface
//!
//! The narrow boundary between the investigation engine and whatever
//! observability backend answers its queries (Prometheus, Tempo, Loki, or
//! an in-memory double). Agents and strategies only see this trait.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Half-open time window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Window start (inclusive)
    pub start: DateTime<Utc>,
    /// Window end (exclusive)
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Create a range from explicit bounds
    #[inline]
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Range centered on an anchor: `[anchor - before, anchor + after)`
    #[inline]
    #[must_use]
    pub fn around(anchor: DateTime<Utc>, before: Duration, after: Duration) -> Self {
        Self {
            start: anchor - before,
            end: anchor + after,
        }
    }

    /// Whether a timestamp falls inside the range
    #[inline]
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

/// One metric sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Sample timestamp
    pub at: DateTime<Utc>,
    /// Sample value
    pub value: f64,
}

impl Sample {
    /// Create a sample
    #[inline]
    #[must_use]
    pub fn new(at: DateTime<Utc>, value: f64) -> Self {
        Self { at, value }
    }
}

/// A metric series query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricQuery {
    /// Service the metric belongs to
    pub service: String,
    /// Metric name
    pub metric: String,
    /// Query window
    pub range: TimeRange,
}

impl MetricQuery {
    /// Create a query
    #[inline]
    #[must_use]
    pub fn new(service: impl Into<String>, metric: impl Into<String>, range: TimeRange) -> Self {
        Self {
            service: service.into(),
            metric: metric.into(),
            range,
        }
    }
}

/// Telemetry backend errors
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Backend unreachable
    #[error("telemetry backend unavailable: {0}")]
    Unavailable(String),

    /// Backend rejected or failed the query
    #[error("telemetry query failed: {0}")]
    QueryFailed(String),
}

/// Observability backend interface
///
/// Implementations must answer deterministically for a fixed backend state;
/// the investigation engine relies on reproducible runs.
#[async_trait::async_trait]
pub trait TelemetryProvider: Send + Sync + std::fmt::Debug {
    /// Fetch a metric series over a window, in timestamp order
    async fn metric_series(&self, query: &MetricQuery) -> Result<Vec<Sample>, TelemetryError>;

    /// Count errors logged by a service over a window
    async fn error_count(&self, service: &str, range: &TimeRange) -> Result<u64, TelemetryError>;
}
