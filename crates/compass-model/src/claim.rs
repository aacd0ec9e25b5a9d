//! Hypothesis claims
//!
//! Each hypothesis carries a typed claim describing what it asserts about
//! the incident. Claims are validated when the hypothesis is created, so a
//! disproof strategy never discovers a missing field halfway through a
//! trial.

use crate::error::ModelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comparison operator for threshold claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThresholdOperator {
    /// Observed value strictly above threshold
    GreaterThan,
    /// Observed value at or above threshold
    GreaterOrEqual,
    /// Observed value strictly below threshold
    LessThan,
    /// Observed value at or below threshold
    LessOrEqual,
}

impl ThresholdOperator {
    /// Evaluate `value <op> threshold`
    #[inline]
    #[must_use]
    pub fn evaluate(&self, value: f64, threshold: f64) -> bool {
        match self {
            ThresholdOperator::GreaterThan => value > threshold,
            ThresholdOperator::GreaterOrEqual => value >= threshold,
            ThresholdOperator::LessThan => value < threshold,
            ThresholdOperator::LessOrEqual => value <= threshold,
        }
    }

    /// Symbol form for log lines and predictions
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ThresholdOperator::GreaterThan => ">",
            ThresholdOperator::GreaterOrEqual => ">=",
            ThresholdOperator::LessThan => "<",
            ThresholdOperator::LessOrEqual => "<=",
        }
    }
}

impl std::fmt::Display for ThresholdOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Claim category, used to select applicable disproof strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimKind {
    /// Asserts when the fault was introduced
    Temporal,
    /// Asserts how widely the fault spread
    Scope,
    /// Asserts a metric crossed a threshold
    Threshold,
}

impl ClaimKind {
    /// String form for logs
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ClaimKind::Temporal => "temporal",
            ClaimKind::Scope => "scope",
            ClaimKind::Threshold => "threshold",
        }
    }
}

/// Typed claim carried by a hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HypothesisClaim {
    /// The fault was introduced at a specific time
    Temporal {
        /// Suspected introduction time
        suspected_at: DateTime<Utc>,
        /// Metric whose anomaly onset should match
        metric: String,
    },
    /// The fault is confined to a claimed scope
    Scope {
        /// Description of the claimed blast radius
        claimed_scope: String,
        /// Number of services the claim says are affected
        service_count: usize,
    },
    /// A metric crossed a threshold during the incident
    Threshold {
        /// Metric name
        metric: String,
        /// Comparison operator
        operator: ThresholdOperator,
        /// Threshold value
        threshold: f64,
    },
}

impl HypothesisClaim {
    /// Claim category
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ClaimKind {
        match self {
            HypothesisClaim::Temporal { .. } => ClaimKind::Temporal,
            HypothesisClaim::Scope { .. } => ClaimKind::Scope,
            HypothesisClaim::Threshold { .. } => ClaimKind::Threshold,
        }
    }

    /// Validate claim fields
    ///
    /// # Errors
    /// `ModelError::InvalidClaim` on empty metric names, zero service
    /// counts, or non-finite thresholds.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            HypothesisClaim::Temporal { metric, .. } => {
                if metric.trim().is_empty() {
                    return Err(ModelError::InvalidClaim(
                        "temporal claim has empty metric".to_string(),
                    ));
                }
            }
            HypothesisClaim::Scope {
                claimed_scope,
                service_count,
            } => {
                if claimed_scope.trim().is_empty() {
                    return Err(ModelError::InvalidClaim(
                        "scope claim has empty description".to_string(),
                    ));
                }
                if *service_count == 0 {
                    return Err(ModelError::InvalidClaim(
                        "scope claim has zero service count".to_string(),
                    ));
                }
            }
            HypothesisClaim::Threshold { metric, threshold, .. } => {
                if metric.trim().is_empty() {
                    return Err(ModelError::InvalidClaim(
                        "threshold claim has empty metric".to_string(),
                    ));
                }
                if !threshold.is_finite() {
                    return Err(ModelError::InvalidClaim(format!(
                        "threshold claim has non-finite threshold {threshold}"
                    )));
                }
            }
        }
        Ok(())
    }
}
