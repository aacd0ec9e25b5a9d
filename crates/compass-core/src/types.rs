//! Core types for the orchestrator
//!
//! Configuration defaults and the investigation phase marker.

use compass_model::{Cost, Severity};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OODA phase marker, used in audit events and error boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Collecting observations from specialist agents
    Observe,
    /// Generating and ranking hypotheses
    Orient,
    /// Human decision checkpoint
    Decide,
    /// Testing hypotheses via disproof strategies
    Act,
}

impl Phase {
    /// String form for logs
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Phase::Observe => "observe",
            Phase::Orient => "orient",
            Phase::Decide => "decide",
            Phase::Act => "act",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Orchestrator configuration
///
/// The numeric defaults here are product-tuning parameters, not model
/// constants; deployments override them per environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompassConfig {
    /// Bounded wait applied to each agent call
    pub agent_timeout: Duration,
    /// Maximum hypotheses tested during Act
    pub max_hypotheses: usize,
    /// Fraction of the remaining budget planned for Act
    pub test_budget_fraction: f64,
    /// Confidence at or above which a surviving hypothesis is validated
    pub validation_threshold: f64,
    /// Budget ceiling for routine incidents
    pub routine_budget: Cost,
    /// Budget ceiling for critical incidents
    pub critical_budget: Cost,
}

impl CompassConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With agent timeout
    #[inline]
    #[must_use]
    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    /// With max hypotheses tested during Act
    #[inline]
    #[must_use]
    pub fn with_max_hypotheses(mut self, max: usize) -> Self {
        self.max_hypotheses = max;
        self
    }

    /// With testing-phase budget fraction
    #[inline]
    #[must_use]
    pub fn with_test_budget_fraction(mut self, fraction: f64) -> Self {
        self.test_budget_fraction = fraction;
        self
    }

    /// With validation confidence threshold
    #[inline]
    #[must_use]
    pub fn with_validation_threshold(mut self, threshold: f64) -> Self {
        self.validation_threshold = threshold;
        self
    }

    /// Budget ceiling for a severity tier
    #[inline]
    #[must_use]
    pub fn budget_for(&self, severity: Severity) -> Cost {
        match severity {
            Severity::Routine => self.routine_budget,
            Severity::Critical => self.critical_budget,
        }
    }
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self {
            agent_timeout: Duration::from_secs(90),
            max_hypotheses: 3,
            test_budget_fraction: 0.30,
            validation_threshold: 0.9,
            routine_budget: Cost::from_dollars(10.0),
            critical_budget: Cost::from_dollars(50.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_parameters() {
        let config = CompassConfig::new();
        assert_eq!(config.max_hypotheses, 3);
        assert_eq!(config.test_budget_fraction, 0.30);
        assert_eq!(config.validation_threshold, 0.9);
    }

    #[test]
    fn budget_tier_lookup() {
        let config = CompassConfig::new();
        assert_eq!(config.budget_for(Severity::Routine), Cost::from_dollars(10.0));
        assert_eq!(config.budget_for(Severity::Critical), Cost::from_dollars(50.0));
    }

    #[test]
    fn builder_overrides() {
        let config = CompassConfig::new()
            .with_max_hypotheses(5)
            .with_validation_threshold(0.8);
        assert_eq!(config.max_hypotheses, 5);
        assert_eq!(config.validation_threshold, 0.8);
    }
}
