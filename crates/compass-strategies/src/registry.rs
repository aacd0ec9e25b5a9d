//! Strategy registry
//!
//! Holds the configured disproof strategies and selects the ones
//! applicable to a claim kind, preserving registration order so trial
//! sequences stay deterministic.

use crate::scope::ScopeVerificationStrategy;
use crate::strategy::DisproofStrategy;
use crate::temporal::TemporalContradictionStrategy;
use crate::threshold::MetricThresholdStrategy;
use compass_model::ClaimKind;
use compass_telemetry::TelemetryProvider;
use std::sync::Arc;

/// Registry of available disproof strategies
#[derive(Debug, Default, Clone)]
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn DisproofStrategy>>,
}

impl StrategyRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Registry with the built-in strategies over one telemetry backend
    #[must_use]
    pub fn with_defaults(provider: Arc<dyn TelemetryProvider>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TemporalContradictionStrategy::new(provider.clone())));
        registry.register(Arc::new(ScopeVerificationStrategy::new(provider.clone())));
        registry.register(Arc::new(MetricThresholdStrategy::new(provider)));
        registry
    }

    /// Register a strategy
    pub fn register(&mut self, strategy: Arc<dyn DisproofStrategy>) {
        self.strategies.push(strategy);
    }

    /// Strategies applicable to a claim kind, in registration order
    #[must_use]
    pub fn for_claim(&self, kind: ClaimKind) -> Vec<Arc<dyn DisproofStrategy>> {
        self.strategies
            .iter()
            .filter(|s| s.applies_to(kind))
            .cloned()
            .collect()
    }

    /// All registered strategy names
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Number of registered strategies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if the registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
