//! Cost ledger
//!
//! The only mutable state shared across the sequence of agent and
//! strategy calls. Each entry holds a source's self-reported running
//! total, refreshed (overwritten, not added) immediately after the
//! source returns. Recomputing is idempotent, so a retried refresh can
//! never double-count. Execution is strictly sequential in this core, so
//! no locking is involved; a future parallel dispatcher would have to
//! replace this with an atomic check-and-increment.

use compass_model::Cost;
use indexmap::IndexMap;

/// Per-source cost ledger with insertion-ordered breakdown
#[derive(Debug, Default, Clone)]
pub struct CostLedger {
    entries: IndexMap<String, Cost>,
}

impl CostLedger {
    /// Create an empty ledger
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a source's current running total, replacing any prior entry
    pub fn record(&mut self, source: impl Into<String>, total: Cost) {
        self.entries.insert(source.into(), total);
    }

    /// Total across all sources
    #[must_use]
    pub fn total(&self) -> Cost {
        self.entries.values().copied().sum()
    }

    /// A source's recorded total
    #[inline]
    #[must_use]
    pub fn get(&self, source: &str) -> Cost {
        self.entries.get(source).copied().unwrap_or(Cost::ZERO)
    }

    /// Breakdown in first-recorded order
    #[must_use]
    pub fn breakdown(&self) -> Vec<(String, Cost)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    /// Number of sources recorded
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no source has reported yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
