//! Quality-tagged evidence
//!
//! Evidence is an append-only audit trail on a hypothesis: items are
//! added, never edited or removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Evidence quality tier
///
/// Each tier carries the numeric weight used in confidence recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceQuality {
    /// Directly observed (e.g. the metric itself crossed the threshold)
    Direct,
    /// Corroborated by an independent signal
    Corroborated,
    /// Indirect or circumstantial
    Indirect,
}

impl EvidenceQuality {
    /// Numeric weight applied during confidence recalculation
    #[inline]
    #[must_use]
    pub const fn weight(&self) -> f64 {
        match self {
            EvidenceQuality::Direct => 1.0,
            EvidenceQuality::Corroborated => 0.7,
            EvidenceQuality::Indirect => 0.4,
        }
    }

    /// String form for logs
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            EvidenceQuality::Direct => "direct",
            EvidenceQuality::Corroborated => "corroborated",
            EvidenceQuality::Indirect => "indirect",
        }
    }
}

/// A quality-tagged datum attached to a hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// What was observed
    pub content: String,
    /// Quality tier
    pub quality: EvidenceQuality,
    /// Whether this item supports the hypothesis
    pub supports_hypothesis: bool,
    /// When the evidence was collected
    pub collected_at: DateTime<Utc>,
}

impl Evidence {
    /// Create a new evidence item
    #[must_use]
    pub fn new(content: impl Into<String>, quality: EvidenceQuality, supports_hypothesis: bool) -> Self {
        Self {
            content: content.into(),
            quality,
            supports_hypothesis,
            collected_at: Utc::now(),
        }
    }

    /// Signed weight: positive if supporting, negative if contradicting
    #[inline]
    #[must_use]
    pub fn signed_weight(&self) -> f64 {
        if self.supports_hypothesis {
            self.quality.weight()
        } else {
            -self.quality.weight()
        }
    }
}
