//! Monetary cost accounting
//!
//! Costs are integer micro-USD so that budget comparisons are exact.
//! Agents and strategies report running counters in this unit; the
//! orchestrator's ledger sums them against the investigation ceiling.

use serde::{Deserialize, Serialize};

const MICROS_PER_DOLLAR: u64 = 1_000_000;

/// Monetary amount in micro-USD
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Cost(u64);

impl Cost {
    /// Zero cost
    pub const ZERO: Cost = Cost(0);

    /// Create from raw micro-USD
    #[inline]
    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Create from a dollar amount (rounded to the nearest micro-USD)
    ///
    /// Negative or non-finite inputs are treated as zero.
    #[inline]
    #[must_use]
    pub fn from_dollars(dollars: f64) -> Self {
        if !dollars.is_finite() || dollars <= 0.0 {
            return Self::ZERO;
        }
        Self((dollars * MICROS_PER_DOLLAR as f64).round() as u64)
    }

    /// Raw micro-USD value
    #[inline]
    #[must_use]
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Dollar value (lossy, for display and ratios only)
    #[inline]
    #[must_use]
    pub fn as_dollars(self) -> f64 {
        self.0 as f64 / MICROS_PER_DOLLAR as f64
    }

    /// Saturating addition
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, other: Cost) -> Cost {
        Cost(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, other: Cost) -> Cost {
        Cost(self.0.saturating_sub(other.0))
    }

    /// Scale by a fraction in [0, 1], rounding down
    ///
    /// Fractions outside [0, 1] are clamped.
    #[inline]
    #[must_use]
    pub fn fraction(self, fraction: f64) -> Cost {
        let f = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Cost((self.0 as f64 * f) as u64)
    }

    /// Check if zero
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        self.saturating_add(rhs)
    }
}

impl std::ops::AddAssign for Cost {
    fn add_assign(&mut self, rhs: Cost) {
        *self = self.saturating_add(rhs);
    }
}

impl std::iter::Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::ZERO, Cost::saturating_add)
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.as_dollars())
    }
}

/// Monotonic running cost counter
///
/// Agents and strategies charge this for every backend query or
/// generation call; the orchestrator's ledger reads it at call
/// boundaries.
#[derive(Debug, Default)]
pub struct CostMeter {
    micros: std::sync::atomic::AtomicU64,
}

impl CostMeter {
    /// Create a zeroed meter
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a charge
    #[inline]
    pub fn charge(&self, cost: Cost) {
        self.micros
            .fetch_add(cost.as_micros(), std::sync::atomic::Ordering::Relaxed);
    }

    /// Total charged so far
    #[inline]
    #[must_use]
    pub fn total(&self) -> Cost {
        Cost::from_micros(self.micros.load(std::sync::atomic::Ordering::Relaxed))
    }
}
