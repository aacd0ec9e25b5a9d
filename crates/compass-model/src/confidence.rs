//! Confidence recalculation
//!
//! The single most test-relevant rule in the system:
//!
//! ```text
//! current = clamp(0, 1, initial * 0.3 + evidence_score * 0.7 + survival_bonus)
//! ```
//!
//! where `evidence_score` sums each evidence item's signed quality weight,
//! and `survival_bonus` adds 0.05 per disproof attempt that failed to
//! disprove, capped at 0.3. Any disproving attempt forces confidence to 0.0
//! regardless of the weighted sum.
//!
//! These weights are fixed constants of the model. The downstream tuning
//! parameters (validation cutoff, testing budget fraction, hypothesis cap)
//! live in configuration instead.

use crate::disproof::DisproofAttempt;
use crate::evidence::Evidence;

/// Weight of the initial confidence term
pub const INITIAL_WEIGHT: f64 = 0.3;

/// Weight of the evidence score term
pub const EVIDENCE_WEIGHT: f64 = 0.7;

/// Bonus per disproof attempt that failed to disprove
pub const SURVIVAL_BONUS_PER_ATTEMPT: f64 = 0.05;

/// Cap on the total survival bonus
pub const SURVIVAL_BONUS_CAP: f64 = 0.3;

/// Signed, quality-weighted evidence score
#[must_use]
pub fn evidence_score(supporting: &[Evidence], contradicting: &[Evidence]) -> f64 {
    supporting
        .iter()
        .chain(contradicting.iter())
        .map(Evidence::signed_weight)
        .sum()
}

/// Survival bonus for `survived` non-disproving attempts
#[must_use]
pub fn survival_bonus(survived: usize) -> f64 {
    (survived as f64 * SURVIVAL_BONUS_PER_ATTEMPT).min(SURVIVAL_BONUS_CAP)
}

/// Recalculate current confidence from the full evidence and attempt state
///
/// Returns 0.0 whenever any attempt disproved the hypothesis.
#[must_use]
pub fn recalculate(
    initial_confidence: f64,
    supporting: &[Evidence],
    contradicting: &[Evidence],
    attempts: &[DisproofAttempt],
) -> f64 {
    if attempts.iter().any(|a| a.disproven) {
        return 0.0;
    }
    let survived = attempts.iter().filter(|a| !a.disproven).count();
    let score = initial_confidence * INITIAL_WEIGHT
        + evidence_score(supporting, contradicting) * EVIDENCE_WEIGHT
        + survival_bonus(survived);
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::EvidenceQuality;

    fn survived_attempt() -> DisproofAttempt {
        DisproofAttempt::new(
            "metric_threshold",
            "evaluate",
            "holds",
            "held",
            false,
            vec![],
            "survived",
        )
        .unwrap()
    }

    fn disproving_attempt() -> DisproofAttempt {
        DisproofAttempt::new(
            "temporal_contradiction",
            "compare onsets",
            "onset after change",
            "onset before change",
            true,
            vec![],
            "disproven",
        )
        .unwrap()
    }

    #[test]
    fn three_survived_attempts_from_half_initial() {
        let attempts = vec![survived_attempt(), survived_attempt(), survived_attempt()];
        let conf = recalculate(0.5, &[], &[], &attempts);
        assert!((conf - 0.30).abs() < 0.01);
    }

    #[test]
    fn disproof_forces_zero() {
        let strong = vec![Evidence::new("direct support", EvidenceQuality::Direct, true)];
        let attempts = vec![survived_attempt(), disproving_attempt()];
        assert_eq!(recalculate(0.9, &strong, &[], &attempts), 0.0);
    }

    #[test]
    fn survival_bonus_caps_at_point_three() {
        assert_eq!(survival_bonus(6), 0.3);
        assert_eq!(survival_bonus(10), 0.3);
        assert!((survival_bonus(2) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn contradicting_evidence_pulls_down() {
        let contra = vec![Evidence::new("metric normal", EvidenceQuality::Direct, false)];
        let conf = recalculate(0.8, &[], &contra, &[]);
        // 0.8*0.3 - 1.0*0.7 clamps at 0.0
        assert_eq!(conf, 0.0);
    }

    #[test]
    fn result_always_clamped() {
        let support: Vec<Evidence> = (0..5)
            .map(|_| Evidence::new("x", EvidenceQuality::Direct, true))
            .collect();
        let conf = recalculate(1.0, &support, &[], &[]);
        assert_eq!(conf, 1.0);
    }
}
