//! Human decision interface
//!
//! The Decide phase is the sole human-in-loop control point. The call
//! blocks the whole investigation with no timeout (operators are never
//! rushed), but an interrupt must cancel cleanly, and free-text
//! reasoning is sanitized before it reaches any log.

use compass_model::{Hypothesis, HypothesisId, Incident};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Substituted when the operator provides no reasoning
pub const NO_REASONING_PLACEHOLDER: &str = "(no reasoning provided)";

/// Cap on sanitized reasoning length, in characters
pub const MAX_REASONING_CHARS: usize = 500;

/// The operator's selection plus rationale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanDecision {
    /// Selected hypothesis
    pub selected: HypothesisId,
    /// Optional free-text reasoning
    pub reasoning: Option<String>,
    /// When the decision was made
    pub decided_at: DateTime<Utc>,
}

impl HumanDecision {
    /// Create a decision for a hypothesis
    #[must_use]
    pub fn new(selected: HypothesisId, reasoning: Option<String>) -> Self {
        Self {
            selected,
            reasoning,
            decided_at: Utc::now(),
        }
    }
}

/// Decision interface errors
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    /// The operator aborted the prompt (interrupt)
    #[error("decision cancelled by operator")]
    Cancelled,

    /// The interface failed outright
    #[error("decision interface failure: {0}")]
    Failed(String),
}

/// Blocking human decision checkpoint
///
/// Implementations present the hypotheses in the order given, all of
/// them with no truncation, and block until the operator answers or
/// interrupts.
#[async_trait::async_trait]
pub trait DecisionInterface: Send + Sync + std::fmt::Debug {
    /// Present ranked hypotheses and wait for a selection
    async fn present(
        &self,
        hypotheses: &[Hypothesis],
        incident: &Incident,
    ) -> Result<HumanDecision, DecisionError>;
}

/// Sanitize operator reasoning for logging
///
/// Strips CR/LF (log-injection defense), trims, and caps the length.
/// Returns the sanitized text plus whether the input was effectively
/// empty, in which case the fixed placeholder is substituted so the
/// missing-rationale signal is never silently lost.
#[must_use]
pub fn sanitize_reasoning(raw: Option<&str>) -> (String, bool) {
    let Some(raw) = raw else {
        return (NO_REASONING_PLACEHOLDER.to_string(), true);
    };
    let mut cleaned: String = raw
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        return (NO_REASONING_PLACEHOLDER.to_string(), true);
    }
    if let Some((idx, _)) = cleaned.char_indices().nth(MAX_REASONING_CHARS) {
        cleaned.truncate(idx);
    }
    (cleaned, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_reasoning_gets_placeholder() {
        let (text, empty) = sanitize_reasoning(None);
        assert_eq!(text, NO_REASONING_PLACEHOLDER);
        assert!(empty);
    }

    #[test]
    fn whitespace_reasoning_gets_placeholder() {
        let (text, empty) = sanitize_reasoning(Some("   \n\t "));
        assert_eq!(text, NO_REASONING_PLACEHOLDER);
        assert!(empty);
    }

    #[test]
    fn newlines_are_replaced() {
        let (text, empty) = sanitize_reasoning(Some("first line\nsecond\rthird"));
        assert!(!empty);
        assert!(!text.contains('\n'));
        assert!(!text.contains('\r'));
        assert_eq!(text, "first line second third");
    }

    #[test]
    fn long_reasoning_is_capped() {
        let long = "x".repeat(2 * MAX_REASONING_CHARS);
        let (text, empty) = sanitize_reasoning(Some(&long));
        assert!(!empty);
        assert_eq!(text.chars().count(), MAX_REASONING_CHARS);
    }

    #[test]
    fn multibyte_reasoning_truncates_on_char_boundary() {
        let long = "é".repeat(MAX_REASONING_CHARS + 10);
        let (text, _) = sanitize_reasoning(Some(&long));
        assert_eq!(text.chars().count(), MAX_REASONING_CHARS);
    }
}
