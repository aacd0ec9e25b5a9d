//! Hash-chained audit log
//!
//! Every phase boundary appends one event. Each event's hash covers its
//! content plus the previous event's hash, so the trail is append-only
//! and tamper-evident; it is the record post-incident reviews learn
//! from. Human-entered text is sanitized before it reaches this log.

use crate::types::Phase;
use compass_model::{AgentRole, Cost, HypothesisId, HypothesisStatus, IncidentId};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use ulid::Ulid;

/// Unique audit event identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub Ulid);

impl EventId {
    /// Generate new event ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened at a phase boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuditEventKind {
    /// An agent call began
    AgentStarted {
        /// Phase the call belongs to
        phase: Phase,
        /// Agent role
        role: AgentRole,
    },
    /// An agent call completed
    AgentCompleted {
        /// Phase the call belongs to
        phase: Phase,
        /// Agent role
        role: AgentRole,
        /// Observations or hypotheses produced
        produced: usize,
        /// The agent's running cost after the call
        cost: Cost,
    },
    /// An agent call failed or timed out (recoverable)
    AgentFailed {
        /// Phase the call belongs to
        phase: Phase,
        /// Agent role
        role: AgentRole,
        /// Failure description
        reason: String,
    },
    /// The budget ceiling was crossed (fatal)
    BudgetExceeded {
        /// Phase in which the ceiling was crossed
        phase: Phase,
        /// Attributable agent or strategy boundary
        boundary: String,
        /// Total spent at the point of failure
        spent: Cost,
        /// Configured ceiling
        limit: Cost,
    },
    /// Ranked hypotheses were presented to the operator
    HypothesesPresented {
        /// Number of hypotheses presented
        count: usize,
    },
    /// Act-phase budget plan
    TestBudgetAllocated {
        /// Planned testing spend
        allocation: Cost,
        /// Budget remaining when the plan was made
        remaining: Cost,
    },
    /// The human selected a hypothesis
    DecisionMade {
        /// Hypotheses presented
        hypothesis_count: usize,
        /// 1-based rank of the selection
        selected_rank: usize,
        /// Selected hypothesis statement
        statement: String,
        /// Selected hypothesis initial confidence
        initial_confidence: f64,
        /// Agent that proposed the selection
        origin: AgentRole,
        /// Sanitized operator reasoning
        reasoning: String,
    },
    /// The decision was recorded without reasoning
    DecisionReasoningMissing,
    /// The operator aborted the decision prompt
    DecisionCancelled,
    /// A hypothesis finished one round of testing
    HypothesisTested {
        /// Hypothesis identifier
        hypothesis_id: HypothesisId,
        /// Status after testing
        status: HypothesisStatus,
        /// Confidence after testing
        confidence: f64,
        /// Total attempts on record
        attempts: usize,
    },
}

/// One audit trail entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier
    pub event_id: EventId,
    /// When the event was recorded
    pub recorded_at: DateTime<Utc>,
    /// Incident the event belongs to
    pub incident_id: IncidentId,
    /// What happened
    pub kind: AuditEventKind,
    /// Hash of the previous event (zeros for the first)
    pub prev_hash: [u8; 32],
    /// Hash of this event
    pub hash: [u8; 32],
}

/// Audit log errors
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The chain does not verify
    #[error("audit log integrity violation")]
    IntegrityViolation,
}

/// Append-only, hash-chained audit log
#[derive(Debug, Default)]
pub struct AuditLog {
    inner: Mutex<Vec<AuditEvent>>,
}

impl AuditLog {
    /// Create an empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, chaining it to the previous one
    pub fn append(&self, incident_id: IncidentId, kind: AuditEventKind) -> EventId {
        let mut guard = self.inner.lock();
        let prev_hash = guard.last().map(|e| e.hash).unwrap_or([0u8; 32]);
        let mut event = AuditEvent {
            event_id: EventId::new(),
            recorded_at: Utc::now(),
            incident_id,
            kind,
            prev_hash,
            hash: [0u8; 32],
        };
        event.hash = compute_hash(&event);
        let id = event.event_id;
        guard.push(event);
        id
    }

    /// Snapshot of all events in append order
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.inner.lock().clone()
    }

    /// Number of events recorded
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Verify the hash chain end to end
    ///
    /// # Errors
    /// `AuditError::IntegrityViolation` if any link or hash is wrong.
    pub fn verify_integrity(&self) -> Result<(), AuditError> {
        let guard = self.inner.lock();
        let mut prev = [0u8; 32];
        for event in guard.iter() {
            if event.prev_hash != prev {
                return Err(AuditError::IntegrityViolation);
            }
            if event.hash != compute_hash(event) {
                return Err(AuditError::IntegrityViolation);
            }
            prev = event.hash;
        }
        Ok(())
    }
}

fn compute_hash(event: &AuditEvent) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(event.event_id.0.to_string().as_bytes());
    hasher.update(event.recorded_at.to_rfc3339().as_bytes());
    hasher.update(event.incident_id.to_string().as_bytes());
    hasher.update(serde_json::to_vec(&event.kind).unwrap_or_default());
    hasher.update(event.prev_hash);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_kind() -> AuditEventKind {
        AuditEventKind::AgentStarted {
            phase: Phase::Observe,
            role: AgentRole::Application,
        }
    }

    #[test]
    fn append_chains_hashes() {
        let log = AuditLog::new();
        let incident = IncidentId::new();
        log.append(incident, sample_kind());
        log.append(incident, AuditEventKind::HypothesesPresented { count: 3 });

        let events = log.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].prev_hash, [0u8; 32]);
        assert_eq!(events[1].prev_hash, events[0].hash);
    }

    #[test]
    fn integrity_verifies_clean_log() {
        let log = AuditLog::new();
        let incident = IncidentId::new();
        for _ in 0..5 {
            log.append(incident, sample_kind());
        }
        assert!(log.verify_integrity().is_ok());
    }

    #[test]
    fn tampering_breaks_integrity() {
        let log = AuditLog::new();
        let incident = IncidentId::new();
        log.append(incident, sample_kind());
        log.append(incident, sample_kind());

        {
            let mut guard = log.inner.lock();
            guard[0].kind = AuditEventKind::DecisionCancelled;
        }
        assert!(matches!(
            log.verify_integrity(),
            Err(AuditError::IntegrityViolation)
        ));
    }

    #[test]
    fn empty_log_verifies() {
        let log = AuditLog::new();
        assert!(log.is_empty());
        assert!(log.verify_integrity().is_ok());
    }
}
