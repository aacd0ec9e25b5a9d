//! Incident input type
//!
//! An incident is the immutable starting point of an investigation:
//! created once from the paging/alerting layer, never mutated.

use crate::error::ModelError;
use crate::ids::IncidentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Incident severity tier
///
/// Selects the budget ceiling applied to the investigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Routine incident, lower budget ceiling
    Routine,
    /// Critical incident, higher budget ceiling
    Critical,
}

impl Severity {
    /// String form for logs and audit events
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Routine => "routine",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable incident under investigation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// Incident identifier (assigned by the alerting layer)
    pub id: IncidentId,
    /// Human-readable title
    pub title: String,
    /// When the incident started
    pub started_at: DateTime<Utc>,
    /// Services known or suspected to be affected
    pub affected_services: Vec<String>,
    /// Severity tier
    pub severity: Severity,
}

impl Incident {
    /// Create a new incident
    ///
    /// # Errors
    /// `ModelError::InvalidIncident` if the title is empty or an affected
    /// service name is blank.
    pub fn new(
        id: IncidentId,
        title: impl Into<String>,
        started_at: DateTime<Utc>,
        affected_services: Vec<String>,
        severity: Severity,
    ) -> Result<Self, ModelError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ModelError::InvalidIncident("title is empty".to_string()));
        }
        if affected_services.iter().any(|s| s.trim().is_empty()) {
            return Err(ModelError::InvalidIncident(
                "affected service name is blank".to_string(),
            ));
        }
        Ok(Self {
            id,
            title,
            started_at,
            affected_services,
            severity,
        })
    }
}
