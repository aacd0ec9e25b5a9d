//! COMPASS Core - the OODA coordination engine
//!
//! The central component of an investigation:
//! - Sequences Observe -> Orient -> Decide -> Act over one incident
//! - Enforces a monetary budget ceiling at every agent and strategy
//!   boundary
//! - Ranks hypotheses by initial confidence and drives the Act-phase
//!   validator
//! - Captures the human decision checkpoint with sanitized audit output
//!
//! # Example
//!
//! ```rust,ignore
//! use compass_core::{CompassConfig, HypothesisValidator, InvestigationOrchestrator};
//!
//! # async fn example(incident: compass_model::Incident) -> Result<(), compass_core::CompassError> {
//! let config = CompassConfig::new();
//! let budget = config.budget_for(incident.severity);
//! let mut orchestrator = InvestigationOrchestrator::builder()
//!     .config(config)
//!     .budget_limit(budget)
//!     .application(application_agent)
//!     .database(database_agent)
//!     .human(cli_prompt)
//!     .validator(HypothesisValidator::new(registry))
//!     .build()?;
//!
//! let observations = orchestrator.observe(&incident).await?;
//! let mut hypotheses = orchestrator.generate_hypotheses(&observations).await?;
//! let selected = orchestrator.decide(&hypotheses, &incident).await?;
//! let tested = orchestrator.test_hypotheses(&mut hypotheses, &incident).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod audit;
pub mod decision;
pub mod error;
pub mod ledger;
pub mod orchestrator;
pub mod types;
pub mod validator;

// Re-exports for convenience
pub use audit::{AuditError, AuditEvent, AuditEventKind, AuditLog, EventId};
pub use decision::{
    sanitize_reasoning, DecisionError, DecisionInterface, HumanDecision, MAX_REASONING_CHARS,
    NO_REASONING_PLACEHOLDER,
};
pub use error::CompassError;
pub use ledger::CostLedger;
pub use orchestrator::{InvestigationOrchestrator, OrchestratorBuilder};
pub use types::{CompassConfig, Phase};
pub use validator::HypothesisValidator;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with COMPASS Core
    pub use crate::{
        AuditLog, CompassConfig, CompassError, CostLedger, DecisionInterface, HumanDecision,
        HypothesisValidator, InvestigationOrchestrator, Phase,
    };
    pub use compass_model::{
        AgentRole, Cost, Hypothesis, HypothesisClaim, HypothesisStatus, Incident, Observation,
        Severity,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
