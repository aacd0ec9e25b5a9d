//! Testing utilities for the COMPASS workspace
//!
//! Scripted doubles for agents, strategies, and the human decision
//! interface, plus fixture builders.

#![allow(missing_docs)]

use compass_agents::{AgentError, SpecialistAgent};
use compass_core::{DecisionError, DecisionInterface, HumanDecision};
use compass_model::{
    AgentRole, ClaimKind, Cost, Evidence, EvidenceQuality, Hypothesis, HypothesisClaim, Incident,
    IncidentId, Observation, ObservationPayload, Severity, ThresholdOperator,
};
use compass_strategies::{DisproofStrategy, StrategyError, StrategyOutcome};
use chrono::Utc;
use std::time::Duration;

/// Agent double that replays scripted results
#[derive(Debug)]
pub struct ScriptedAgent {
    role: AgentRole,
    observations: Vec<Observation>,
    hypotheses: Vec<Hypothesis>,
    reported_cost: Cost,
    fail_observe: bool,
    fail_generate: bool,
    delay: Option<Duration>,
}

impl ScriptedAgent {
    pub fn new(role: AgentRole) -> Self {
        Self {
            role,
            observations: Vec::new(),
            hypotheses: Vec::new(),
            reported_cost: Cost::ZERO,
            fail_observe: false,
            fail_generate: false,
            delay: None,
        }
    }

    pub fn with_observations(mut self, observations: Vec<Observation>) -> Self {
        self.observations = observations;
        self
    }

    pub fn with_hypotheses(mut self, hypotheses: Vec<Hypothesis>) -> Self {
        self.hypotheses = hypotheses;
        self
    }

    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.reported_cost = cost;
        self
    }

    pub fn failing_observe(mut self) -> Self {
        self.fail_observe = true;
        self
    }

    pub fn failing_generate(mut self) -> Self {
        self.fail_generate = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait::async_trait]
impl SpecialistAgent for ScriptedAgent {
    fn role(&self) -> AgentRole {
        self.role
    }

    async fn observe(&self, _incident: &Incident) -> Result<Vec<Observation>, AgentError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_observe {
            return Err(AgentError::Failed("scripted observe failure".to_string()));
        }
        Ok(self.observations.clone())
    }

    async fn generate_hypotheses(
        &self,
        _observations: &[Observation],
    ) -> Result<Vec<Hypothesis>, AgentError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_generate {
            return Err(AgentError::Failed("scripted generate failure".to_string()));
        }
        Ok(self.hypotheses.clone())
    }

    fn cost(&self) -> Cost {
        self.reported_cost
    }
}

/// Human double that always selects the hypothesis at a fixed index
#[derive(Debug)]
pub struct ScriptedHuman {
    select_index: usize,
    reasoning: Option<String>,
}

impl ScriptedHuman {
    pub fn selecting(index: usize) -> Self {
        Self {
            select_index: index,
            reasoning: Some("scripted selection".to_string()),
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn without_reasoning(mut self) -> Self {
        self.reasoning = None;
        self
    }
}

#[async_trait::async_trait]
impl DecisionInterface for ScriptedHuman {
    async fn present(
        &self,
        hypotheses: &[Hypothesis],
        _incident: &Incident,
    ) -> Result<HumanDecision, DecisionError> {
        let selected = hypotheses.get(self.select_index).ok_or_else(|| {
            DecisionError::Failed(format!(
                "scripted index {} out of range ({} presented)",
                self.select_index,
                hypotheses.len()
            ))
        })?;
        Ok(HumanDecision::new(selected.id(), self.reasoning.clone()))
    }
}

/// Human double that always interrupts
#[derive(Debug)]
pub struct CancellingHuman;

#[async_trait::async_trait]
impl DecisionInterface for CancellingHuman {
    async fn present(
        &self,
        _hypotheses: &[Hypothesis],
        _incident: &Incident,
    ) -> Result<HumanDecision, DecisionError> {
        Err(DecisionError::Cancelled)
    }
}

/// Human double that panics if ever invoked
#[derive(Debug)]
pub struct UnreachableHuman;

#[async_trait::async_trait]
impl DecisionInterface for UnreachableHuman {
    async fn present(
        &self,
        _hypotheses: &[Hypothesis],
        _incident: &Incident,
    ) -> Result<HumanDecision, DecisionError> {
        panic!("decision interface must not be invoked in this scenario");
    }
}

#[derive(Debug, Clone, Copy)]
enum ScriptedVerdict {
    Survive,
    Disprove,
    Inconclusive,
    Fail,
}

/// Strategy double with a fixed verdict
#[derive(Debug)]
pub struct ScriptedStrategy {
    name: &'static str,
    verdict: ScriptedVerdict,
    cost: Cost,
}

impl ScriptedStrategy {
    pub fn surviving(name: &'static str) -> Self {
        Self {
            name,
            verdict: ScriptedVerdict::Survive,
            cost: Cost::ZERO,
        }
    }

    pub fn disproving(name: &'static str) -> Self {
        Self {
            name,
            verdict: ScriptedVerdict::Disprove,
            cost: Cost::ZERO,
        }
    }

    pub fn inconclusive(name: &'static str) -> Self {
        Self {
            name,
            verdict: ScriptedVerdict::Inconclusive,
            cost: Cost::ZERO,
        }
    }

    /// Fails at the data layer, as an unavailable backend would
    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            verdict: ScriptedVerdict::Fail,
            cost: Cost::ZERO,
        }
    }

    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.cost = cost;
        self
    }
}

#[async_trait::async_trait]
impl DisproofStrategy for ScriptedStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn applies_to(&self, _kind: ClaimKind) -> bool {
        true
    }

    async fn execute(
        &self,
        _hypothesis: &Hypothesis,
        _incident: &Incident,
    ) -> Result<StrategyOutcome, StrategyError> {
        match self.verdict {
            ScriptedVerdict::Survive => Ok(StrategyOutcome::survived(
                "scripted trial",
                "prediction holds",
                "held",
                vec![],
                "scripted survival",
            )),
            ScriptedVerdict::Disprove => Ok(StrategyOutcome::disproven(
                "scripted trial",
                "prediction holds",
                "did not hold",
                vec![Evidence::new(
                    "scripted contradiction",
                    EvidenceQuality::Direct,
                    false,
                )],
                "scripted disproof",
            )),
            ScriptedVerdict::Inconclusive => Ok(StrategyOutcome::inconclusive(
                "scripted trial",
                "prediction holds",
                "scripted inconclusive",
            )),
            ScriptedVerdict::Fail => Err(StrategyError::Telemetry(
                compass_telemetry::TelemetryError::Unavailable(
                    "scripted data source outage".to_string(),
                ),
            )),
        }
    }

    fn cost(&self) -> Cost {
        self.cost
    }
}

/// Incident fixture over the given services
pub fn sample_incident(services: &[&str]) -> Incident {
    Incident::new(
        IncidentId::new(),
        "sample incident",
        Utc::now(),
        services.iter().map(|s| s.to_string()).collect(),
        Severity::Routine,
    )
    .unwrap()
}

/// Threshold-claim hypothesis fixture with a chosen initial confidence
pub fn threshold_hypothesis(origin: AgentRole, initial_confidence: f64) -> Hypothesis {
    Hypothesis::new(
        format!("error rate regression (initial {initial_confidence})"),
        origin,
        HypothesisClaim::Threshold {
            metric: "http.server.error_rate".to_string(),
            operator: ThresholdOperator::GreaterThan,
            threshold: 0.05,
        },
        initial_confidence,
    )
    .unwrap()
}

/// Observation fixture carrying a note payload
pub fn note_observation(source: AgentRole, note: &str) -> Observation {
    Observation::new(source, ObservationPayload::Note(note.to_string()), 0.9)
}
