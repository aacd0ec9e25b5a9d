//! Investigation orchestrator
//!
//! Sequences Observe -> Orient -> Decide -> Act over one incident.
//! Agents run strictly sequentially in declared order (application,
//! database, network); the running cost is refreshed from each agent's
//! own counter immediately after the call returns, and the budget
//! ceiling is checked at that boundary. A failing or timed-out agent
//! degrades the investigation; crossing the ceiling aborts it.

use crate::audit::{AuditEventKind, AuditLog};
use crate::decision::{sanitize_reasoning, DecisionError, DecisionInterface};
use crate::error::CompassError;
use crate::ledger::CostLedger;
use crate::types::{CompassConfig, Phase};
use crate::validator::HypothesisValidator;
use compass_agents::SpecialistAgent;
use compass_model::{Cost, Hypothesis, HypothesisId, Incident, Observation};
use std::sync::Arc;

/// The OODA coordination engine
#[derive(Debug)]
pub struct InvestigationOrchestrator {
    config: CompassConfig,
    budget_limit: Cost,
    application: Option<Arc<dyn SpecialistAgent>>,
    database: Option<Arc<dyn SpecialistAgent>>,
    network: Option<Arc<dyn SpecialistAgent>>,
    human: Arc<dyn DecisionInterface>,
    validator: HypothesisValidator,
    ledger: CostLedger,
    audit: AuditLog,
}

impl InvestigationOrchestrator {
    /// Start building an orchestrator
    #[inline]
    #[must_use]
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    /// Configured budget ceiling
    #[inline]
    #[must_use]
    pub fn budget_limit(&self) -> Cost {
        self.budget_limit
    }

    /// Total cost recorded so far
    #[inline]
    #[must_use]
    pub fn total_cost(&self) -> Cost {
        self.ledger.total()
    }

    /// Per-source cost breakdown, always summing to [`total_cost`]
    ///
    /// [`total_cost`]: Self::total_cost
    #[inline]
    #[must_use]
    pub fn cost_breakdown(&self) -> Vec<(String, Cost)> {
        self.ledger.breakdown()
    }

    /// The audit trail
    #[inline]
    #[must_use]
    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CompassConfig {
        &self.config
    }

    /// Configured agents in declared invocation order
    fn agents(&self) -> Vec<Arc<dyn SpecialistAgent>> {
        [&self.application, &self.database, &self.network]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    /// Observe: collect observations from every configured agent
    ///
    /// Agents run sequentially with a bounded wait each. A failing or
    /// timed-out agent contributes nothing and the investigation
    /// continues; the budget check after each agent is the only fatal
    /// exit.
    ///
    /// # Errors
    /// `CompassError::BudgetExceeded` at the agent boundary that crossed
    /// the ceiling; remaining agents are never invoked.
    pub async fn observe(
        &mut self,
        incident: &Incident,
    ) -> Result<Vec<Observation>, CompassError> {
        tracing::info!(incident_id = %incident.id, "observe phase started");
        let mut observations = Vec::new();

        for agent in self.agents() {
            let role = agent.role();
            self.audit.append(
                incident.id,
                AuditEventKind::AgentStarted {
                    phase: Phase::Observe,
                    role,
                },
            );

            let result =
                tokio::time::timeout(self.config.agent_timeout, agent.observe(incident)).await;
            self.ledger.record(role.as_str(), agent.cost());

            match result {
                Ok(Ok(mut produced)) => {
                    tracing::info!(
                        role = %role,
                        observations = produced.len(),
                        cost = %agent.cost(),
                        "agent completed observation"
                    );
                    self.audit.append(
                        incident.id,
                        AuditEventKind::AgentCompleted {
                            phase: Phase::Observe,
                            role,
                            produced: produced.len(),
                            cost: agent.cost(),
                        },
                    );
                    observations.append(&mut produced);
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        role = %role,
                        error = %e,
                        "agent failed during observe; continuing without it"
                    );
                    self.audit.append(
                        incident.id,
                        AuditEventKind::AgentFailed {
                            phase: Phase::Observe,
                            role,
                            reason: e.to_string(),
                        },
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        role = %role,
                        timeout = ?self.config.agent_timeout,
                        "agent timed out during observe; continuing without it"
                    );
                    self.audit.append(
                        incident.id,
                        AuditEventKind::AgentFailed {
                            phase: Phase::Observe,
                            role,
                            reason: format!(
                                "timed out after {:?}",
                                self.config.agent_timeout
                            ),
                        },
                    );
                }
            }

            self.check_budget(Phase::Observe, role.as_str(), incident)?;
        }

        tracing::info!(
            incident_id = %incident.id,
            observations = observations.len(),
            total_cost = %self.ledger.total(),
            "observe phase complete"
        );
        Ok(observations)
    }

    /// Orient: generate hypotheses from the full observation set, ranked
    /// by initial confidence descending (stable; ties keep agent order)
    ///
    /// No deduplication or correlation is performed; each agent's
    /// hypotheses stand independently.
    ///
    /// # Errors
    /// `CompassError::BudgetExceeded` at the agent boundary that crossed
    /// the ceiling.
    pub async fn generate_hypotheses(
        &mut self,
        observations: &[Observation],
    ) -> Result<Vec<Hypothesis>, CompassError> {
        let mut hypotheses: Vec<Hypothesis> = Vec::new();

        for agent in self.agents() {
            let role = agent.role();
            let result = tokio::time::timeout(
                self.config.agent_timeout,
                agent.generate_hypotheses(observations),
            )
            .await;
            self.ledger.record(role.as_str(), agent.cost());

            match result {
                Ok(Ok(mut produced)) => {
                    tracing::info!(
                        role = %role,
                        hypotheses = produced.len(),
                        "agent proposed hypotheses"
                    );
                    hypotheses.append(&mut produced);
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        role = %role,
                        error = %e,
                        "agent failed during orient; contributing zero hypotheses"
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        role = %role,
                        timeout = ?self.config.agent_timeout,
                        "agent timed out during orient; contributing zero hypotheses"
                    );
                }
            }

            self.check_budget_in(Phase::Orient, role.as_str())?;
        }

        hypotheses.sort_by(|a, b| b.initial_confidence().total_cmp(&a.initial_confidence()));
        tracing::info!(count = hypotheses.len(), "hypotheses ranked");
        Ok(hypotheses)
    }

    /// Decide: present ranked hypotheses to the operator and capture the
    /// selection
    ///
    /// Blocks with no timeout until answered or interrupted. The
    /// selection event carries the sanitized reasoning; an empty
    /// rationale is substituted with a placeholder and flagged with a
    /// distinct warning event. The selected hypothesis is returned
    /// unmutated.
    ///
    /// # Errors
    /// - `CompassError::NoHypotheses` when called with an empty list; the
    ///   human interface is never invoked
    /// - `CompassError::DecisionCancelled` when the operator interrupts
    /// - `CompassError::UnknownSelection` when the selection was not
    ///   among the presented hypotheses
    pub async fn decide(
        &mut self,
        hypotheses: &[Hypothesis],
        incident: &Incident,
    ) -> Result<Hypothesis, CompassError> {
        if hypotheses.is_empty() {
            return Err(CompassError::NoHypotheses {
                incident_id: incident.id,
            });
        }

        self.audit.append(
            incident.id,
            AuditEventKind::HypothesesPresented {
                count: hypotheses.len(),
            },
        );
        tracing::info!(
            incident_id = %incident.id,
            count = hypotheses.len(),
            "presenting hypotheses for decision"
        );

        let decision = match self.human.present(hypotheses, incident).await {
            Ok(decision) => decision,
            Err(DecisionError::Cancelled) => {
                tracing::warn!(incident_id = %incident.id, "decision cancelled by operator");
                self.audit
                    .append(incident.id, AuditEventKind::DecisionCancelled);
                return Err(CompassError::DecisionCancelled);
            }
            Err(DecisionError::Failed(reason)) => {
                return Err(CompassError::DecisionFailed(reason));
            }
        };

        let Some(index) = hypotheses.iter().position(|h| h.id() == decision.selected) else {
            return Err(CompassError::UnknownSelection {
                hypothesis_id: decision.selected,
            });
        };
        let selected = &hypotheses[index];
        let selected_rank = index + 1;

        let (reasoning, was_empty) = sanitize_reasoning(decision.reasoning.as_deref());
        if was_empty {
            tracing::warn!(
                incident_id = %incident.id,
                "decision recorded without an audit-trail rationale"
            );
            self.audit
                .append(incident.id, AuditEventKind::DecisionReasoningMissing);
        }

        tracing::info!(
            incident_id = %incident.id,
            hypothesis_count = hypotheses.len(),
            selected_rank,
            statement = selected.statement(),
            initial_confidence = selected.initial_confidence(),
            origin = %selected.origin(),
            reasoning = %reasoning,
            "decision made"
        );
        self.audit.append(
            incident.id,
            AuditEventKind::DecisionMade {
                hypothesis_count: hypotheses.len(),
                selected_rank,
                statement: selected.statement().to_string(),
                initial_confidence: selected.initial_confidence(),
                origin: selected.origin(),
                reasoning,
            },
        );

        Ok(selected.clone())
    }

    /// Act: test the top hypotheses in place via the validator
    ///
    /// Re-ranks by initial confidence, tests at most
    /// `config.max_hypotheses` (highest first, terminal hypotheses
    /// skipped), and returns the ids actually tested. Strategy failures
    /// degrade to inconclusive attempts; crossing the budget ceiling
    /// aborts the loop with already-tested hypotheses retained.
    ///
    /// # Errors
    /// `CompassError::BudgetExceeded` at the strategy boundary that
    /// crossed the ceiling.
    pub async fn test_hypotheses(
        &mut self,
        hypotheses: &mut [Hypothesis],
        incident: &Incident,
    ) -> Result<Vec<HypothesisId>, CompassError> {
        let remaining = self.budget_limit.saturating_sub(self.ledger.total());
        let allocation = remaining.fraction(self.config.test_budget_fraction);
        tracing::info!(
            incident_id = %incident.id,
            allocation = %allocation,
            remaining = %remaining,
            "act phase started"
        );
        self.audit.append(
            incident.id,
            AuditEventKind::TestBudgetAllocated {
                allocation,
                remaining,
            },
        );

        let mut order: Vec<usize> = (0..hypotheses.len())
            .filter(|&i| !hypotheses[i].status().is_terminal())
            .collect();
        order.sort_by(|&a, &b| {
            hypotheses[b]
                .initial_confidence()
                .total_cmp(&hypotheses[a].initial_confidence())
        });
        order.truncate(self.config.max_hypotheses);

        let mut tested = Vec::new();
        for index in order {
            let result = self
                .validator
                .validate(
                    &mut hypotheses[index],
                    incident,
                    &mut self.ledger,
                    self.budget_limit,
                )
                .await;

            match result {
                Ok(()) => {
                    let hypothesis = &hypotheses[index];
                    self.audit.append(
                        incident.id,
                        AuditEventKind::HypothesisTested {
                            hypothesis_id: hypothesis.id(),
                            status: hypothesis.status(),
                            confidence: hypothesis.current_confidence(),
                            attempts: hypothesis.disproof_attempts().len(),
                        },
                    );
                    tested.push(hypothesis.id());
                }
                Err(e) => {
                    if let CompassError::BudgetExceeded {
                        phase,
                        boundary,
                        spent,
                        limit,
                        ..
                    } = &e
                    {
                        tracing::error!(
                            incident_id = %incident.id,
                            boundary = %boundary,
                            spent = %spent,
                            "budget exceeded during act; aborting remaining tests"
                        );
                        self.audit.append(
                            incident.id,
                            AuditEventKind::BudgetExceeded {
                                phase: *phase,
                                boundary: boundary.clone(),
                                spent: *spent,
                                limit: *limit,
                            },
                        );
                    }
                    return Err(e);
                }
            }
        }

        tracing::info!(
            incident_id = %incident.id,
            tested = tested.len(),
            total_cost = %self.ledger.total(),
            "act phase complete"
        );
        Ok(tested)
    }

    /// Budget check at an agent boundary, with audit on failure
    fn check_budget(
        &self,
        phase: Phase,
        boundary: &str,
        incident: &Incident,
    ) -> Result<(), CompassError> {
        let spent = self.ledger.total();
        if spent > self.budget_limit {
            tracing::error!(
                incident_id = %incident.id,
                phase = %phase,
                boundary = boundary,
                spent = %spent,
                limit = %self.budget_limit,
                "budget exceeded; aborting investigation"
            );
            self.audit.append(
                incident.id,
                AuditEventKind::BudgetExceeded {
                    phase,
                    boundary: boundary.to_string(),
                    spent,
                    limit: self.budget_limit,
                },
            );
            return Err(CompassError::BudgetExceeded {
                phase,
                boundary: boundary.to_string(),
                spent,
                limit: self.budget_limit,
                breakdown: self.ledger.breakdown(),
            });
        }
        Ok(())
    }

    /// Budget check without an incident handle (Orient receives only
    /// observations)
    fn check_budget_in(&self, phase: Phase, boundary: &str) -> Result<(), CompassError> {
        let spent = self.ledger.total();
        if spent > self.budget_limit {
            tracing::error!(
                phase = %phase,
                boundary = boundary,
                spent = %spent,
                limit = %self.budget_limit,
                "budget exceeded; aborting investigation"
            );
            return Err(CompassError::BudgetExceeded {
                phase,
                boundary: boundary.to_string(),
                spent,
                limit: self.budget_limit,
                breakdown: self.ledger.breakdown(),
            });
        }
        Ok(())
    }
}

/// Builder for [`InvestigationOrchestrator`]
#[derive(Debug, Default)]
pub struct OrchestratorBuilder {
    config: CompassConfig,
    budget_limit: Option<Cost>,
    application: Option<Arc<dyn SpecialistAgent>>,
    database: Option<Arc<dyn SpecialistAgent>>,
    network: Option<Arc<dyn SpecialistAgent>>,
    human: Option<Arc<dyn DecisionInterface>>,
    validator: Option<HypothesisValidator>,
}

impl OrchestratorBuilder {
    /// With configuration
    #[inline]
    #[must_use]
    pub fn config(mut self, config: CompassConfig) -> Self {
        self.config = config;
        self
    }

    /// With the budget ceiling (chosen externally per incident severity)
    #[inline]
    #[must_use]
    pub fn budget_limit(mut self, limit: Cost) -> Self {
        self.budget_limit = Some(limit);
        self
    }

    /// With an application specialist
    #[inline]
    #[must_use]
    pub fn application(mut self, agent: Arc<dyn SpecialistAgent>) -> Self {
        self.application = Some(agent);
        self
    }

    /// With a database specialist
    #[inline]
    #[must_use]
    pub fn database(mut self, agent: Arc<dyn SpecialistAgent>) -> Self {
        self.database = Some(agent);
        self
    }

    /// With a network specialist
    #[inline]
    #[must_use]
    pub fn network(mut self, agent: Arc<dyn SpecialistAgent>) -> Self {
        self.network = Some(agent);
        self
    }

    /// With the human decision interface
    #[inline]
    #[must_use]
    pub fn human(mut self, human: Arc<dyn DecisionInterface>) -> Self {
        self.human = Some(human);
        self
    }

    /// With the Act-phase validator
    #[inline]
    #[must_use]
    pub fn validator(mut self, validator: HypothesisValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Build the orchestrator
    ///
    /// # Errors
    /// `CompassError::Config` when the budget ceiling, decision
    /// interface, or validator is missing. Agents are all optional; an
    /// orchestrator with zero agents is valid and observes nothing.
    pub fn build(self) -> Result<InvestigationOrchestrator, CompassError> {
        let budget_limit = self
            .budget_limit
            .ok_or_else(|| CompassError::Config("budget limit is required".to_string()))?;
        let human = self
            .human
            .ok_or_else(|| CompassError::Config("decision interface is required".to_string()))?;
        let validator = self
            .validator
            .ok_or_else(|| CompassError::Config("validator is required".to_string()))?;

        Ok(InvestigationOrchestrator {
            config: self.config,
            budget_limit,
            application: self.application,
            database: self.database,
            network: self.network,
            human,
            validator,
            ledger: CostLedger::new(),
            audit: AuditLog::new(),
        })
    }
}
