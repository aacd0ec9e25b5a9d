//! End-to-end scenarios for the investigation orchestrator, driven by
//! scripted agents, strategies, and humans.

use compass_core::{
    AuditEventKind, CompassConfig, CompassError, HypothesisValidator, InvestigationOrchestrator,
    NO_REASONING_PLACEHOLDER,
};
use compass_model::{AgentRole, Cost, HypothesisStatus};
use compass_strategies::StrategyRegistry;
use compass_test_utils::{
    sample_incident, threshold_hypothesis, CancellingHuman, ScriptedAgent, ScriptedHuman,
    ScriptedStrategy, UnreachableHuman,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn validator_of(strategies: Vec<ScriptedStrategy>) -> HypothesisValidator {
    let mut registry = StrategyRegistry::new();
    for strategy in strategies {
        registry.register(Arc::new(strategy));
    }
    HypothesisValidator::new(registry)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn budget_overrun_stops_at_the_offending_agent() {
    init_tracing();
    let incident = sample_incident(&["checkout"]);
    let mut orchestrator = InvestigationOrchestrator::builder()
        .budget_limit(Cost::from_dollars(10.0))
        .application(Arc::new(
            ScriptedAgent::new(AgentRole::Application).with_cost(Cost::from_dollars(4.0)),
        ))
        .database(Arc::new(
            ScriptedAgent::new(AgentRole::Database).with_cost(Cost::from_dollars(7.0)),
        ))
        .network(Arc::new(
            ScriptedAgent::new(AgentRole::Network).with_cost(Cost::from_dollars(99.0)),
        ))
        .human(Arc::new(UnreachableHuman))
        .validator(validator_of(vec![]))
        .build()
        .unwrap();

    let result = orchestrator.observe(&incident).await;

    let err = result.unwrap_err();
    match &err {
        CompassError::BudgetExceeded {
            boundary,
            spent,
            limit,
            breakdown,
            ..
        } => {
            assert_eq!(boundary, "database");
            assert_eq!(*spent, Cost::from_dollars(11.0));
            assert_eq!(*limit, Cost::from_dollars(10.0));
            // Agent C was never invoked, so it never entered the ledger.
            assert!(!breakdown.iter().any(|(label, _)| label == "network"));
        }
        other => panic!("expected budget error, got {other:?}"),
    }
    assert_eq!(orchestrator.total_cost(), Cost::from_dollars(11.0));
    assert!(orchestrator
        .audit_log()
        .events()
        .iter()
        .any(|e| matches!(e.kind, AuditEventKind::BudgetExceeded { .. })));
}

#[tokio::test]
async fn hypotheses_are_ranked_without_merging() {
    let incident = sample_incident(&["checkout"]);
    let mut orchestrator = InvestigationOrchestrator::builder()
        .budget_limit(Cost::from_dollars(10.0))
        .application(Arc::new(
            ScriptedAgent::new(AgentRole::Application)
                .with_hypotheses(vec![threshold_hypothesis(AgentRole::Application, 0.60)]),
        ))
        .database(Arc::new(
            ScriptedAgent::new(AgentRole::Database)
                .with_hypotheses(vec![threshold_hypothesis(AgentRole::Database, 0.75)]),
        ))
        .network(Arc::new(
            ScriptedAgent::new(AgentRole::Network)
                .with_hypotheses(vec![threshold_hypothesis(AgentRole::Network, 0.90)]),
        ))
        .human(Arc::new(UnreachableHuman))
        .validator(validator_of(vec![]))
        .build()
        .unwrap();

    let observations = orchestrator.observe(&incident).await.unwrap();
    let hypotheses = orchestrator.generate_hypotheses(&observations).await.unwrap();

    assert_eq!(hypotheses.len(), 3);
    assert_eq!(hypotheses[0].initial_confidence(), 0.90);
    assert_eq!(hypotheses[1].initial_confidence(), 0.75);
    assert_eq!(hypotheses[2].initial_confidence(), 0.60);
}

#[tokio::test]
async fn three_survived_trials_recalculate_to_thirty_percent() {
    let incident = sample_incident(&["checkout"]);
    let mut orchestrator = InvestigationOrchestrator::builder()
        .budget_limit(Cost::from_dollars(10.0))
        .human(Arc::new(UnreachableHuman))
        .validator(validator_of(vec![
            ScriptedStrategy::surviving("trial_one"),
            ScriptedStrategy::surviving("trial_two"),
            ScriptedStrategy::surviving("trial_three"),
        ]))
        .build()
        .unwrap();

    let mut hypotheses = vec![threshold_hypothesis(AgentRole::Application, 0.5)];
    let tested = orchestrator
        .test_hypotheses(&mut hypotheses, &incident)
        .await
        .unwrap();

    assert_eq!(tested.len(), 1);
    let h = &hypotheses[0];
    assert_eq!(h.survived_attempts(), 3);
    assert!((h.current_confidence() - 0.30).abs() < 0.01);
    assert_eq!(h.status(), HypothesisStatus::Validating);
}

#[tokio::test]
async fn decision_records_rank_and_count() {
    let incident = sample_incident(&["checkout"]);
    let mut orchestrator = InvestigationOrchestrator::builder()
        .budget_limit(Cost::from_dollars(10.0))
        .human(Arc::new(
            ScriptedHuman::selecting(1).with_reasoning("matches the deploy timeline"),
        ))
        .validator(validator_of(vec![]))
        .build()
        .unwrap();

    let hypotheses = vec![
        threshold_hypothesis(AgentRole::Network, 0.90),
        threshold_hypothesis(AgentRole::Database, 0.75),
        threshold_hypothesis(AgentRole::Application, 0.60),
    ];

    let selected = orchestrator.decide(&hypotheses, &incident).await.unwrap();
    assert_eq!(selected.id(), hypotheses[1].id());
    assert_eq!(selected.status(), hypotheses[1].status());

    let events = orchestrator.audit_log().events();
    let decision = events
        .iter()
        .find_map(|e| match &e.kind {
            AuditEventKind::DecisionMade {
                hypothesis_count,
                selected_rank,
                reasoning,
                ..
            } => Some((*hypothesis_count, *selected_rank, reasoning.clone())),
            _ => None,
        })
        .expect("decision event missing");
    assert_eq!(decision.0, 3);
    assert_eq!(decision.1, 2);
    assert_eq!(decision.2, "matches the deploy timeline");
}

#[tokio::test]
async fn strategy_data_source_failure_is_not_fatal() {
    let incident = sample_incident(&["checkout"]);
    let mut orchestrator = InvestigationOrchestrator::builder()
        .budget_limit(Cost::from_dollars(10.0))
        .human(Arc::new(UnreachableHuman))
        .validator(validator_of(vec![ScriptedStrategy::failing("broken_source")]))
        .build()
        .unwrap();

    let mut hypotheses = vec![threshold_hypothesis(AgentRole::Application, 0.7)];
    let tested = orchestrator
        .test_hypotheses(&mut hypotheses, &incident)
        .await
        .unwrap();

    assert_eq!(tested.len(), 1);
    let h = &hypotheses[0];
    assert_eq!(h.disproof_attempts().len(), 1);
    let attempt = &h.disproof_attempts()[0];
    assert!(!attempt.disproven);
    assert!(attempt.reasoning.contains("failed"));
    // The only attempt was a data-layer failure: explicit inconclusive.
    assert_eq!(h.status(), HypothesisStatus::Inconclusive);
}

#[tokio::test]
async fn deciding_on_nothing_never_reaches_the_human() {
    let incident = sample_incident(&["checkout"]);
    let mut orchestrator = InvestigationOrchestrator::builder()
        .budget_limit(Cost::from_dollars(10.0))
        .human(Arc::new(UnreachableHuman))
        .validator(validator_of(vec![]))
        .build()
        .unwrap();

    let result = orchestrator.decide(&[], &incident).await;
    match result {
        Err(CompassError::NoHypotheses { incident_id }) => {
            assert_eq!(incident_id, incident.id);
        }
        other => panic!("expected NoHypotheses, got {other:?}"),
    }
}

#[tokio::test]
async fn observe_with_no_agents_returns_empty() {
    let incident = sample_incident(&["checkout"]);
    let mut orchestrator = InvestigationOrchestrator::builder()
        .budget_limit(Cost::from_dollars(10.0))
        .human(Arc::new(UnreachableHuman))
        .validator(validator_of(vec![]))
        .build()
        .unwrap();

    let observations = orchestrator.observe(&incident).await.unwrap();
    assert!(observations.is_empty());
    assert_eq!(orchestrator.total_cost(), Cost::ZERO);
}

#[tokio::test]
async fn failing_agent_degrades_instead_of_aborting() {
    let incident = sample_incident(&["checkout"]);
    let mut orchestrator = InvestigationOrchestrator::builder()
        .budget_limit(Cost::from_dollars(10.0))
        .application(Arc::new(
            ScriptedAgent::new(AgentRole::Application)
                .failing_observe()
                .with_cost(Cost::from_dollars(0.5)),
        ))
        .database(Arc::new(
            ScriptedAgent::new(AgentRole::Database)
                .with_observations(vec![compass_test_utils::note_observation(
                    AgentRole::Database,
                    "connection pool saturated",
                )])
                .with_cost(Cost::from_dollars(1.0)),
        ))
        .human(Arc::new(UnreachableHuman))
        .validator(validator_of(vec![]))
        .build()
        .unwrap();

    let observations = orchestrator.observe(&incident).await.unwrap();
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].source, AgentRole::Database);
    // The failed agent's cost still counts.
    assert_eq!(orchestrator.total_cost(), Cost::from_dollars(1.5));
    assert!(orchestrator
        .audit_log()
        .events()
        .iter()
        .any(|e| matches!(e.kind, AuditEventKind::AgentFailed { .. })));
}

#[tokio::test]
async fn slow_agent_times_out_and_investigation_continues() {
    let incident = sample_incident(&["checkout"]);
    let config = CompassConfig::new().with_agent_timeout(Duration::from_millis(50));
    let mut orchestrator = InvestigationOrchestrator::builder()
        .config(config)
        .budget_limit(Cost::from_dollars(10.0))
        .application(Arc::new(
            ScriptedAgent::new(AgentRole::Application).with_delay(Duration::from_millis(500)),
        ))
        .database(Arc::new(ScriptedAgent::new(AgentRole::Database).with_observations(vec![
            compass_test_utils::note_observation(AgentRole::Database, "lock contention"),
        ])))
        .human(Arc::new(UnreachableHuman))
        .validator(validator_of(vec![]))
        .build()
        .unwrap();

    let observations = orchestrator.observe(&incident).await.unwrap();
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].source, AgentRole::Database);
}

#[tokio::test]
async fn cancellation_is_reraised_and_audited() {
    let incident = sample_incident(&["checkout"]);
    let mut orchestrator = InvestigationOrchestrator::builder()
        .budget_limit(Cost::from_dollars(10.0))
        .human(Arc::new(CancellingHuman))
        .validator(validator_of(vec![]))
        .build()
        .unwrap();

    let hypotheses = vec![threshold_hypothesis(AgentRole::Application, 0.8)];
    let result = orchestrator.decide(&hypotheses, &incident).await;

    assert!(matches!(result, Err(CompassError::DecisionCancelled)));
    assert!(orchestrator
        .audit_log()
        .events()
        .iter()
        .any(|e| matches!(e.kind, AuditEventKind::DecisionCancelled)));
}

#[tokio::test]
async fn empty_reasoning_gets_placeholder_and_warning_event() {
    let incident = sample_incident(&["checkout"]);
    let mut orchestrator = InvestigationOrchestrator::builder()
        .budget_limit(Cost::from_dollars(10.0))
        .human(Arc::new(ScriptedHuman::selecting(0).without_reasoning()))
        .validator(validator_of(vec![]))
        .build()
        .unwrap();

    let hypotheses = vec![threshold_hypothesis(AgentRole::Application, 0.8)];
    orchestrator.decide(&hypotheses, &incident).await.unwrap();

    let events = orchestrator.audit_log().events();
    assert!(events
        .iter()
        .any(|e| matches!(e.kind, AuditEventKind::DecisionReasoningMissing)));
    let reasoning = events
        .iter()
        .find_map(|e| match &e.kind {
            AuditEventKind::DecisionMade { reasoning, .. } => Some(reasoning.clone()),
            _ => None,
        })
        .expect("decision event missing");
    assert_eq!(reasoning, NO_REASONING_PLACEHOLDER);
}

#[tokio::test]
async fn act_phase_tests_at_most_the_configured_cap_highest_first() {
    let incident = sample_incident(&["checkout"]);
    let mut orchestrator = InvestigationOrchestrator::builder()
        .budget_limit(Cost::from_dollars(10.0))
        .human(Arc::new(UnreachableHuman))
        .validator(validator_of(vec![ScriptedStrategy::surviving("trial")]))
        .build()
        .unwrap();

    let mut hypotheses = vec![
        threshold_hypothesis(AgentRole::Application, 0.40),
        threshold_hypothesis(AgentRole::Database, 0.95),
        threshold_hypothesis(AgentRole::Network, 0.70),
        threshold_hypothesis(AgentRole::Application, 0.85),
        threshold_hypothesis(AgentRole::Database, 0.10),
    ];
    let expected: Vec<_> = vec![
        hypotheses[1].id(),
        hypotheses[3].id(),
        hypotheses[2].id(),
    ];

    let tested = orchestrator
        .test_hypotheses(&mut hypotheses, &incident)
        .await
        .unwrap();

    assert_eq!(tested, expected);
    // Untested hypotheses keep their proposed status.
    assert_eq!(hypotheses[0].status(), HypothesisStatus::Proposed);
    assert_eq!(hypotheses[4].status(), HypothesisStatus::Proposed);
}

#[tokio::test]
async fn act_phase_budget_overrun_retains_completed_tests() {
    let incident = sample_incident(&["checkout"]);
    // Each tested hypothesis charges $6 through the strategy meter; the
    // second pre-check sees $6 > $5 and aborts.
    let mut orchestrator = InvestigationOrchestrator::builder()
        .budget_limit(Cost::from_dollars(5.0))
        .human(Arc::new(UnreachableHuman))
        .validator(validator_of(vec![
            ScriptedStrategy::surviving("expensive_trial").with_cost(Cost::from_dollars(6.0)),
        ]))
        .build()
        .unwrap();

    let mut hypotheses = vec![
        threshold_hypothesis(AgentRole::Application, 0.9),
        threshold_hypothesis(AgentRole::Database, 0.8),
    ];

    let result = orchestrator.test_hypotheses(&mut hypotheses, &incident).await;
    assert!(matches!(result, Err(CompassError::BudgetExceeded { .. })));

    // First hypothesis was tested before the ceiling was crossed.
    assert_eq!(hypotheses[0].disproof_attempts().len(), 1);
    assert!(hypotheses[1].disproof_attempts().is_empty());
}

#[tokio::test]
async fn audit_chain_verifies_after_a_full_run() -> anyhow::Result<()> {
    init_tracing();
    let incident = sample_incident(&["checkout"]);
    let mut orchestrator = InvestigationOrchestrator::builder()
        .budget_limit(Cost::from_dollars(10.0))
        .application(Arc::new(
            ScriptedAgent::new(AgentRole::Application)
                .with_hypotheses(vec![threshold_hypothesis(AgentRole::Application, 0.8)])
                .with_cost(Cost::from_dollars(1.0)),
        ))
        .human(Arc::new(ScriptedHuman::selecting(0)))
        .validator(validator_of(vec![ScriptedStrategy::surviving("trial")]))
        .build()?;

    let observations = orchestrator.observe(&incident).await?;
    let mut hypotheses = orchestrator.generate_hypotheses(&observations).await?;
    let _selected = orchestrator.decide(&hypotheses, &incident).await?;
    let tested = orchestrator.test_hypotheses(&mut hypotheses, &incident).await?;

    assert_eq!(tested.len(), 1);
    orchestrator.audit_log().verify_integrity()?;
    assert!(orchestrator.audit_log().len() >= 4);
    Ok(())
}
