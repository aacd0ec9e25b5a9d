use compass_model::{
    allowed_transitions, validate_transition, AgentRole, DisproofAttempt, Evidence,
    EvidenceQuality, Hypothesis, HypothesisClaim, HypothesisStatus, ThresholdOperator,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    AddEvidence { quality: EvidenceQuality, supports: bool },
    SurvivedAttempt,
    DisprovenAttempt,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (
            prop_oneof![
                Just(EvidenceQuality::Direct),
                Just(EvidenceQuality::Corroborated),
                Just(EvidenceQuality::Indirect),
            ],
            any::<bool>()
        )
            .prop_map(|(quality, supports)| Op::AddEvidence { quality, supports }),
        Just(Op::SurvivedAttempt),
        Just(Op::DisprovenAttempt),
    ]
}

fn fresh_hypothesis(initial: f64) -> Hypothesis {
    let mut h = Hypothesis::new(
        "error rate regression",
        AgentRole::Application,
        HypothesisClaim::Threshold {
            metric: "http.server.error_rate".to_string(),
            operator: ThresholdOperator::GreaterThan,
            threshold: 0.05,
        },
        initial,
    )
    .unwrap();
    h.begin_validation().unwrap();
    h
}

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

proptest! {
    #[test]
    fn prop_confidence_always_in_unit_interval(
        initial in 0.0f64..=1.0,
        ops in proptest::collection::vec(op_strategy(), 0..40),
    ) {
        let mut h = fresh_hypothesis(initial);
        for op in ops {
            match op {
                Op::AddEvidence { quality, supports } => {
                    h.add_evidence(Evidence::new("sample", quality, supports));
                }
                Op::SurvivedAttempt => {
                    if h.status() == HypothesisStatus::Validating {
                        h.record_attempt(survived_attempt()).unwrap();
                    }
                }
                Op::DisprovenAttempt => {
                    if h.status() == HypothesisStatus::Validating {
                        h.record_attempt(disproving_attempt()).unwrap();
                    }
                }
            }
            prop_assert!((0.0..=1.0).contains(&h.current_confidence()));
        }
    }

    #[test]
    fn prop_disproven_forces_zero_confidence(
        initial in 0.0f64..=1.0,
        supporting in 0usize..10,
    ) {
        let mut h = fresh_hypothesis(initial);
        for _ in 0..supporting {
            h.add_evidence(Evidence::new("support", EvidenceQuality::Direct, true));
        }
        h.record_attempt(disproving_attempt()).unwrap();
        prop_assert_eq!(h.current_confidence(), 0.0);
        prop_assert_eq!(h.status(), HypothesisStatus::Disproven);

        // Further evidence never resurrects a disproven hypothesis.
        h.add_evidence(Evidence::new("more support", EvidenceQuality::Direct, true));
        prop_assert_eq!(h.current_confidence(), 0.0);
    }

    #[test]
    fn prop_initial_confidence_never_changes(
        initial in 0.0f64..=1.0,
        survived in 0usize..8,
    ) {
        let mut h = fresh_hypothesis(initial);
        for _ in 0..survived {
            h.record_attempt(survived_attempt()).unwrap();
        }
        prop_assert_eq!(h.initial_confidence(), initial);
    }

    #[test]
    fn prop_transition_validity_matches_allowed_set(
        from in prop_oneof![
            Just(HypothesisStatus::Proposed),
            Just(HypothesisStatus::Validating),
            Just(HypothesisStatus::Validated),
            Just(HypothesisStatus::Disproven),
            Just(HypothesisStatus::Inconclusive),
        ],
        to in prop_oneof![
            Just(HypothesisStatus::Proposed),
            Just(HypothesisStatus::Validating),
            Just(HypothesisStatus::Validated),
            Just(HypothesisStatus::Disproven),
            Just(HypothesisStatus::Inconclusive),
        ],
    ) {
        let res = validate_transition(from, to);
        let allowed = allowed_transitions(from);
        if res.is_ok() {
            prop_assert!(allowed.contains(&to));
        } else {
            prop_assert!(!allowed.contains(&to));
        }
    }
}
