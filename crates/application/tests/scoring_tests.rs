//! Scoring engine integration tests.

use caseflow_application::scoring::{GrandTotal, ScoringConfig, ScoringEngine};
use caseflow_domain::assessment::{AdminAssessment, UserAssessment};
use caseflow_domain::case::{Case, CaseKind, CaseStatus};
use caseflow_domain::identifiers::{CaseId, EmployeeId};
use chrono::Utc;
use proptest::prelude::*;

fn blank_case() -> Case {
    let now = Utc::now();
    Case {
        id: CaseId::new(),
        kind: CaseKind::Internal,
        title: "Replace office switch".to_string(),
        description: "Switch in room 204 keeps dropping links".to_string(),
        requester: EmployeeId::new(),
        handler: EmployeeId::new(),
        counterparty: None,
        status: CaseStatus::Received,
        start_date: now,
        in_progress_at: None,
        end_date: None,
        notes: None,
        crm_reference_code: None,
        user_assessment: UserAssessment::default(),
        admin_assessment: AdminAssessment::default(),
        revision: 0,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn fresh_case_scores_zero_and_is_not_fully_assessed() {
    let report = ScoringEngine::default().score(&blank_case());

    assert_eq!(report.user_total, 0);
    assert_eq!(report.admin_total, 0);
    assert_eq!(report.grand_total, GrandTotal::from_hundredths(0));
    assert_eq!(report.grand_total.to_string(), "0.00");
    assert!(!report.fully_assessed);
}

#[test]
fn user_block_alone_is_weighted_at_forty_percent() {
    let mut case = blank_case();
    case.user_assessment = UserAssessment {
        difficulty: Some(3),
        estimated_time: Some(2),
        impact: Some(4),
        urgency: Some(5),
        form_score: Some(1),
        assessed_at: None,
    };

    let report = ScoringEngine::default().score(&case);

    assert_eq!(report.user_total, 15);
    assert_eq!(report.admin_total, 0);
    // 15 * 0.40 = 6.00 exactly, no float drift
    assert_eq!(report.grand_total, GrandTotal::from_hundredths(600));
    assert_eq!(report.grand_total.to_string(), "6.00");
    assert!(!report.fully_assessed);
}

#[test]
fn both_blocks_combine_with_forty_sixty_weighting() {
    let mut case = blank_case();
    case.user_assessment = UserAssessment {
        difficulty: Some(3),
        estimated_time: Some(2),
        impact: Some(4),
        urgency: Some(5),
        form_score: Some(1),
        assessed_at: None,
    };
    case.admin_assessment = AdminAssessment {
        difficulty: Some(4),
        estimated_time: Some(3),
        impact: Some(4),
        urgency: Some(4),
        assessed_at: None,
    };

    let report = ScoringEngine::default().score(&case);

    assert_eq!(report.user_total, 15);
    assert_eq!(report.admin_total, 15);
    // 15 * 0.40 + 15 * 0.60 = 15.00
    assert_eq!(report.grand_total, GrandTotal::from_hundredths(1500));
    assert_eq!(report.grand_total.to_string(), "15.00");
    assert!(report.fully_assessed);
}

#[test]
fn partial_admin_block_counts_toward_total_but_not_completeness() {
    let mut case = blank_case();
    case.admin_assessment = AdminAssessment {
        difficulty: Some(5),
        urgency: Some(2),
        ..Default::default()
    };

    let report = ScoringEngine::default().score(&case);

    assert_eq!(report.admin_total, 7);
    assert_eq!(report.grand_total, GrandTotal::from_hundredths(420));
    assert_eq!(report.grand_total.to_string(), "4.20");
    assert!(!report.fully_assessed);
}

#[test]
fn completeness_ignores_score_magnitude() {
    let mut case = blank_case();
    case.admin_assessment = AdminAssessment {
        difficulty: Some(1),
        estimated_time: Some(1),
        impact: Some(1),
        urgency: Some(1),
        assessed_at: None,
    };

    let report = ScoringEngine::default().score(&case);

    assert_eq!(report.admin_total, 4);
    assert!(report.fully_assessed);
}

#[test]
fn custom_weights_apply() {
    let engine = ScoringEngine::new(ScoringConfig {
        user_weight: 50,
        admin_weight: 50,
    });

    let mut case = blank_case();
    case.user_assessment.difficulty = Some(4);
    case.admin_assessment.urgency = Some(2);

    let report = engine.score(&case);

    // 4 * 0.50 + 2 * 0.50 = 3.00
    assert_eq!(report.grand_total, GrandTotal::from_hundredths(300));
}

#[test]
fn scoring_is_deterministic_across_reads() {
    let mut case = blank_case();
    case.user_assessment.impact = Some(3);
    case.admin_assessment.difficulty = Some(5);

    let engine = ScoringEngine::default();
    let first = engine.score(&case);
    for _ in 0..10 {
        assert_eq!(engine.score(&case), first);
    }
}

fn sub_score() -> impl Strategy<Value = Option<u8>> {
    proptest::option::of(1u8..=5)
}

prop_compose! {
    fn arb_assessed_case()(
        u_difficulty in sub_score(),
        u_estimated_time in sub_score(),
        u_impact in sub_score(),
        u_urgency in sub_score(),
        u_form_score in proptest::option::of(1u8..=2),
        a_difficulty in sub_score(),
        a_estimated_time in sub_score(),
        a_impact in sub_score(),
        a_urgency in sub_score(),
    ) -> Case {
        let mut case = blank_case();
        case.user_assessment = UserAssessment {
            difficulty: u_difficulty,
            estimated_time: u_estimated_time,
            impact: u_impact,
            urgency: u_urgency,
            form_score: u_form_score,
            assessed_at: None,
        };
        case.admin_assessment = AdminAssessment {
            difficulty: a_difficulty,
            estimated_time: a_estimated_time,
            impact: a_impact,
            urgency: a_urgency,
            assessed_at: None,
        };
        case
    }
}

proptest! {
    /// The grand total is exactly `user_total * 40 + admin_total * 60`
    /// hundredths for any combination of present and absent sub-scores.
    #[test]
    fn prop_grand_total_is_exact_weighted_sum(case in arb_assessed_case()) {
        let report = ScoringEngine::default().score(&case);

        let expected = report.user_total as i64 * 40 + report.admin_total as i64 * 60;
        prop_assert_eq!(report.grand_total, GrandTotal::from_hundredths(expected));

        // Completeness tracks presence of the four admin sub-scores only.
        let complete = case.admin_assessment.difficulty.is_some()
            && case.admin_assessment.estimated_time.is_some()
            && case.admin_assessment.impact.is_some()
            && case.admin_assessment.urgency.is_some();
        prop_assert_eq!(report.fully_assessed, complete);
    }

    /// Scoring a case twice yields the same report. The engine holds no
    /// mutable state, so recomputation can never drift.
    #[test]
    fn prop_scoring_is_pure(case in arb_assessed_case()) {
        let engine = ScoringEngine::default();
        prop_assert_eq!(engine.score(&case), engine.score(&case));
    }
}
