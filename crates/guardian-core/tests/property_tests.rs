//! # Property-Based Tests
//!
//! Invariants of the stage gate checked over arbitrary requirement snapshots.

use guardian_core::{
    ConstructionStage, RequirementCategory, RequirementId, StageGateEvaluator, StageRequirement,
    StageState,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// STRATEGIES
// =============================================================================

fn category() -> impl Strategy<Value = RequirementCategory> {
    prop::sample::select(RequirementCategory::ALL.to_vec())
}

fn requirements() -> impl Strategy<Value = Vec<StageRequirement>> {
    vec((category(), any::<bool>(), any::<bool>()), 0..60).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (category, is_satisfied, is_hard_blocking))| StageRequirement {
                id: RequirementId(i as u64),
                category,
                description: format!("requirement {i}"),
                is_satisfied,
                is_hard_blocking,
                satisfied_at: None,
            })
            .collect()
    })
}

fn id_set(items: &[StageRequirement]) -> BTreeSet<RequirementId> {
    items.iter().map(|r| r.id).collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Blocking items split exactly into hard and overridable, no overlap.
    #[test]
    fn blocking_is_partitioned(reqs in requirements()) {
        let evaluator = StageGateEvaluator::default();
        let blocking = id_set(&evaluator.blocking_items(&reqs));
        let hard = id_set(&evaluator.hard_blocking_items(&reqs));
        let soft = id_set(&evaluator.overridable_items(&reqs));

        prop_assert!(hard.is_disjoint(&soft));
        let union: BTreeSet<_> = hard.union(&soft).copied().collect();
        prop_assert_eq!(union, blocking);
    }

    /// Unmet plus met accounts for every requirement.
    #[test]
    fn counts_add_up(reqs in requirements()) {
        let evaluator = StageGateEvaluator::default();
        let progress = evaluator.calculate_stage_progress(&reqs);

        prop_assert_eq!(progress.total_count, reqs.len());
        prop_assert_eq!(progress.blocking_items.len() + progress.satisfied_count, reqs.len());
        prop_assert!(progress.percent_complete <= 100);
    }

    /// The gate depends only on hard blockers.
    #[test]
    fn gate_ignores_soft_items(reqs in requirements()) {
        let evaluator = StageGateEvaluator::default();
        let open = evaluator.can_proceed_to_next_stage(&reqs);
        prop_assert_eq!(open, evaluator.hard_blocking_items(&reqs).is_empty());

        // Override can never open a gate that is closed.
        for authorized in [false, true] {
            prop_assert_eq!(evaluator.can_override_to_next_stage(&reqs, authorized), open);
        }
    }

    /// Locked iff hard blockers remain, regardless of the override record.
    #[test]
    fn locked_matches_gate(reqs in requirements(), recorded in any::<bool>()) {
        let evaluator = StageGateEvaluator::default();
        let state = evaluator.stage_state(&reqs, recorded);
        prop_assert_eq!(
            state == StageState::Locked,
            !evaluator.can_proceed_to_next_stage(&reqs)
        );
    }

    /// Satisfied iff the gate is open and the rounded percentage is 100.
    #[test]
    fn satisfied_follows_rounded_percent(reqs in requirements(), recorded in any::<bool>()) {
        let evaluator = StageGateEvaluator::default();
        let state = evaluator.stage_state(&reqs, recorded);
        let percent = evaluator.calculate_stage_progress(&reqs).percent_complete;
        prop_assert_eq!(
            state == StageState::Satisfied,
            evaluator.can_proceed_to_next_stage(&reqs) && percent == 100
        );
    }

    /// Same input, same output; the input is left untouched.
    #[test]
    fn evaluation_is_pure(
        reqs in requirements(),
        recorded in any::<bool>(),
        authorized in any::<bool>(),
        stage in prop::sample::select(ConstructionStage::ALL.to_vec()),
    ) {
        let evaluator = StageGateEvaluator::default();
        let before = reqs.clone();

        prop_assert_eq!(
            evaluator.calculate_stage_progress(&reqs),
            evaluator.calculate_stage_progress(&reqs)
        );
        prop_assert_eq!(
            evaluator.count_requirements_by_category(&reqs),
            evaluator.count_requirements_by_category(&reqs)
        );
        prop_assert_eq!(
            evaluator.category_progress(&reqs),
            evaluator.category_progress(&reqs)
        );
        prop_assert_eq!(
            evaluator.stage_state(&reqs, recorded),
            evaluator.stage_state(&reqs, recorded)
        );
        prop_assert_eq!(
            evaluator.can_override_to_next_stage(&reqs, authorized),
            evaluator.can_override_to_next_stage(&reqs, authorized)
        );
        prop_assert_eq!(
            evaluator.evaluate(stage, &reqs, recorded, authorized),
            evaluator.evaluate(stage, &reqs, recorded, authorized)
        );
        prop_assert_eq!(&reqs, &before);
    }

    /// Category totals sum to the input length, each category once, first-seen order.
    #[test]
    fn category_counts_first_seen(reqs in requirements()) {
        let evaluator = StageGateEvaluator::default();
        let counts = evaluator.count_requirements_by_category(&reqs);

        prop_assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), reqs.len());

        let mut expected_order = Vec::new();
        for r in &reqs {
            if !expected_order.contains(&r.category) {
                expected_order.push(r.category);
            }
        }
        let order: Vec<_> = counts.iter().map(|c| c.category).collect();
        prop_assert_eq!(order, expected_order);
    }
}
