//! # Stage Gate Evaluation
//!
//! Classifies and aggregates a stage's requirement snapshot.
//!
//! ## Gate Rule
//!
//! A project may leave a stage iff no **hard-blocking** requirement is unmet.
//! Unmet **overridable** requirements never block the gate on their own; they
//! are left to a human decision-maker. An override never bypasses a hard
//! blocker, so `can_override_to_next_stage` can only be true when
//! `can_proceed_to_next_stage` already is.
//!
//! ## Derived State
//!
//! | State | Condition |
//! |-------|-----------|
//! | Locked | at least one hard blocker unmet |
//! | Satisfied | no hard blocker unmet, rounded completion is 100% |
//! | Overridden | only soft blockers unmet, caller recorded an override |
//! | InProgress | only soft blockers unmet, no override recorded |
//!
//! Every operation is pure: inputs are borrowed, outputs are new values.

use crate::policy::BlockingPolicy;
use crate::primitives::rounded_percent;
use crate::system::ConstructionStage;
use crate::types::{GuardianError, RequirementCategory, RequirementId, StageRequirement};
use serde::{Deserialize, Serialize};

// =============================================================================
// DERIVED SUMMARIES
// =============================================================================

/// Completion summary for one stage's requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProgress {
    pub total_count: usize,
    pub satisfied_count: usize,
    /// 0–100, rounded half up. 100 for an empty stage.
    pub percent_complete: u8,
    /// Every unmet requirement, in input order.
    pub blocking_items: Vec<StageRequirement>,
    /// Unmet requirements that cannot be overridden.
    pub hard_blocking_items: Vec<StageRequirement>,
    /// Unmet requirements an authorized override may bypass.
    pub overridable_items: Vec<StageRequirement>,
}

impl StageProgress {
    /// True when nothing is left unmet.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.blocking_items.is_empty()
    }
}

/// Number of requirements in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: RequirementCategory,
    pub count: usize,
}

/// Completion of one category within a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProgress {
    pub category: RequirementCategory,
    pub total: usize,
    pub satisfied: usize,
    pub percent: u8,
}

/// Display state of a stage, derived once per evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    /// Hard-blocking requirements are unmet.
    Locked,
    /// Only overridable requirements are unmet.
    InProgress,
    /// No hard blocker is unmet and the rounded completion reaches 100%.
    Satisfied,
    /// Only overridable requirements are unmet and the caller recorded an override.
    Overridden,
}

impl StageState {
    /// Whether the project may leave the stage in this state.
    #[must_use]
    pub fn permits_advance(&self) -> bool {
        !matches!(self, StageState::Locked)
    }
}

impl std::fmt::Display for StageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StageState::Locked => "locked",
            StageState::InProgress => "in progress",
            StageState::Satisfied => "satisfied",
            StageState::Overridden => "overridden",
        };
        f.write_str(s)
    }
}

/// Everything a stage view needs, computed in one pass over the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateReport {
    pub stage: ConstructionStage,
    pub next_stage: Option<ConstructionStage>,
    pub state: StageState,
    pub can_proceed: bool,
    pub can_override: bool,
    pub progress: StageProgress,
    pub categories: Vec<CategoryProgress>,
}

// =============================================================================
// STAGE GATE EVALUATOR
// =============================================================================

/// Stage Gate Evaluator - pure classification over a requirement snapshot.
#[derive(Debug, Clone, Default)]
pub struct StageGateEvaluator {
    policy: BlockingPolicy,
}

impl StageGateEvaluator {
    /// Create an evaluator bound to a blocking policy.
    #[must_use]
    pub fn new(policy: BlockingPolicy) -> Self {
        Self { policy }
    }

    /// The policy new requirements are created with.
    #[must_use]
    pub fn policy(&self) -> &BlockingPolicy {
        &self.policy
    }

    /// Unmet requirements, in input order.
    #[must_use]
    pub fn blocking_items(&self, requirements: &[StageRequirement]) -> Vec<StageRequirement> {
        requirements
            .iter()
            .filter(|r| !r.is_satisfied)
            .cloned()
            .collect()
    }

    /// Unmet requirements that no override can bypass.
    #[must_use]
    pub fn hard_blocking_items(&self, requirements: &[StageRequirement]) -> Vec<StageRequirement> {
        requirements
            .iter()
            .filter(|r| r.is_hard_blocker())
            .cloned()
            .collect()
    }

    /// Unmet requirements an authorized override may bypass.
    #[must_use]
    pub fn overridable_items(&self, requirements: &[StageRequirement]) -> Vec<StageRequirement> {
        requirements
            .iter()
            .filter(|r| r.is_overridable_blocker())
            .cloned()
            .collect()
    }

    /// Compute counts, percentage and the blocking breakdown.
    #[must_use]
    pub fn calculate_stage_progress(&self, requirements: &[StageRequirement]) -> StageProgress {
        let total_count = requirements.len();
        let satisfied_count = requirements.iter().filter(|r| r.is_satisfied).count();

        StageProgress {
            total_count,
            satisfied_count,
            percent_complete: rounded_percent(satisfied_count, total_count),
            blocking_items: self.blocking_items(requirements),
            hard_blocking_items: self.hard_blocking_items(requirements),
            overridable_items: self.overridable_items(requirements),
        }
    }

    /// True iff no hard-blocking requirement is unmet.
    #[must_use]
    pub fn can_proceed_to_next_stage(&self, requirements: &[StageRequirement]) -> bool {
        !requirements.iter().any(StageRequirement::is_hard_blocker)
    }

    /// True iff the gate is open, or an authorized override covers what remains.
    ///
    /// Hard blockers are never covered by an override.
    #[must_use]
    pub fn can_override_to_next_stage(
        &self,
        requirements: &[StageRequirement],
        override_authorized: bool,
    ) -> bool {
        let no_hard_blockers = !requirements.iter().any(StageRequirement::is_hard_blocker);
        self.can_proceed_to_next_stage(requirements) || (override_authorized && no_hard_blockers)
    }

    /// Requirement counts per category, in first-seen order.
    #[must_use]
    pub fn count_requirements_by_category(
        &self,
        requirements: &[StageRequirement],
    ) -> Vec<CategoryCount> {
        let mut counts: Vec<CategoryCount> = Vec::new();
        for requirement in requirements {
            match counts.iter_mut().find(|c| c.category == requirement.category) {
                Some(entry) => entry.count = entry.count.saturating_add(1),
                None => counts.push(CategoryCount {
                    category: requirement.category,
                    count: 1,
                }),
            }
        }
        counts
    }

    /// Completion per category, in first-seen order.
    #[must_use]
    pub fn category_progress(&self, requirements: &[StageRequirement]) -> Vec<CategoryProgress> {
        let mut groups: Vec<(RequirementCategory, usize, usize)> = Vec::new();
        for requirement in requirements {
            let satisfied = usize::from(requirement.is_satisfied);
            match groups.iter_mut().find(|g| g.0 == requirement.category) {
                Some(group) => {
                    group.1 = group.1.saturating_add(1);
                    group.2 = group.2.saturating_add(satisfied);
                }
                None => groups.push((requirement.category, 1, satisfied)),
            }
        }

        groups
            .into_iter()
            .map(|(category, total, satisfied)| CategoryProgress {
                category,
                total,
                satisfied,
                percent: rounded_percent(satisfied, total),
            })
            .collect()
    }

    /// Derive the display state of a stage.
    ///
    /// `override_recorded` is the caller's record that someone chose to bypass
    /// the soft items. It has no effect while a hard blocker is unmet.
    ///
    /// `Satisfied` follows the rounded percentage, so 199 of 200 met items
    /// already count as satisfied when the open item is overridable.
    #[must_use]
    pub fn stage_state(
        &self,
        requirements: &[StageRequirement],
        override_recorded: bool,
    ) -> StageState {
        if !self.can_proceed_to_next_stage(requirements) {
            StageState::Locked
        } else if self.calculate_stage_progress(requirements).percent_complete == 100 {
            StageState::Satisfied
        } else if override_recorded {
            StageState::Overridden
        } else {
            StageState::InProgress
        }
    }

    /// Evaluate a stage in one call.
    #[must_use]
    pub fn evaluate(
        &self,
        stage: ConstructionStage,
        requirements: &[StageRequirement],
        override_recorded: bool,
        override_authorized: bool,
    ) -> GateReport {
        GateReport {
            stage,
            next_stage: stage.next(),
            state: self.stage_state(requirements, override_recorded),
            can_proceed: self.can_proceed_to_next_stage(requirements),
            can_override: self.can_override_to_next_stage(requirements, override_authorized),
            progress: self.calculate_stage_progress(requirements),
            categories: self.category_progress(requirements),
        }
    }

    /// Move a project from `stage` to the next one.
    ///
    /// Fails with [`GuardianError::TerminalStage`] at practical completion and
    /// with [`GuardianError::StageBlocked`] while hard blockers are unmet.
    pub fn advance(
        &self,
        stage: ConstructionStage,
        requirements: &[StageRequirement],
        override_authorized: bool,
    ) -> Result<ConstructionStage, GuardianError> {
        let next = stage.next().ok_or(GuardianError::TerminalStage(stage))?;

        if self.can_override_to_next_stage(requirements, override_authorized) {
            Ok(next)
        } else {
            let blockers: Vec<RequirementId> = requirements
                .iter()
                .filter(|r| r.is_hard_blocker())
                .map(|r| r.id)
                .collect();
            Err(GuardianError::StageBlocked { stage, blockers })
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn req(id: u64, category: RequirementCategory, satisfied: bool) -> StageRequirement {
        let policy = BlockingPolicy::standard();
        let mut r = policy.requirement(RequirementId(id), category, format!("item {id}"));
        r.is_satisfied = satisfied;
        r
    }

    fn ids(items: &[StageRequirement]) -> Vec<u64> {
        items.iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn blocking_preserves_input_order() {
        let evaluator = StageGateEvaluator::default();
        let reqs = vec![
            req(3, RequirementCategory::Checklist, false),
            req(1, RequirementCategory::Inspection, true),
            req(2, RequirementCategory::Permit, false),
        ];
        assert_eq!(ids(&evaluator.blocking_items(&reqs)), vec![3, 2]);
        assert_eq!(ids(&evaluator.hard_blocking_items(&reqs)), vec![2]);
        assert_eq!(ids(&evaluator.overridable_items(&reqs)), vec![3]);
    }

    #[test]
    fn soft_items_do_not_block() {
        let evaluator = StageGateEvaluator::default();
        let reqs = vec![
            req(1, RequirementCategory::Checklist, false),
            req(2, RequirementCategory::Document, false),
        ];
        assert!(evaluator.can_proceed_to_next_stage(&reqs));
        assert_eq!(evaluator.stage_state(&reqs, false), StageState::InProgress);
        assert_eq!(evaluator.stage_state(&reqs, true), StageState::Overridden);
    }

    #[test]
    fn override_never_unlocks_hard_blocker() {
        let evaluator = StageGateEvaluator::default();
        let reqs = vec![req(1, RequirementCategory::Insurance, false)];
        assert!(!evaluator.can_override_to_next_stage(&reqs, true));
        assert!(!evaluator.can_override_to_next_stage(&reqs, false));
        assert_eq!(evaluator.stage_state(&reqs, true), StageState::Locked);
    }

    #[test]
    fn satisfied_when_everything_met() {
        let evaluator = StageGateEvaluator::default();
        let reqs = vec![
            req(1, RequirementCategory::Inspection, true),
            req(2, RequirementCategory::Checklist, true),
        ];
        assert_eq!(evaluator.stage_state(&reqs, false), StageState::Satisfied);
        assert_eq!(evaluator.stage_state(&reqs, true), StageState::Satisfied);
        assert!(evaluator.calculate_stage_progress(&reqs).is_complete());
    }

    #[test]
    fn state_satisfied_when_rounding_reaches_100() {
        let evaluator = StageGateEvaluator::default();
        let mut reqs: Vec<_> = (0..199)
            .map(|i| req(i, RequirementCategory::Checklist, true))
            .collect();
        reqs.push(req(199, RequirementCategory::Checklist, false));

        let progress = evaluator.calculate_stage_progress(&reqs);
        assert_eq!(progress.percent_complete, 100);
        assert!(!progress.is_complete());
        assert_eq!(evaluator.stage_state(&reqs, false), StageState::Satisfied);
        assert_eq!(evaluator.stage_state(&reqs, true), StageState::Satisfied);
    }

    #[test]
    fn rounded_100_with_open_hard_item_stays_locked() {
        let evaluator = StageGateEvaluator::default();
        let mut reqs: Vec<_> = (0..199)
            .map(|i| req(i, RequirementCategory::Checklist, true))
            .collect();
        reqs.push(req(199, RequirementCategory::Inspection, false));

        assert_eq!(evaluator.calculate_stage_progress(&reqs).percent_complete, 100);
        assert_eq!(evaluator.stage_state(&reqs, true), StageState::Locked);
    }

    #[test]
    fn category_progress_first_seen_order() {
        let evaluator = StageGateEvaluator::default();
        let reqs = vec![
            req(1, RequirementCategory::Checklist, true),
            req(2, RequirementCategory::Inspection, false),
            req(3, RequirementCategory::Checklist, false),
        ];
        let progress = evaluator.category_progress(&reqs);
        assert_eq!(
            progress,
            vec![
                CategoryProgress {
                    category: RequirementCategory::Checklist,
                    total: 2,
                    satisfied: 1,
                    percent: 50,
                },
                CategoryProgress {
                    category: RequirementCategory::Inspection,
                    total: 1,
                    satisfied: 0,
                    percent: 0,
                },
            ]
        );
    }

    #[test]
    fn advance_moves_to_next_stage() {
        let evaluator = StageGateEvaluator::default();
        let reqs = vec![req(1, RequirementCategory::Checklist, false)];
        let next = evaluator
            .advance(ConstructionStage::Frame, &reqs, false)
            .expect("advance");
        assert_eq!(next, ConstructionStage::Lockup);
    }

    #[test]
    fn advance_blocked_lists_hard_ids() {
        let evaluator = StageGateEvaluator::default();
        let reqs = vec![
            req(1, RequirementCategory::Inspection, false),
            req(2, RequirementCategory::Checklist, false),
            req(3, RequirementCategory::Certification, false),
        ];
        let err = evaluator
            .advance(ConstructionStage::Base, &reqs, true)
            .expect_err("blocked");
        assert!(matches!(
            &err,
            GuardianError::StageBlocked { stage: ConstructionStage::Base, blockers }
                if *blockers == vec![RequirementId(1), RequirementId(3)]
        ));
    }

    #[test]
    fn advance_from_terminal_fails() {
        let evaluator = StageGateEvaluator::default();
        let result = evaluator.advance(ConstructionStage::PracticalCompletion, &[], false);
        assert!(matches!(
            result,
            Err(GuardianError::TerminalStage(ConstructionStage::PracticalCompletion))
        ));
    }

    #[test]
    fn evaluate_bundles_everything() {
        let evaluator = StageGateEvaluator::default();
        let reqs = vec![
            req(1, RequirementCategory::Certification, true),
            req(2, RequirementCategory::Checklist, false),
        ];
        let report = evaluator.evaluate(ConstructionStage::Fixing, &reqs, false, true);
        assert_eq!(report.next_stage, Some(ConstructionStage::PracticalCompletion));
        assert_eq!(report.state, StageState::InProgress);
        assert!(report.can_proceed);
        assert!(report.can_override);
        assert_eq!(report.progress.percent_complete, 50);
        assert_eq!(report.categories.len(), 2);
    }

    #[test]
    fn state_display_and_advance_permission() {
        assert_eq!(StageState::InProgress.to_string(), "in progress");
        assert!(!StageState::Locked.permits_advance());
        assert!(StageState::Overridden.permits_advance());
    }
}
