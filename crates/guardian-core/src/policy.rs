//! # Blocking Policy
//!
//! The category → hard-blocking table handed to the evaluator at construction.
//!
//! The table has one field per [`RequirementCategory`]. Lookups go through an
//! exhaustive `match`, so a new category does not compile until it has a rule.
//!
//! ## Standard Policy
//!
//! | Category | Hard-blocking |
//! |----------|---------------|
//! | inspection | yes |
//! | certification | yes |
//! | checklist | no |
//! | insurance | yes |
//! | permit | yes |
//! | document | no |
//!
//! Deployments may relax or tighten individual rows through `guardian.toml`:
//!
//! ```toml
//! [policy]
//! document = true
//! ```

use crate::types::{RequirementCategory, RequirementId, StageRequirement};
use serde::{Deserialize, Serialize};

/// Category → hard-blocking table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockingPolicy {
    pub inspection: bool,
    pub certification: bool,
    pub checklist: bool,
    pub insurance: bool,
    pub permit: bool,
    pub document: bool,
}

impl Default for BlockingPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl BlockingPolicy {
    /// The standard compliance policy (see module docs).
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            inspection: true,
            certification: true,
            checklist: false,
            insurance: true,
            permit: true,
            document: false,
        }
    }

    /// Whether unmet requirements of `category` can never be overridden.
    #[must_use]
    pub fn is_hard_blocking(&self, category: RequirementCategory) -> bool {
        match category {
            RequirementCategory::Inspection => self.inspection,
            RequirementCategory::Certification => self.certification,
            RequirementCategory::Checklist => self.checklist,
            RequirementCategory::Insurance => self.insurance,
            RequirementCategory::Permit => self.permit,
            RequirementCategory::Document => self.document,
        }
    }

    /// Categories this policy treats as hard-blocking, in declaration order.
    #[must_use]
    pub fn hard_categories(&self) -> Vec<RequirementCategory> {
        RequirementCategory::ALL
            .into_iter()
            .filter(|c| self.is_hard_blocking(*c))
            .collect()
    }

    /// Create an unmet requirement whose hard-blocking flag follows this policy.
    #[must_use]
    pub fn requirement(
        &self,
        id: RequirementId,
        category: RequirementCategory,
        description: impl Into<String>,
    ) -> StageRequirement {
        StageRequirement {
            id,
            category,
            description: description.into(),
            is_satisfied: false,
            is_hard_blocking: self.is_hard_blocking(category),
            satisfied_at: None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
