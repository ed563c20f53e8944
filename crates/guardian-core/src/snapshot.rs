//! # Stage Snapshots
//!
//! The wire shape of a stage's requirement rows as read from storage, and the
//! boundary checks applied before they reach the evaluator.
//!
//! ## Validation
//!
//! `StageSnapshot::into_requirements` rejects:
//! - more than `MAX_REQUIREMENTS` records
//! - empty or oversized descriptions
//! - duplicate ids
//! - `satisfied_at` on an unsatisfied record
//! - an explicit hard-blocking flag that disagrees with the policy
//!
//! Records without a hard-blocking flag take it from the policy.

use crate::policy::BlockingPolicy;
use crate::primitives::{MAX_DESCRIPTION_LENGTH, MAX_REQUIREMENTS};
use crate::system::ConstructionStage;
use crate::types::{GuardianError, RequirementCategory, RequirementId, StageRequirement};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One requirement row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementRecord {
    pub id: RequirementId,
    pub category: RequirementCategory,
    pub description: String,
    #[serde(default)]
    pub is_satisfied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hard_blocking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfied_at: Option<DateTime<Utc>>,
}

impl From<&StageRequirement> for RequirementRecord {
    fn from(r: &StageRequirement) -> Self {
        Self {
            id: r.id,
            category: r.category,
            description: r.description.clone(),
            is_satisfied: r.is_satisfied,
            is_hard_blocking: Some(r.is_hard_blocking),
            satisfied_at: r.satisfied_at,
        }
    }
}

/// The requirement set for one project stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSnapshot {
    pub stage: ConstructionStage,
    #[serde(default)]
    pub requirements: Vec<RequirementRecord>,
}

impl StageSnapshot {
    /// Validate every record and convert it into a [`StageRequirement`].
    pub fn into_requirements(
        self,
        policy: &BlockingPolicy,
    ) -> Result<Vec<StageRequirement>, GuardianError> {
        validate_records(&self.requirements, policy)?;

        Ok(self
            .requirements
            .into_iter()
            .map(|record| {
                let is_hard_blocking = policy.is_hard_blocking(record.category);
                StageRequirement {
                    id: record.id,
                    category: record.category,
                    description: record.description,
                    is_satisfied: record.is_satisfied,
                    is_hard_blocking,
                    satisfied_at: record.satisfied_at,
                }
            })
            .collect())
    }
}

/// Check a batch of records against the limits and the policy.
pub fn validate_records(
    records: &[RequirementRecord],
    policy: &BlockingPolicy,
) -> Result<(), GuardianError> {
    if records.len() > MAX_REQUIREMENTS {
        return Err(GuardianError::InvalidRequirement(format!(
            "Requirement count {} exceeds maximum {}",
            records.len(),
            MAX_REQUIREMENTS
        )));
    }

    let mut seen = BTreeSet::new();
    for record in records {
        if record.description.trim().is_empty() {
            return Err(GuardianError::InvalidRequirement(format!(
                "Requirement {} has an empty description",
                record.id
            )));
        }
        if record.description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(GuardianError::InvalidRequirement(format!(
                "Requirement {} description length {} exceeds maximum {} bytes",
                record.id,
                record.description.len(),
                MAX_DESCRIPTION_LENGTH
            )));
        }
        if !seen.insert(record.id) {
            return Err(GuardianError::DuplicateRequirement(record.id));
        }
        if !record.is_satisfied && record.satisfied_at.is_some() {
            return Err(GuardianError::InconsistentSatisfaction(record.id));
        }
        if let Some(flag) = record.is_hard_blocking {
            if flag != policy.is_hard_blocking(record.category) {
                return Err(GuardianError::PolicyMismatch {
                    id: record.id,
                    category: record.category,
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
