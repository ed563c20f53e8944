//! # Core Type Definitions
//!
//! This module contains the data types shared by every part of the engine:
//! - Requirement identifiers and categories (`RequirementId`, `RequirementCategory`)
//! - The gating condition itself (`StageRequirement`)
//! - Error types (`GuardianError`)
//!
//! ## Snapshot Semantics
//!
//! A `StageRequirement` is a read-only snapshot of a row owned by the external
//! store. The engine only classifies and aggregates requirements; satisfaction
//! is recorded elsewhere and arrives as a fresh snapshot on the next evaluation.

use crate::system::ConstructionStage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// REQUIREMENT IDENTIFIER
// =============================================================================

/// Unique identifier for a requirement row in the external store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementId(pub u64);

impl std::fmt::Display for RequirementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// REQUIREMENT CATEGORY
// =============================================================================

/// Classification of a gating condition.
///
/// The set is closed. Adding a variant forces `BlockingPolicy` to grow a
/// matching field before the crate compiles again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    /// A building surveyor or council inspection (e.g. footing, frame).
    Inspection,
    /// A trade compliance certificate (e.g. waterproofing, electrical).
    Certification,
    /// A homeowner checklist item.
    Checklist,
    /// Home warranty or contract works insurance evidence.
    Insurance,
    /// A building or planning permit.
    Permit,
    /// Supporting paperwork (plans, variations, receipts).
    Document,
}

impl RequirementCategory {
    /// Every category, in declaration order.
    pub const ALL: [RequirementCategory; 6] = [
        RequirementCategory::Inspection,
        RequirementCategory::Certification,
        RequirementCategory::Checklist,
        RequirementCategory::Insurance,
        RequirementCategory::Permit,
        RequirementCategory::Document,
    ];

    /// Wire name of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementCategory::Inspection => "inspection",
            RequirementCategory::Certification => "certification",
            RequirementCategory::Checklist => "checklist",
            RequirementCategory::Insurance => "insurance",
            RequirementCategory::Permit => "permit",
            RequirementCategory::Document => "document",
        }
    }
}

impl std::fmt::Display for RequirementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// STAGE REQUIREMENT
// =============================================================================

/// One gating condition for advancing past a construction stage.
///
/// Build new requirements through [`crate::BlockingPolicy::requirement`] so the
/// hard-blocking flag always agrees with the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRequirement {
    /// Identifier of the row in the external store.
    pub id: RequirementId,
    /// Classification tag.
    pub category: RequirementCategory,
    /// Human-readable text shown to the homeowner.
    pub description: String,
    /// True once evidence or approval has been recorded.
    pub is_satisfied: bool,
    /// Fixed at creation from the category. Hard items can never be overridden.
    pub is_hard_blocking: bool,
    /// When the requirement was satisfied, if it has been.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfied_at: Option<DateTime<Utc>>,
}

impl StageRequirement {
    /// Return a satisfied copy of this requirement stamped with `at`.
    ///
    /// The receiver is left untouched.
    #[must_use]
    pub fn mark_satisfied(&self, at: DateTime<Utc>) -> Self {
        Self {
            is_satisfied: true,
            satisfied_at: Some(at),
            ..self.clone()
        }
    }

    /// Unmet requirement that no override can bypass.
    #[must_use]
    pub fn is_hard_blocker(&self) -> bool {
        !self.is_satisfied && self.is_hard_blocking
    }

    /// Unmet requirement that an authorized override may bypass.
    #[must_use]
    pub fn is_overridable_blocker(&self) -> bool {
        !self.is_satisfied && !self.is_hard_blocking
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised at the edges of the engine.
///
/// The evaluator itself is infallible. These errors come from snapshot
/// validation, stage advancement and the I/O done by the application.
#[derive(Debug, Error)]
pub enum GuardianError {
    /// A requirement record is malformed.
    #[error("Invalid requirement: {0}")]
    InvalidRequirement(String),

    /// Two records in the same snapshot share an identifier.
    #[error("Duplicate requirement id: {0}")]
    DuplicateRequirement(RequirementId),

    /// A record carries `satisfied_at` without being satisfied.
    #[error("Requirement {0} has a satisfaction time but is not satisfied")]
    InconsistentSatisfaction(RequirementId),

    /// A record's hard-blocking flag disagrees with the active policy.
    #[error("Requirement {id} disagrees with the blocking policy for category '{category}'")]
    PolicyMismatch {
        id: RequirementId,
        category: RequirementCategory,
    },

    /// Hard-blocking requirements are still unmet.
    #[error("Stage {stage} is blocked by {} hard requirement(s)", .blockers.len())]
    StageBlocked {
        stage: ConstructionStage,
        blockers: Vec<RequirementId>,
    },

    /// The project is already at its final stage.
    #[error("Stage {0} is terminal")]
    TerminalStage(ConstructionStage),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
