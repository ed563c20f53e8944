//! # guardian-core
//!
//! The Stage Progression Engine for HomeOwner Guardian - THE RULES.
//!
//! Given the requirements gating a construction stage (inspections,
//! certificates, checklist items, insurance evidence) and whether each has
//! been met, the engine decides whether the project may advance, separating
//! hard compliance gates from items a homeowner may choose to override.
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: NO async, NO network, NO storage
//! - Read-only: requirement snapshots are borrowed, never mutated
//! - Integer arithmetic only
//! - The category → hard-blocking policy is injected, never global
//!
//! ## Example
//!
//! ```
//! use guardian_core::{BlockingPolicy, RequirementCategory, RequirementId, StageGateEvaluator};
//!
//! let policy = BlockingPolicy::standard();
//! let evaluator = StageGateEvaluator::new(policy);
//!
//! let requirements = vec![
//!     policy.requirement(RequirementId(1), RequirementCategory::Certification, "Slab certificate"),
//!     policy.requirement(RequirementId(2), RequirementCategory::Checklist, "Site photos"),
//! ];
//!
//! assert!(!evaluator.can_proceed_to_next_stage(&requirements));
//! assert_eq!(evaluator.overridable_items(&requirements).len(), 1);
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod policy;
pub mod primitives;
pub mod snapshot;
pub mod system;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{GuardianError, RequirementCategory, RequirementId, StageRequirement};

// =============================================================================
// RE-EXPORTS: Policy & Snapshots
// =============================================================================

pub use policy::BlockingPolicy;
pub use snapshot::{RequirementRecord, StageSnapshot, validate_records};

// =============================================================================
// RE-EXPORTS: System (from system module)
// =============================================================================

pub use system::{
    CategoryCount, CategoryProgress, ConstructionStage, GateReport, StageGateEvaluator,
    StageProgress, StageState,
};
