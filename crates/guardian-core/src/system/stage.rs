//! # Construction Stages
//!
//! The ordered phases an Australian residential build walks through. Each
//! stage has its own requirement set; the gate evaluator decides whether the
//! project may leave a stage for the next one.
//!
//! | Stage | Name | Typical gate |
//! |-------|------|--------------|
//! | PreConstruction | Pre-construction | Permit, insurance |
//! | Base | Base (slab) | Footing and slab inspections |
//! | Frame | Frame | Frame inspection, truss certificate |
//! | Lockup | Lockup | Roof, windows, external doors |
//! | Fixing | Fixing | Waterproofing certificate |
//! | PracticalCompletion | Practical completion | Final inspection, occupancy |

use serde::{Deserialize, Serialize};

// =============================================================================
// STAGE ENUM
// =============================================================================

/// Construction stages in build order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionStage {
    /// Contract signed, permits and insurance being arranged.
    PreConstruction,
    /// Site works, footings and slab.
    Base,
    /// Wall and roof framing.
    Frame,
    /// Building enclosed: roof, external cladding, windows, doors.
    Lockup,
    /// Internal linings, cabinetry, wet areas.
    Fixing,
    /// Works finished and ready for handover.
    PracticalCompletion,
}

impl ConstructionStage {
    /// Every stage, in build order.
    pub const ALL: [ConstructionStage; 6] = [
        ConstructionStage::PreConstruction,
        ConstructionStage::Base,
        ConstructionStage::Frame,
        ConstructionStage::Lockup,
        ConstructionStage::Fixing,
        ConstructionStage::PracticalCompletion,
    ];

    /// Get the stage name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ConstructionStage::PreConstruction => "Pre-construction",
            ConstructionStage::Base => "Base (slab)",
            ConstructionStage::Frame => "Frame",
            ConstructionStage::Lockup => "Lockup",
            ConstructionStage::Fixing => "Fixing",
            ConstructionStage::PracticalCompletion => "Practical completion",
        }
    }

    /// Get the next stage, if any.
    #[must_use]
    pub fn next(&self) -> Option<ConstructionStage> {
        match self {
            ConstructionStage::PreConstruction => Some(ConstructionStage::Base),
            ConstructionStage::Base => Some(ConstructionStage::Frame),
            ConstructionStage::Frame => Some(ConstructionStage::Lockup),
            ConstructionStage::Lockup => Some(ConstructionStage::Fixing),
            ConstructionStage::Fixing => Some(ConstructionStage::PracticalCompletion),
            ConstructionStage::PracticalCompletion => None,
        }
    }

    /// Get the previous stage, if any.
    #[must_use]
    pub fn previous(&self) -> Option<ConstructionStage> {
        match self {
            ConstructionStage::PreConstruction => None,
            ConstructionStage::Base => Some(ConstructionStage::PreConstruction),
            ConstructionStage::Frame => Some(ConstructionStage::Base),
            ConstructionStage::Lockup => Some(ConstructionStage::Frame),
            ConstructionStage::Fixing => Some(ConstructionStage::Lockup),
            ConstructionStage::PracticalCompletion => Some(ConstructionStage::Fixing),
        }
    }

    /// Check if this stage is terminal (practical completion).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConstructionStage::PracticalCompletion)
    }
}

impl std::fmt::Display for ConstructionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TESTS
// =============================================================================
