//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use guardian_core::{
    BlockingPolicy, ConstructionStage, GateReport, RequirementCategory, RequirementId,
    RequirementRecord, StageSnapshot,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// POLICY RESPONSE
// =============================================================================

/// Active blocking policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResponse {
    pub policy: BlockingPolicy,
    pub hard_categories: Vec<RequirementCategory>,
}

impl PolicyResponse {
    pub fn from_policy(policy: &BlockingPolicy) -> Self {
        Self {
            policy: *policy,
            hard_categories: policy.hard_categories(),
        }
    }
}

// =============================================================================
// STAGES RESPONSE
// =============================================================================

/// One construction stage in build order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageInfo {
    pub stage: ConstructionStage,
    pub name: String,
    pub previous: Option<ConstructionStage>,
    pub next: Option<ConstructionStage>,
    /// Practical completion; nothing follows it.
    pub terminal: bool,
}

/// All construction stages in build order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagesResponse {
    pub stages: Vec<StageInfo>,
}

impl Default for StagesResponse {
    fn default() -> Self {
        Self {
            stages: ConstructionStage::ALL
                .iter()
                .map(|s| StageInfo {
                    stage: *s,
                    name: s.name().to_string(),
                    previous: s.previous(),
                    next: s.next(),
                    terminal: s.is_terminal(),
                })
                .collect(),
        }
    }
}

// =============================================================================
// EVALUATE REQUEST/RESPONSE
// =============================================================================

/// Stage evaluation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub stage: ConstructionStage,
    #[serde(default)]
    pub requirements: Vec<RequirementRecord>,
    /// The caller has already recorded an override for this stage.
    #[serde(default)]
    pub override_recorded: bool,
    /// The caller is authorized to override soft requirements.
    #[serde(default)]
    pub override_authorized: bool,
}

impl EvaluateRequest {
    /// The requirement snapshot carried by this request.
    pub fn to_snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            stage: self.stage,
            requirements: self.requirements.clone(),
        }
    }
}

/// Stage evaluation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub success: bool,
    pub report: Option<GateReport>,
    pub error: Option<String>,
}

impl EvaluateResponse {
    pub fn success(report: GateReport) -> Self {
        Self {
            success: true,
            report: Some(report),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            report: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// ADVANCE REQUEST/RESPONSE
// =============================================================================

/// Stage advancement request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceRequest {
    pub stage: ConstructionStage,
    #[serde(default)]
    pub requirements: Vec<RequirementRecord>,
    #[serde(default)]
    pub override_authorized: bool,
}

impl AdvanceRequest {
    /// The requirement snapshot carried by this request.
    pub fn to_snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            stage: self.stage,
            requirements: self.requirements.clone(),
        }
    }
}

/// Stage advancement response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub success: bool,
    pub from: ConstructionStage,
    pub to: Option<ConstructionStage>,
    /// Hard-blocking requirements that kept the stage closed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blockers: Vec<RequirementId>,
    pub error: Option<String>,
}

impl AdvanceResponse {
    pub fn advanced(from: ConstructionStage, to: ConstructionStage) -> Self {
        Self {
            success: true,
            from,
            to: Some(to),
            blockers: vec![],
            error: None,
        }
    }

    pub fn blocked(from: ConstructionStage, blockers: Vec<RequirementId>, msg: String) -> Self {
        Self {
            success: false,
            from,
            to: None,
            blockers,
            error: Some(msg),
        }
    }

    pub fn error(from: ConstructionStage, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            from,
            to: None,
            blockers: vec![],
            error: Some(msg.into()),
        }
    }
}
