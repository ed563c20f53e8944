//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use guardian::api::{
    AdvanceRequest, AdvanceResponse, EvaluateRequest, EvaluateResponse, HealthResponse,
    PolicyResponse, StagesResponse,
};
use guardian_core::{BlockingPolicy, ConstructionStage, RequirementCategory, RequirementId};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

// =============================================================================
// EVALUATE REQUEST TESTS
// =============================================================================

#[test]
fn test_evaluate_request_defaults() {
    let json = r#"{"stage":"base"}"#;
    let request: EvaluateRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.stage, ConstructionStage::Base);
    assert!(request.requirements.is_empty());
    assert!(!request.override_recorded);
    assert!(!request.override_authorized);
}

#[test]
fn test_evaluate_request_records() {
    let json = r#"{
        "stage": "fixing",
        "requirements": [
            {"id": 11, "category": "certification", "description": "Waterproofing certificate",
             "is_satisfied": true, "satisfied_at": "2024-09-12T04:30:00Z"},
            {"id": 12, "category": "document", "description": "Tile selection sign-off",
             "is_hard_blocking": false}
        ],
        "override_authorized": true
    }"#;
    let request: EvaluateRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.requirements.len(), 2);
    assert_eq!(request.requirements[0].category, RequirementCategory::Certification);
    assert!(request.requirements[0].satisfied_at.is_some());
    assert_eq!(request.requirements[1].is_hard_blocking, Some(false));

    let requirements = request
        .to_snapshot()
        .into_requirements(&BlockingPolicy::standard())
        .unwrap();
    assert!(requirements[0].is_hard_blocking);
    assert!(!requirements[1].is_hard_blocking);
}

#[test]
fn test_evaluate_request_unknown_category_rejected() {
    let json = r#"{"stage":"frame","requirements":[{"id":1,"category":"roofing","description":"x"}]}"#;
    let result: Result<EvaluateRequest, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

#[test]
fn test_evaluate_request_unknown_stage_rejected() {
    let result: Result<EvaluateRequest, _> = serde_json::from_str(r#"{"stage":"roof"}"#);
    assert!(result.is_err());
}

#[test]
fn test_evaluate_response_error() {
    let response = EvaluateResponse::error("Invalid snapshot");
    let json = serde_json::to_string(&response).unwrap();

    assert!(json.contains("\"success\":false"));
    assert!(json.contains("\"report\":null"));
    assert!(json.contains("Invalid snapshot"));
}

// =============================================================================
// ADVANCE TYPES TESTS
// =============================================================================

#[test]
fn test_advance_request_deserialization() {
    let json = r#"{"stage":"lockup","requirements":[],"override_authorized":true}"#;
    let request: AdvanceRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.stage, ConstructionStage::Lockup);
    assert!(request.override_authorized);
    assert!(request.to_snapshot().requirements.is_empty());
}

#[test]
fn test_advance_response_advanced() {
    let response = AdvanceResponse::advanced(ConstructionStage::Base, ConstructionStage::Frame);
    let json = serde_json::to_string(&response).unwrap();

    assert!(json.contains("\"from\":\"base\""));
    assert!(json.contains("\"to\":\"frame\""));
    // Empty blocker list is omitted
    assert!(!json.contains("blockers"));
}

#[test]
fn test_advance_response_blocked() {
    let response = AdvanceResponse::blocked(
        ConstructionStage::Frame,
        vec![RequirementId(3), RequirementId(8)],
        "blocked".to_string(),
    );
    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"blockers\":[3,8]"));

    let back: AdvanceResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(back.blockers, vec![RequirementId(3), RequirementId(8)]);
    assert!(!back.success);
}

// =============================================================================
// REFERENCE DATA TESTS
// =============================================================================

#[test]
fn test_policy_response_lists_hard_categories() {
    let response = PolicyResponse::from_policy(&BlockingPolicy::standard());
    let json = serde_json::to_string(&response).unwrap();

    assert!(json.contains("\"checklist\":false"));
    assert!(json.contains("\"hard_categories\":[\"inspection\",\"certification\",\"insurance\",\"permit\"]"));
}

#[test]
fn test_stages_response_names() {
    let stages = StagesResponse::default();
    let names: Vec<_> = stages.stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Pre-construction",
            "Base (slab)",
            "Frame",
            "Lockup",
            "Fixing",
            "Practical completion"
        ]
    );
}
