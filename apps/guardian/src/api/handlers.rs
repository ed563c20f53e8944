//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        AdvanceRequest, AdvanceResponse, EvaluateRequest, EvaluateResponse, HealthResponse,
        PolicyResponse, StagesResponse,
    },
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use guardian_core::GuardianError;

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// POLICY HANDLER
// =============================================================================

/// Get the active blocking policy.
pub async fn policy_handler(State(state): State<AppState>) -> impl IntoResponse {
    let response = PolicyResponse::from_policy(state.evaluator.policy());
    (StatusCode::OK, Json(response))
}

// =============================================================================
// STAGES HANDLER
// =============================================================================

/// List construction stages in build order.
pub async fn stages_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(StagesResponse::default()))
}

// =============================================================================
// EVALUATE HANDLER
// =============================================================================

/// Evaluate a stage's requirement snapshot.
pub async fn evaluate_handler(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> impl IntoResponse {
    let evaluator = &state.evaluator;

    let requirements = match request.to_snapshot().into_requirements(evaluator.policy()) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(stage = %request.stage, error = %e, "Rejected snapshot");
            return (
                StatusCode::BAD_REQUEST,
                Json(EvaluateResponse::error(format!("Invalid snapshot: {}", e))),
            );
        }
    };

    let report = evaluator.evaluate(
        request.stage,
        &requirements,
        request.override_recorded,
        request.override_authorized,
    );

    tracing::debug!(
        stage = %report.stage,
        state = %report.state,
        percent = report.progress.percent_complete,
        hard_blockers = report.progress.hard_blocking_items.len(),
        "Evaluated stage"
    );

    (StatusCode::OK, Json(EvaluateResponse::success(report)))
}

// =============================================================================
// ADVANCE HANDLER
// =============================================================================

/// Advance a project to the next stage if the gate allows it.
///
/// Returns 409 Conflict while hard blockers are unmet or at the final stage.
pub async fn advance_handler(
    State(state): State<AppState>,
    Json(request): Json<AdvanceRequest>,
) -> impl IntoResponse {
    let evaluator = &state.evaluator;
    let from = request.stage;

    let requirements = match request.to_snapshot().into_requirements(evaluator.policy()) {
        Ok(r) => r,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AdvanceResponse::error(from, format!("Invalid snapshot: {}", e))),
            );
        }
    };

    match evaluator.advance(from, &requirements, request.override_authorized) {
        Ok(to) => {
            tracing::info!(
                event = "stage_advanced",
                from = %from,
                to = %to,
                override_authorized = request.override_authorized,
                "Stage gate opened"
            );
            (StatusCode::OK, Json(AdvanceResponse::advanced(from, to)))
        }
        Err(e) => {
            let msg = e.to_string();
            tracing::warn!(event = "stage_blocked", stage = %from, reason = %msg, "Stage gate closed");
            let response = match e {
                GuardianError::StageBlocked { blockers, .. } => {
                    AdvanceResponse::blocked(from, blockers, msg)
                }
                _ => AdvanceResponse::error(from, msg),
            };
            (StatusCode::CONFLICT, Json(response))
        }
    }
}
