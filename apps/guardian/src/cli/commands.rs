//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use guardian_core::{
    ConstructionStage, GateReport, GuardianError, StageGateEvaluator, StageRequirement,
    StageSnapshot,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE LIMITS
// =============================================================================

/// Maximum snapshot file size (10 MB).
const MAX_SNAPSHOT_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Resolve `path` to a canonical regular file.
///
/// Canonicalizing resolves `..` and symlinks before anything is read.
fn validate_file_path(path: &Path) -> Result<PathBuf, GuardianError> {
    let canonical = path.canonicalize().map_err(|e| {
        GuardianError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(GuardianError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Reject files larger than `max_size` bytes.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), GuardianError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| GuardianError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(GuardianError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Read a stage snapshot from a JSON file.
pub fn read_snapshot(file: &Path) -> Result<StageSnapshot, GuardianError> {
    let validated_path = validate_file_path(file)?;
    validate_file_size(&validated_path, MAX_SNAPSHOT_FILE_SIZE)?;

    let contents = std::fs::read(&validated_path)
        .map_err(|e| GuardianError::IoError(format!("Read file: {}", e)))?;

    serde_json::from_slice(&contents)
        .map_err(|e| GuardianError::SerializationError(format!("Parse snapshot: {}", e)))
}

/// Read and validate a snapshot file against the evaluator's policy.
fn load_requirements(
    evaluator: &StageGateEvaluator,
    file: &Path,
) -> Result<(ConstructionStage, Vec<StageRequirement>), GuardianError> {
    let snapshot = read_snapshot(file)?;
    let stage = snapshot.stage;
    let requirements = snapshot.into_requirements(evaluator.policy())?;

    tracing::debug!(
        "Loaded {} requirements for stage {} from {:?}",
        requirements.len(),
        stage,
        file
    );
    Ok((stage, requirements))
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    evaluator: StageGateEvaluator,
    host: &str,
    port: u16,
) -> Result<(), GuardianError> {
    println!("Guardian Stage Gate Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:            {}", host);
    println!("  Port:            {}", port);
    println!(
        "  Hard categories: {:?}",
        evaluator.policy().hard_categories()
    );
    println!();
    println!("Endpoints:");
    println!("  GET  /health   - Health check");
    println!("  GET  /policy   - Active blocking policy");
    println!("  GET  /stages   - Construction stages");
    println!("  POST /evaluate - Evaluate a stage snapshot");
    println!("  POST /advance  - Advance to the next stage");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, evaluator).await
}

// =============================================================================
// EVALUATE COMMAND
// =============================================================================

/// Evaluate a stage snapshot.
pub fn cmd_evaluate(
    evaluator: &StageGateEvaluator,
    file: &Path,
    json_mode: bool,
    override_recorded: bool,
    override_authorized: bool,
    detailed: bool,
) -> Result<(), GuardianError> {
    let (stage, requirements) = load_requirements(evaluator, file)?;
    let report = evaluator.evaluate(stage, &requirements, override_recorded, override_authorized);

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_default()
        );
        return Ok(());
    }

    print_report(&report, detailed);
    Ok(())
}

fn print_report(report: &GateReport, detailed: bool) {
    let progress = &report.progress;

    println!("Guardian Stage Gate");
    println!("===================");
    println!();
    println!("Stage:     {}", report.stage);
    println!("State:     {}", report.state);
    println!(
        "Progress:  {}% ({} / {} requirements met)",
        progress.percent_complete, progress.satisfied_count, progress.total_count
    );
    println!();

    println!("{}", gate_line(report));
    println!(
        "Hard blockers: {}   Overridable: {}",
        progress.hard_blocking_items.len(),
        progress.overridable_items.len()
    );

    if detailed {
        if !progress.hard_blocking_items.is_empty() {
            println!();
            println!("Hard-blocking (cannot be overridden):");
            for r in &progress.hard_blocking_items {
                println!("  {} [{}] {}", r.id, r.category, r.description);
            }
        }
        if !progress.overridable_items.is_empty() {
            println!();
            println!("Overridable:");
            for r in &progress.overridable_items {
                println!("  {} [{}] {}", r.id, r.category, r.description);
            }
        }
        println!();
        println!("By category:");
        for c in &report.categories {
            println!(
                "  {:<14} {:>3}%  ({} / {})",
                c.category.as_str(),
                c.percent,
                c.satisfied,
                c.total
            );
        }
    }
}

/// One-line gate summary for text output.
fn gate_line(report: &GateReport) -> String {
    match report.next_stage {
        Some(next) if report.state.permits_advance() => format!("Gate OPEN: may proceed to {}", next),
        Some(next) => format!("Gate CLOSED: cannot proceed to {}", next),
        None => format!("Terminal stage reached ({})", report.stage),
    }
}

// =============================================================================
// ADVANCE COMMAND
// =============================================================================

/// Advance to the next stage, or report why the gate is closed.
pub fn cmd_advance(
    evaluator: &StageGateEvaluator,
    file: &Path,
    json_mode: bool,
    override_authorized: bool,
) -> Result<(), GuardianError> {
    let (stage, requirements) = load_requirements(evaluator, file)?;

    let result = evaluator.advance(stage, &requirements, override_authorized);

    if json_mode {
        let output = match &result {
            Ok(next) => serde_json::json!({
                "success": true,
                "from": stage,
                "to": next,
            }),
            Err(e) => serde_json::json!({
                "success": false,
                "from": stage,
                "error": e.to_string(),
            }),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        for line in advance_lines(stage, &requirements, &result) {
            println!("{}", line);
        }
    }

    result.map(|next| {
        tracing::info!(from = %stage, to = %next, "Stage advanced");
    })
}

/// Text output for an advance attempt.
fn advance_lines(
    stage: ConstructionStage,
    requirements: &[StageRequirement],
    result: &Result<ConstructionStage, GuardianError>,
) -> Vec<String> {
    match result {
        Ok(next) => vec![format!("{} -> {}", stage, next)],
        Err(GuardianError::StageBlocked { blockers, .. }) => {
            let mut lines = vec![format!("{} is blocked. Unmet hard requirements:", stage)];
            lines.extend(
                requirements
                    .iter()
                    .filter(|r| blockers.contains(&r.id))
                    .map(|r| format!("  {} [{}] {}", r.id, r.category, r.description)),
            );
            lines
        }
        Err(GuardianError::TerminalStage(_)) => {
            vec![format!("{} is the final stage; there is no stage to advance to.", stage)]
        }
        Err(e) => vec![format!("Cannot advance from {}: {}", stage, e)],
    }
}

// =============================================================================
// POLICY COMMAND
// =============================================================================

/// Show the active blocking policy.
pub fn cmd_policy(evaluator: &StageGateEvaluator, json_mode: bool) -> Result<(), GuardianError> {
    let policy = evaluator.policy();

    if json_mode {
        let output = api::PolicyResponse::from_policy(policy);
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Blocking Policy");
    println!("===============");
    for category in guardian_core::RequirementCategory::ALL {
        let rule = if policy.is_hard_blocking(category) {
            "hard (never overridable)"
        } else {
            "soft (overridable)"
        };
        println!("  {:<14} {}", category.as_str(), rule);
    }

    Ok(())
}

// =============================================================================
// STAGES COMMAND
// =============================================================================

/// List construction stages in build order.
pub fn cmd_stages(json_mode: bool) -> Result<(), GuardianError> {
    if json_mode {
        let output = api::StagesResponse::default();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Construction Stages");
    println!("===================");
    for (i, stage) in ConstructionStage::ALL.iter().enumerate() {
        let marker = if stage.is_terminal() { "  (handover)" } else { "" };
        println!("  {}. {}{}", i + 1, stage, marker);
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
