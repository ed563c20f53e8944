//! # Guardian CLI Module
//!
//! This module implements the CLI interface for Guardian.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `evaluate` - Evaluate a stage snapshot file
//! - `advance` - Check whether a snapshot lets the project move on
//! - `policy` - Show the active blocking policy
//! - `stages` - List construction stages in build order

mod commands;

use clap::{Parser, Subcommand};
use guardian_core::{GuardianError, StageGateEvaluator};
use std::path::PathBuf;

use crate::config::GuardianConfig;
pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// HomeOwner Guardian - stage gates for residential construction.
///
/// Decides whether a build may move past its current stage given the
/// inspections, certificates and checklist items recorded for it.
#[derive(Parser, Debug)]
#[command(name = "guardian")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to guardian.toml (standard policy when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Evaluate a stage snapshot (JSON)
    Evaluate {
        /// Path to the snapshot file
        #[arg(short, long)]
        file: PathBuf,

        /// An override has already been recorded for this stage
        #[arg(long)]
        override_recorded: bool,

        /// The caller may override soft requirements
        #[arg(long)]
        override_authorized: bool,

        /// List every blocking requirement and category breakdown
        #[arg(short, long)]
        detailed: bool,
    },

    /// Advance to the next stage if the gate allows it
    Advance {
        /// Path to the snapshot file
        #[arg(short, long)]
        file: PathBuf,

        /// The caller may override soft requirements
        #[arg(long)]
        override_authorized: bool,
    },

    /// Show the active blocking policy
    Policy,

    /// List construction stages in build order
    Stages,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), GuardianError> {
    let config = GuardianConfig::load(cli.config.as_deref())?;
    let evaluator = StageGateEvaluator::new(config.policy);
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(evaluator, &host, port).await,
        Some(Commands::Evaluate {
            file,
            override_recorded,
            override_authorized,
            detailed,
        }) => cmd_evaluate(
            &evaluator,
            &file,
            json_mode,
            override_recorded,
            override_authorized,
            detailed,
        ),
        Some(Commands::Advance {
            file,
            override_authorized,
        }) => cmd_advance(&evaluator, &file, json_mode, override_authorized),
        Some(Commands::Policy) => cmd_policy(&evaluator, json_mode),
        Some(Commands::Stages) => cmd_stages(json_mode),
        None => {
            // No subcommand - show the policy by default
            cmd_policy(&evaluator, json_mode)
        }
    }
}
