//! # HomeOwner Guardian - Stage Gate Server
//!
//! The main binary for the Guardian stage progression engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for evaluating requirement snapshots
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   apps/guardian (THE BINARY)                │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌────────────────┐  │
//! │  │   CLI       │    │   HTTP API  │    │  guardian.toml │  │
//! │  │  (clap)     │    │   (axum)    │    │  (policy)      │  │
//! │  └──────┬──────┘    └──────┬──────┘    └───────┬────────┘  │
//! │         │                  │                   │           │
//! │         └──────────────────┼───────────────────┘           │
//! │                            ▼                               │
//! │                   ┌────────────────┐                       │
//! │                   │ guardian-core  │                       │
//! │                   │  (THE RULES)   │                       │
//! │                   └────────────────┘                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! guardian server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! guardian evaluate -f frame-stage.json --detailed
//! guardian advance -f frame-stage.json
//! guardian --config guardian.toml policy
//! ```

use clap::Parser;
use guardian::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing — GUARDIAN_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("GUARDIAN_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "guardian=debug,tower_http=debug"
    } else {
        "guardian=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Guardian startup banner.
fn print_banner() {
    println!(
        r#"
  HomeOwner Guardian v{}
  Stage gates for residential construction

  Hard compliance gates are never bypassed
"#,
        env!("CARGO_PKG_VERSION")
    );
}
