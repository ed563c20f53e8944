//! # Configuration
//!
//! Loads `guardian.toml`. Every section is optional; a missing file argument
//! means the standard blocking policy.
//!
//! ```toml
//! [policy]
//! checklist = false
//! document = true
//! ```
//!
//! Server security knobs (`GUARDIAN_API_KEY`, `GUARDIAN_RATE_LIMIT`,
//! `GUARDIAN_CORS_ORIGINS`) are read from the environment by the API module.

use guardian_core::{BlockingPolicy, GuardianError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum configuration file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

/// Top-level contents of `guardian.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardianConfig {
    /// Category → hard-blocking table handed to the evaluator.
    pub policy: BlockingPolicy,
}

impl GuardianConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, GuardianError> {
        toml::from_str(text).map_err(|e| GuardianError::ConfigError(e.to_string()))
    }

    /// Load configuration from `path`, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, GuardianError> {
        let Some(path) = path else {
            tracing::debug!("No config file given, using standard policy");
            return Ok(Self::default());
        };

        let metadata = std::fs::metadata(path).map_err(|e| {
            GuardianError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(GuardianError::ConfigError(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| GuardianError::IoError(format!("Read config: {}", e)))?;
        let config = Self::from_toml_str(&text)?;

        tracing::info!(
            path = %path.display(),
            hard_categories = ?config.policy.hard_categories(),
            "Loaded configuration"
        );
        Ok(config)
    }
}

// =============================================================================
// TESTS
// =============================================================================
