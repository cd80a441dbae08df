//! External prerequisite script invocation.
//!
//! The script prints a JSON object on stdout:
//!
//! ```json
//! { "FEATURE_DIR": "/repo/specs/001-photo-albums", "AVAILABLE_DOCS": ["research.md"] }
//! ```
//!
//! Every failure here is reported as [`SpeckitError::Prerequisites`]; the
//! pipeline treats it as a warning and carries on with an empty result.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ImplementConfig;
use crate::error::{Result, SpeckitError};
use crate::testing::ProcessRunner;

/// Parsed output of the prerequisite script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteReport {
    #[serde(rename = "FEATURE_DIR", default)]
    pub feature_dir: Option<PathBuf>,
    #[serde(rename = "AVAILABLE_DOCS", default)]
    pub available_docs: Vec<String>,
}

/// Parse the script's stdout.
///
/// # Errors
///
/// Returns [`SpeckitError::Prerequisites`] if stdout is not the expected JSON.
pub fn parse_prerequisite_output(stdout: &str) -> Result<PrerequisiteReport> {
    serde_json::from_str(stdout.trim())
        .map_err(|e| SpeckitError::prerequisites(format!("malformed script output: {e}")))
}

/// Run the configured prerequisite script.
///
/// Returns an empty report without running anything when the check is
/// disabled in settings.
///
/// # Errors
///
/// Returns [`SpeckitError::Prerequisites`] if the script or its interpreter
/// is missing, the script exits non-zero, or its output is malformed.
pub fn check_prerequisites(
    config: &ImplementConfig,
    runner: &dyn ProcessRunner,
) -> Result<PrerequisiteReport> {
    let settings = &config.settings.prerequisites;
    if !settings.enabled {
        debug!("Prerequisite check disabled");
        return Ok(PrerequisiteReport::default());
    }

    let script = config.resolve(&settings.script);
    if !script.is_file() {
        return Err(SpeckitError::prerequisites(format!(
            "script not found: {}",
            script.display()
        )));
    }

    if !runner.is_available(&settings.interpreter) {
        return Err(SpeckitError::prerequisites(format!(
            "interpreter not found on PATH: {}",
            settings.interpreter
        )));
    }

    let output = runner
        .run(
            &settings.interpreter,
            &settings.command_args(&script),
            &config.project_root,
        )
        .map_err(|e| SpeckitError::prerequisites(e.to_string()))?;

    if !output.succeeded() {
        return Err(SpeckitError::prerequisites(format!(
            "script exited with {}: {}",
            output
                .exit_code
                .map_or_else(|| "signal".to_string(), |c| c.to_string()),
            output.stderr.trim()
        )));
    }

    let report = parse_prerequisite_output(&output.stdout)?;
    debug!(
        "Prerequisites: feature_dir={:?}, docs={:?}",
        report.feature_dir, report.available_docs
    );
    Ok(report)
}
