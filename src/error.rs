//! Custom error types for speckit.
//!
//! Every pipeline stage returns [`Result`]; the binary maps the error
//! variant onto a process exit status with [`SpeckitError::exit_code`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for speckit operations
#[derive(Error, Debug)]
pub enum SpeckitError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    // =========================================================================
    // Feature Directory Errors
    // =========================================================================
    /// No feature directory could be located
    #[error("Feature directory not found (looked for specs/<feature>/plan.md from {start})")]
    FeatureDirNotFound { start: PathBuf },

    /// Missing required file
    #[error("Missing required file: {path}")]
    MissingFile { path: PathBuf },

    // =========================================================================
    // Pipeline Errors
    // =========================================================================
    /// Prerequisite script failed or produced unusable output
    #[error("Prerequisite check failed: {message}")]
    Prerequisites { message: String },

    /// Checklists are incomplete and the user chose not to proceed
    #[error("Checklists incomplete: {}", failing.join(", "))]
    ChecklistsIncomplete { failing: Vec<String> },

    /// Tasks file could not be parsed
    #[error("Task parse error: {message}")]
    TaskParse { message: String },

    /// Tasks file could not be rewritten
    #[error("Failed to update {path}: {message}")]
    Update { path: PathBuf, message: String },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpeckitError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    /// Create a missing file error
    pub fn missing_file(path: impl Into<PathBuf>) -> Self {
        Self::MissingFile { path: path.into() }
    }

    /// Create a prerequisite error
    pub fn prerequisites(message: impl Into<String>) -> Self {
        Self::Prerequisites {
            message: message.into(),
        }
    }

    /// Create an update error
    pub fn update(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Update {
            path: path.into(),
            message: message.into(),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Check if the pipeline may continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Prerequisites { .. } | Self::Update { .. })
    }

    /// Check if this error was caused by a user decision rather than a fault
    pub fn is_user_abort(&self) -> bool {
        matches!(self, Self::ChecklistsIncomplete { .. })
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Type alias for speckit results
pub type Result<T> = std::result::Result<T, SpeckitError>;
