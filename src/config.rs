//! Configuration for the implement pipeline.
//!
//! [`ImplementConfig`] is the runtime context threaded through every stage.
//! [`SpeckitSettings`] holds file-based settings loaded by
//! [`SettingsLoader`] from the user and project levels.

pub mod resolution;

pub use resolution::{SettingsLevel, SettingsLoader, SettingsSource};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default prerequisite script, relative to the project root.
pub const DEFAULT_PREREQUISITES_SCRIPT: &str =
    ".specify/scripts/powershell/check-prerequisites.ps1";

/// Project settings file, relative to the project root.
pub const PROJECT_SETTINGS_PATH: &str = ".specify/settings.json";

// ============================================================================
// File Settings
// ============================================================================

/// Settings loaded from `settings.json` files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeckitSettings {
    pub prerequisites: PrerequisitesSettings,
    pub ignore_file: IgnoreFileSettings,
    pub checklists: ChecklistSettings,
}

/// How the prerequisite script is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrerequisitesSettings {
    pub enabled: bool,
    pub interpreter: String,
    pub script: PathBuf,
    pub args: Vec<String>,
}

impl Default for PrerequisitesSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interpreter: "pwsh".to_string(),
            script: PathBuf::from(DEFAULT_PREREQUISITES_SCRIPT),
            args: vec![
                "-Json".to_string(),
                "-RequireTasks".to_string(),
                "-IncludeTasks".to_string(),
            ],
        }
    }
}

impl PrerequisitesSettings {
    /// Full argument list passed to the interpreter for `script`.
    #[must_use]
    pub fn command_args(&self, script: &Path) -> Vec<String> {
        let mut args = vec![
            "-ExecutionPolicy".to_string(),
            "Bypass".to_string(),
            "-File".to_string(),
            script.display().to_string(),
        ];
        args.extend(self.args.iter().cloned());
        args
    }
}

/// Ignore-file maintenance during project setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IgnoreFileSettings {
    pub enabled: bool,
}

impl Default for IgnoreFileSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Checklist gate behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChecklistSettings {
    /// Answers (compared trimmed and lower-cased) that mean "proceed".
    pub affirmative_answers: Vec<String>,
}

impl Default for ChecklistSettings {
    fn default() -> Self {
        Self {
            affirmative_answers: ["yes", "y", "proceed", "continue"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ChecklistSettings {
    /// Whether `answer` means "proceed".
    #[must_use]
    pub fn is_affirmative(&self, answer: &str) -> bool {
        let answer = answer.trim().to_lowercase();
        self.affirmative_answers
            .iter()
            .any(|a| a.trim().to_lowercase() == answer)
    }
}

// ============================================================================
// Runtime Context
// ============================================================================

/// Runtime context for one implement run.
#[derive(Debug, Clone)]
pub struct ImplementConfig {
    /// Directory the run starts from; ignore files and scripts live here.
    pub project_root: PathBuf,
    /// Explicit feature directory, bypassing discovery.
    pub feature_dir: Option<PathBuf>,
    /// Explicit tasks file, instead of `<feature>/tasks.md`.
    pub tasks_file: Option<PathBuf>,
    /// Skip the checklist gate entirely.
    pub skip_checklists: bool,
    /// Suppress progress output on stdout.
    pub quiet: bool,
    /// File-based settings.
    pub settings: SpeckitSettings,
}

impl ImplementConfig {
    /// Create a configuration rooted at `project_root` with default settings.
    #[must_use]
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            feature_dir: None,
            tasks_file: None,
            skip_checklists: false,
            quiet: false,
            settings: SpeckitSettings::default(),
        }
    }

    /// Use an explicit feature directory.
    #[must_use]
    pub fn with_feature_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.feature_dir = dir;
        self
    }

    /// Use an explicit tasks file.
    #[must_use]
    pub fn with_tasks_file(mut self, path: Option<PathBuf>) -> Self {
        self.tasks_file = path;
        self
    }

    /// Skip checklist validation.
    #[must_use]
    pub fn with_skip_checklists(mut self, skip: bool) -> Self {
        self.skip_checklists = skip;
        self
    }

    /// Suppress progress output.
    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Replace the file-based settings.
    #[must_use]
    pub fn with_settings(mut self, settings: SpeckitSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Resolve a path relative to the project root.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Project-level settings file path.
    #[must_use]
    pub fn settings_path(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_SETTINGS_PATH)
    }
}
