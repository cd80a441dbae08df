//! Feature directory discovery and implementation context loading.
//!
//! A feature directory lives under `specs/` and holds at least `plan.md`.
//! Discovery walks from the start directory up through its ancestors and
//! returns the first `specs/<feature>/` containing a plan.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, SpeckitError};

/// Directory that holds feature directories.
pub const SPECS_DIR: &str = "specs";
/// Required plan document.
pub const PLAN_FILE: &str = "plan.md";
/// Default tasks document.
pub const TASKS_FILE: &str = "tasks.md";
/// Checklist directory inside a feature directory.
pub const CHECKLISTS_DIR: &str = "checklists";
/// Documents loaded when present.
pub const OPTIONAL_DOCS: &[&str] = &["spec.md", "data-model.md", "research.md", "quickstart.md"];

/// Find the feature directory for `start`.
///
/// For `start` and each ancestor, looks for `specs/` and returns its first
/// subdirectory (by name) that contains `plan.md`.
#[must_use]
pub fn find_feature_dir(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let specs = dir.join(SPECS_DIR);
        if !specs.is_dir() {
            continue;
        }

        let found = WalkDir::new(&specs)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .map(|entry| entry.into_path())
            .find(|path| path.join(PLAN_FILE).is_file());

        if let Some(feature) = found {
            debug!("Discovered feature directory {}", feature.display());
            return Some(feature);
        }
    }
    None
}

/// Use `explicit` if given, otherwise discover from `start`.
///
/// # Errors
///
/// Returns [`SpeckitError::FeatureDirNotFound`] if the explicit directory
/// does not exist or discovery finds nothing.
pub fn resolve_feature_dir(explicit: Option<&Path>, start: &Path) -> Result<PathBuf> {
    match explicit {
        Some(dir) if dir.is_dir() => Ok(dir.to_path_buf()),
        Some(dir) => Err(SpeckitError::FeatureDirNotFound {
            start: dir.to_path_buf(),
        }),
        None => find_feature_dir(start).ok_or_else(|| SpeckitError::FeatureDirNotFound {
            start: start.to_path_buf(),
        }),
    }
}

/// Documents that make up the implementation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureContext {
    pub feature_dir: PathBuf,
    pub plan: PathBuf,
    pub tasks: PathBuf,
    /// Optional documents that exist, in [`OPTIONAL_DOCS`] order.
    pub optional_docs: Vec<PathBuf>,
}

impl FeatureContext {
    /// Checklist directory for this feature.
    #[must_use]
    pub fn checklists_dir(&self) -> PathBuf {
        checklists_dir(&self.feature_dir)
    }

    /// Whether the optional document `name` was found.
    #[must_use]
    pub fn has_doc(&self, name: &str) -> bool {
        self.optional_docs
            .iter()
            .any(|p| p.file_name().is_some_and(|n| n == name))
    }
}

/// Checklist directory for `feature_dir`.
#[must_use]
pub fn checklists_dir(feature_dir: &Path) -> PathBuf {
    feature_dir.join(CHECKLISTS_DIR)
}

/// Load the implementation context of `feature_dir`.
///
/// `tasks_override` replaces `<feature>/tasks.md` when given.
///
/// # Errors
///
/// Returns [`SpeckitError::MissingFile`] if the plan or tasks file is absent.
pub fn load_context(feature_dir: &Path, tasks_override: Option<&Path>) -> Result<FeatureContext> {
    let plan = feature_dir.join(PLAN_FILE);
    let tasks = tasks_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| feature_dir.join(TASKS_FILE));

    for required in [&plan, &tasks] {
        if !required.is_file() {
            return Err(SpeckitError::missing_file(required.clone()));
        }
    }

    let optional_docs = OPTIONAL_DOCS
        .iter()
        .map(|name| feature_dir.join(name))
        .filter(|path| path.is_file())
        .collect();

    Ok(FeatureContext {
        feature_dir: feature_dir.to_path_buf(),
        plan,
        tasks,
        optional_docs,
    })
}
