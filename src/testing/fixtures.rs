//! Test fixtures for creating reproducible feature directories.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the feature directory created under `specs/`.
pub const FIXTURE_FEATURE: &str = "001-photo-albums";

/// A temporary project containing `specs/<feature>/` with a plan and tasks.
///
/// Automatically cleans up when dropped.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::feature().with_checklist("ux.md", "- [x] Done\n");
/// assert!(fixture.feature_dir().join("checklists/ux.md").exists());
/// ```
pub struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    /// Create a project with one feature holding `plan.md` and `tasks.md`.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be populated.
    #[must_use]
    pub fn feature() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let fixture = Self { temp_dir };

        std::fs::create_dir_all(fixture.feature_dir()).expect("Failed to create feature dir");
        fixture
            .with_plan(Self::plan_content())
            .with_tasks(Self::tasks_content())
    }

    /// Create an empty project with no `specs/` directory.
    ///
    /// # Panics
    ///
    /// Panics if temporary directory creation fails.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Overwrite `plan.md`.
    #[must_use]
    pub fn with_plan(self, content: &str) -> Self {
        self.write_feature_file("plan.md", content);
        self
    }

    /// Overwrite `tasks.md`.
    #[must_use]
    pub fn with_tasks(self, content: &str) -> Self {
        self.write_feature_file("tasks.md", content);
        self
    }

    /// Add a checklist file under `checklists/`.
    #[must_use]
    pub fn with_checklist(self, name: &str, content: &str) -> Self {
        self.write_feature_file(&format!("checklists/{name}"), content);
        self
    }

    /// Add an arbitrary file inside the feature directory.
    #[must_use]
    pub fn with_feature_file(self, name: &str, content: &str) -> Self {
        self.write_feature_file(name, content);
        self
    }

    fn write_feature_file(&self, name: &str, content: &str) {
        let path = self.feature_dir().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Failed to write {}: {e}", path.display()));
    }

    /// Project root.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `specs/<feature>` directory.
    #[must_use]
    pub fn feature_dir(&self) -> PathBuf {
        self.temp_dir.path().join("specs").join(FIXTURE_FEATURE)
    }

    /// Path of `tasks.md`.
    #[must_use]
    pub fn tasks_path(&self) -> PathBuf {
        self.feature_dir().join("tasks.md")
    }

    /// Current content of `tasks.md`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be read.
    #[must_use]
    pub fn read_tasks(&self) -> String {
        std::fs::read_to_string(self.tasks_path()).expect("Failed to read tasks.md")
    }

    /// Default plan content.
    #[must_use]
    pub fn plan_content() -> &'static str {
        r#"# Implementation Plan: Photo Albums

## Technical Context

**Language/Version**: Rust 1.85
**Storage**: SQLite
"#
    }

    /// Default tasks content.
    #[must_use]
    pub fn tasks_content() -> &'static str {
        r#"# Tasks: Photo Albums

## Phase 1: Setup

- [ ] T001 [P] Setup project
- [ ] T002 [US1] Implement feature
"#
    }
}
