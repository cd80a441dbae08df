//! Speckit - the implement step of a spec-driven workflow
//!
//! Reads a feature's `tasks.md`, gates on its `checklists/`, loads `plan.md`,
//! prepares the project's `.gitignore`, executes tasks phase by phase and
//! checks them off in the tasks file.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`checklist`] - Checklist counting and the proceed/abort gate
//! - [`config`] - Runtime context and layered settings files
//! - [`error`] - Custom error types and handling
//! - [`feature`] - Feature directory discovery and context loading
//! - [`implement`] - The end-to-end pipeline
//! - [`operations`] - Real subprocess, prompt and executor implementations
//! - [`prerequisites`] - External prerequisite script invocation
//! - [`setup`] - Git detection and ignore-file maintenance
//! - [`tasks`] - Task parsing, phase execution and completion markers
//! - [`testing`] - Testing infrastructure (traits, mocks, fixtures)
//!
//! # Example
//!
//! ```rust,ignore
//! use speckit::config::{ImplementConfig, SettingsLoader};
//! use speckit::implement::Implementer;
//!
//! let root = std::path::PathBuf::from(".");
//! let settings = SettingsLoader::new().load(&root)?;
//! let config = ImplementConfig::new(root).with_settings(settings);
//!
//! let report = Implementer::new(config).run()?;
//! println!("{} task(s) executed", report.task_count());
//! ```

pub mod checklist;
pub mod config;
pub mod error;
pub mod feature;
pub mod implement;
pub mod operations;
pub mod prerequisites;
pub mod setup;
pub mod tasks;
pub mod testing;

// Re-export commonly used types
pub use error::{Result, SpeckitError};

pub use checklist::{ChecklistGate, ChecklistStatus};
pub use config::{ImplementConfig, SettingsLoader, SpeckitSettings};
pub use feature::FeatureContext;
pub use implement::{ImplementDependencies, ImplementReport, Implementer};
pub use setup::{SetupReport, Technology};
pub use tasks::{Phase, Task};

// Re-export testing types for convenience
pub use testing::{
    Confirmation, MockConfirmation, MockProcessRunner, ProcessOutput, ProcessRunner,
    RecordingExecutor, TaskExecutor,
};

// TestFixture is only available in test builds
#[cfg(test)]
pub use testing::TestFixture;
