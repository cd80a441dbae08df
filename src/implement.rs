//! The implement pipeline.
//!
//! [`Implementer`] runs every stage in order against an [`ImplementConfig`]:
//!
//! 1. Locate the feature directory
//! 2. Run the prerequisite script (failures are warnings)
//! 3. Validate checklists, asking before proceeding past failures
//! 4. Load the implementation context
//! 5. Verify project setup (git, `.gitignore`)
//! 6. Parse tasks
//! 7. Execute tasks phase by phase
//! 8. Check off completed tasks in the tasks file (failures are logged)
//!
//! External effects go through [`ImplementDependencies`], so tests swap in
//! mocks for the subprocess runner, the prompt, and the executor.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::checklist::{validate_checklists, ChecklistGate};
use crate::config::ImplementConfig;
use crate::error::Result;
use crate::feature::{checklists_dir, load_context, resolve_feature_dir};
use crate::operations::{SimulatedExecutor, StdinConfirmation, SystemProcessRunner};
use crate::prerequisites::{check_prerequisites, PrerequisiteReport};
use crate::setup::{verify_project_setup, SetupReport};
use crate::tasks::{
    execute_phases, parse_tasks_file, update_tasks_file, ExecutionSummary, UpdateOutcome,
};
use crate::testing::{Confirmation, ProcessRunner, TaskExecutor};

/// External capabilities used by the pipeline.
pub struct ImplementDependencies {
    /// Runs the prerequisite script and git.
    pub runner: Box<dyn ProcessRunner>,
    /// Answers the checklist prompt.
    pub confirm: Box<dyn Confirmation>,
    /// Performs each task.
    pub executor: Box<dyn TaskExecutor>,
}

impl std::fmt::Debug for ImplementDependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImplementDependencies")
            .field("runner", &"<dyn ProcessRunner>")
            .field("confirm", &"<dyn Confirmation>")
            .field("executor", &"<dyn TaskExecutor>")
            .finish()
    }
}

impl ImplementDependencies {
    /// Real subprocesses, stdin prompts and the simulated executor.
    #[must_use]
    pub fn real() -> Self {
        Self {
            runner: Box::new(SystemProcessRunner::new()),
            confirm: Box::new(StdinConfirmation),
            executor: Box::new(SimulatedExecutor::new()),
        }
    }

    /// Replace the confirmation provider.
    #[must_use]
    pub fn with_confirmation(mut self, confirm: Box<dyn Confirmation>) -> Self {
        self.confirm = confirm;
        self
    }

    /// Replace the task executor.
    #[must_use]
    pub fn with_executor(mut self, executor: Box<dyn TaskExecutor>) -> Self {
        self.executor = executor;
        self
    }
}

/// Everything a finished run found and did.
#[derive(Debug, Clone, Serialize)]
pub struct ImplementReport {
    pub feature_dir: PathBuf,
    pub tasks_file: PathBuf,
    /// Documents reported by the prerequisite script.
    pub available_docs: Vec<String>,
    /// Why the prerequisite check was skipped, if it failed.
    pub prerequisite_warning: Option<String>,
    /// Optional feature documents that were found.
    pub optional_docs: Vec<PathBuf>,
    pub checklists: ChecklistGate,
    pub setup: SetupReport,
    pub execution: ExecutionSummary,
    /// `None` when the tasks file could not be rewritten.
    pub update: Option<UpdateOutcome>,
    pub update_error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ImplementReport {
    /// Number of tasks executed.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.execution.task_count()
    }

    /// Whether every executed task was checked off in the file.
    #[must_use]
    pub fn fully_recorded(&self) -> bool {
        self.update
            .as_ref()
            .is_some_and(|u| u.unmatched.is_empty() && u.updated.len() == self.task_count())
    }

    /// Wall-clock duration of the run.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Runs the implement pipeline.
#[derive(Debug)]
pub struct Implementer {
    config: ImplementConfig,
    deps: ImplementDependencies,
}

impl Implementer {
    /// Create an implementer with real dependencies.
    #[must_use]
    pub fn new(config: ImplementConfig) -> Self {
        Self::with_deps(config, ImplementDependencies::real())
    }

    /// Create an implementer with injected dependencies.
    #[must_use]
    pub fn with_deps(config: ImplementConfig, deps: ImplementDependencies) -> Self {
        Self { config, deps }
    }

    /// The configuration this implementer runs with.
    #[must_use]
    pub fn config(&self) -> &ImplementConfig {
        &self.config
    }

    /// Run the full pipeline.
    ///
    /// # Errors
    ///
    /// Fails if no feature directory is found, the user declines at the
    /// checklist gate, a required document is missing, or the tasks file
    /// cannot be read. Prerequisite and tasks-file update failures do not
    /// fail the run; they are recorded in the report.
    pub fn run(&mut self) -> Result<ImplementReport> {
        let started_at = Utc::now();
        let config = &self.config;

        let explicit = config.feature_dir.as_deref().map(|dir| config.resolve(dir));
        let discovered = resolve_feature_dir(explicit.as_deref(), &config.project_root);

        let (prerequisites, prerequisite_warning) =
            match check_prerequisites(config, self.deps.runner.as_ref()) {
                Ok(report) => (report, None),
                Err(e) => {
                    warn!("{}; continuing without it", e);
                    (PrerequisiteReport::default(), Some(e.to_string()))
                }
            };

        let feature_dir = match (&explicit, &prerequisites.feature_dir) {
            (None, Some(dir)) if config.resolve(dir).is_dir() => config.resolve(dir),
            _ => discovered?,
        };
        info!("Feature directory: {}", feature_dir.display());

        let checklists = validate_checklists(
            config,
            &checklists_dir(&feature_dir),
            self.deps.confirm.as_mut(),
        )?;

        let tasks_override = config.tasks_file.as_deref().map(|path| config.resolve(path));
        let context = load_context(&feature_dir, tasks_override.as_deref())?;
        info!(
            "Loaded context: {} optional document(s)",
            context.optional_docs.len()
        );

        let setup = verify_project_setup(config, &context, self.deps.runner.as_ref())?;

        let mut tasks = parse_tasks_file(&context.tasks)?;
        info!("Parsed {} unchecked task(s)", tasks.len());

        let execution = execute_phases(&mut tasks, self.deps.executor.as_mut());

        let (update, update_error) = match update_tasks_file(&context.tasks, &tasks) {
            Ok(outcome) => {
                info!("Checked off {} task(s)", outcome.updated.len());
                (Some(outcome), None)
            }
            Err(e) => {
                error!("Could not update {}: {}", context.tasks.display(), e);
                (None, Some(e.to_string()))
            }
        };

        Ok(ImplementReport {
            feature_dir,
            tasks_file: context.tasks,
            available_docs: prerequisites.available_docs,
            prerequisite_warning,
            optional_docs: context.optional_docs,
            checklists,
            setup,
            execution,
            update,
            update_error,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
