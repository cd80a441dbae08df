//! Trait definitions for testable abstractions.
//!
//! These traits abstract the pipeline's side effects (subprocesses, the
//! interactive prompt, and task execution) so stages can be unit tested with
//! deterministic fakes.

use anyhow::Result;
use std::path::Path;

use crate::tasks::{Phase, Task};

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Create a successful output with the given stdout.
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failed output with the given exit code and stderr.
    #[must_use]
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the process exited with status 0.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Abstraction for running external commands synchronously.
///
/// Used for the prerequisite script and git repository detection.
///
/// # Example
///
/// ```rust,ignore
/// use speckit::testing::ProcessRunner;
///
/// fn in_repo(runner: &dyn ProcessRunner, dir: &Path) -> bool {
///     runner
///         .run("git", &["rev-parse".into(), "--git-dir".into()], dir)
///         .map(|out| out.succeeded())
///         .unwrap_or(false)
/// }
/// ```
pub trait ProcessRunner {
    /// Run `program` with `args` in `cwd` and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<ProcessOutput>;

    /// Check whether `program` can be found on `PATH`.
    fn is_available(&self, program: &str) -> bool;
}

/// Abstraction for yes/no questions put to the user.
pub trait Confirmation {
    /// Ask `prompt` and return the raw answer.
    ///
    /// # Errors
    ///
    /// Returns an error if no answer can be read.
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// Abstraction for performing a single task.
///
/// Execution has no failure path; the phase runner marks the task
/// completed after this returns.
pub trait TaskExecutor {
    /// Called once before the first task of `phase` runs.
    fn begin_phase(&mut self, _phase: &Phase, _task_count: usize) {}

    /// Execute `task` as part of `phase`.
    fn execute(&mut self, phase: &Phase, task: &Task);
}
