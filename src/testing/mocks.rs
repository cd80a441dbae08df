//! Mock implementations of testing traits.
//!
//! These mocks provide controllable test doubles for external dependencies,
//! enabling deterministic unit tests.

use super::traits::{Confirmation, ProcessOutput, ProcessRunner, TaskExecutor};
use crate::tasks::{Phase, Task};
use anyhow::{bail, Result};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::Mutex;

/// Mock implementation of [`ProcessRunner`].
///
/// Responses are keyed by program name. Unknown programs fail to spawn.
///
/// # Example
///
/// ```rust,ignore
/// let runner = MockProcessRunner::new()
///     .with_program("git", ProcessOutput::success(".git\n"));
///
/// assert!(runner.is_available("git"));
/// ```
#[derive(Debug, Default)]
pub struct MockProcessRunner {
    responses: HashMap<String, ProcessOutput>,
    spawn_errors: HashMap<String, String>,
    unavailable: HashSet<String>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockProcessRunner {
    /// Create a new mock that knows no programs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `output` whenever `program` is run.
    #[must_use]
    pub fn with_program(mut self, program: &str, output: ProcessOutput) -> Self {
        self.responses.insert(program.to_string(), output);
        self
    }

    /// Fail to spawn `program` with the given error.
    #[must_use]
    pub fn with_spawn_error(mut self, program: &str, error: &str) -> Self {
        self.spawn_errors
            .insert(program.to_string(), error.to_string());
        self
    }

    /// Report `program` as missing from `PATH` even if a response exists.
    #[must_use]
    pub fn with_unavailable(mut self, program: &str) -> Self {
        self.unavailable.insert(program.to_string());
        self
    }

    /// All `(program, args)` pairs run so far.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of times `program` was run.
    pub fn call_count(&self, program: &str) -> usize {
        self.calls().iter().filter(|(p, _)| p == program).count()
    }
}

impl ProcessRunner for MockProcessRunner {
    fn run(&self, program: &str, args: &[String], _cwd: &Path) -> Result<ProcessOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((program.to_string(), args.to_vec()));
        }

        if let Some(error) = self.spawn_errors.get(program) {
            bail!("{}", error);
        }

        match self.responses.get(program) {
            Some(output) => Ok(output.clone()),
            None => bail!("program not found: {}", program),
        }
    }

    fn is_available(&self, program: &str) -> bool {
        !self.unavailable.contains(program)
            && (self.responses.contains_key(program) || self.spawn_errors.contains_key(program))
    }
}

/// Mock implementation of [`Confirmation`] with scripted answers.
///
/// Once the script runs out, every further question is answered with an
/// empty string.
#[derive(Debug, Clone, Default)]
pub struct MockConfirmation {
    answers: VecDeque<String>,
    error: Option<String>,
    prompts: Vec<String>,
}

impl MockConfirmation {
    /// Create a mock with no scripted answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer.
    #[must_use]
    pub fn with_answer(mut self, answer: &str) -> Self {
        self.answers.push_back(answer.to_string());
        self
    }

    /// Fail every question with the given error.
    #[must_use]
    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Prompts asked so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Confirmation for MockConfirmation {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        if let Some(error) = &self.error {
            bail!("{}", error);
        }
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}

/// [`TaskExecutor`] that records the order tasks were executed in.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    phases: Vec<Phase>,
    executed: Vec<(Phase, String)>,
}

impl RecordingExecutor {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executed task ids in order.
    pub fn executed_ids(&self) -> Vec<&str> {
        self.executed.iter().map(|(_, id)| id.as_str()).collect()
    }

    /// Executed `(phase, id)` pairs in order.
    pub fn executed(&self) -> &[(Phase, String)] {
        &self.executed
    }

    /// Phases started, in order.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }
}

impl TaskExecutor for RecordingExecutor {
    fn begin_phase(&mut self, phase: &Phase, _task_count: usize) {
        self.phases.push(phase.clone());
    }

    fn execute(&mut self, phase: &Phase, task: &Task) {
        self.executed.push((phase.clone(), task.id.clone()));
    }
}
