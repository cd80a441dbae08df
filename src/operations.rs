//! Real implementations of testable traits.
//!
//! These implementations use actual subprocesses and the terminal. They
//! implement the same traits as the mocks, enabling dependency injection.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::tasks::{Phase, Task};
use crate::testing::{Confirmation, ProcessOutput, ProcessRunner, TaskExecutor};

/// Runs commands with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    /// Create a new runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<ProcessOutput> {
        debug!("Running {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .with_context(|| format!("Failed to run {program}"))?;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Asks questions on stderr and reads answers from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        eprint!("\n{} ", prompt);
        io::stderr().flush()?;

        let mut input = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut input)
            .context("Failed to read answer from stdin")?;
        if read == 0 {
            bail!("stdin closed before an answer was given");
        }
        Ok(input)
    }
}

/// Answers every question with a fixed reply, for non-interactive runs.
#[derive(Debug, Clone)]
pub struct AutoConfirmation {
    answer: String,
}

impl AutoConfirmation {
    /// Always answer `yes`.
    #[must_use]
    pub fn yes() -> Self {
        Self {
            answer: "yes".to_string(),
        }
    }
}

impl Confirmation for AutoConfirmation {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        eprintln!("\n{} {}", prompt, self.answer);
        Ok(self.answer.clone())
    }
}

/// Placeholder executor: reports each task and performs no work.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedExecutor {
    quiet: bool,
}

impl SimulatedExecutor {
    /// Executor that prints each phase and task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor that only logs.
    #[must_use]
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl TaskExecutor for SimulatedExecutor {
    fn begin_phase(&mut self, phase: &Phase, task_count: usize) {
        if self.quiet {
            return;
        }
        println!(
            "\n{} {} ({} task{})",
            "Phase:".cyan().bold(),
            phase.to_string().bold(),
            task_count,
            if task_count == 1 { "" } else { "s" }
        );
    }

    fn execute(&mut self, phase: &Phase, task: &Task) {
        debug!("Simulating {} in phase {}", task.id, phase);
        if self.quiet {
            return;
        }
        let marker = if task.parallel { " [P]" } else { "" };
        println!(
            "    {} {}{}: {}",
            "→".cyan(),
            task.id.bold(),
            marker,
            task.description
        );
    }
}
