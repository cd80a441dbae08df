//! Task records parsed from a feature's `tasks.md`.
//!
//! - [`parsing`] extracts unchecked checkbox tasks from markdown
//! - [`phases`] groups tasks into phases and runs them through a [`TaskExecutor`]
//! - [`update`] writes completion markers back into the file
//!
//! [`TaskExecutor`]: crate::testing::TaskExecutor

pub mod parsing;
pub mod phases;
pub mod update;

pub use parsing::{parse_tasks, parse_tasks_file};
pub use phases::{
    assign_phase, execute_phases, group_phases, plan_phases, ExecutionSummary, PhaseRun,
};
pub use update::{checked_line, update_tasks_file, UpdateOutcome};

use serde::{Deserialize, Serialize};
use std::fmt;

/// One actionable item from the tasks file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier such as `T001`.
    pub id: String,
    /// Description text with surrounding whitespace removed.
    pub description: String,
    /// Whether the line carried the `[P]` marker.
    pub parallel: bool,
    /// Story tag such as `US1`, without brackets.
    pub story: Option<String>,
    /// Set once the task has been executed.
    pub completed: bool,
    /// 1-based line number in the source file.
    pub line: usize,
}

impl Task {
    /// Create an unchecked, sequential task without a story tag.
    #[must_use]
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            parallel: false,
            story: None,
            completed: false,
            line: 0,
        }
    }

    /// Mark the task as parallelizable.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Attach a story tag.
    #[must_use]
    pub fn with_story(mut self, story: impl Into<String>) -> Self {
        self.story = Some(story.into());
        self
    }

    /// Phase this task belongs to.
    #[must_use]
    pub fn phase(&self) -> Phase {
        assign_phase(self)
    }
}

/// A named group of tasks executed together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Foundational,
    Story(String),
    Polish,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => write!(f, "setup"),
            Self::Foundational => write!(f, "foundational"),
            Self::Story(tag) => write!(f, "{tag}"),
            Self::Polish => write!(f, "polish"),
        }
    }
}
