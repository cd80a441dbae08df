//! Phase grouping and simulated execution.
//!
//! Phases run in the order their first task appears in the file. Inside a
//! phase, `[P]` tasks run before sequential ones and each group keeps file
//! order.

use serde::Serialize;
use tracing::{debug, info};

use super::{Phase, Task};
use crate::testing::TaskExecutor;

/// Determine the phase a task belongs to.
///
/// Precedence: story-less "setup", story-less "foundational", story tag,
/// then polish.
#[must_use]
pub fn assign_phase(task: &Task) -> Phase {
    match &task.story {
        Some(story) => Phase::Story(story.clone()),
        None => {
            let description = task.description.to_lowercase();
            if description.contains("setup") {
                Phase::Setup
            } else if description.contains("foundational") {
                Phase::Foundational
            } else {
                Phase::Polish
            }
        }
    }
}

/// Group task indices by phase, ordered by each phase's first appearance.
#[must_use]
pub fn group_phases(tasks: &[Task]) -> Vec<(Phase, Vec<usize>)> {
    let mut groups: Vec<(Phase, Vec<usize>)> = Vec::new();

    for (idx, task) in tasks.iter().enumerate() {
        let phase = assign_phase(task);
        match groups.iter_mut().find(|(p, _)| *p == phase) {
            Some((_, members)) => members.push(idx),
            None => groups.push((phase, vec![idx])),
        }
    }

    groups
}

/// Tasks executed for one phase, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseRun {
    pub phase: Phase,
    pub parallel: Vec<String>,
    pub sequential: Vec<String>,
}

impl PhaseRun {
    /// Total number of tasks executed in this phase.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parallel.len() + self.sequential.len()
    }

    /// Whether the phase executed no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Record of a full execution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionSummary {
    pub phases: Vec<PhaseRun>,
}

impl ExecutionSummary {
    /// Number of tasks executed across all phases.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.phases.iter().map(PhaseRun::len).sum()
    }

    /// Executed task ids in execution order.
    #[must_use]
    pub fn execution_order(&self) -> Vec<&str> {
        self.phases
            .iter()
            .flat_map(|run| run.parallel.iter().chain(run.sequential.iter()))
            .map(String::as_str)
            .collect()
    }
}

/// The execution order without running anything.
#[must_use]
pub fn plan_phases(tasks: &[Task]) -> Vec<PhaseRun> {
    group_phases(tasks)
        .into_iter()
        .map(|(phase, members)| {
            let (parallel, sequential): (Vec<usize>, Vec<usize>) =
                members.into_iter().partition(|&idx| tasks[idx].parallel);
            let ids = |idxs: Vec<usize>| -> Vec<String> {
                idxs.into_iter().map(|i| tasks[i].id.clone()).collect()
            };
            PhaseRun {
                phase,
                parallel: ids(parallel),
                sequential: ids(sequential),
            }
        })
        .collect()
}

/// Execute every task phase by phase, marking each one completed.
///
/// Execution cannot fail; afterwards every task has `completed == true`.
pub fn execute_phases(tasks: &mut [Task], executor: &mut dyn TaskExecutor) -> ExecutionSummary {
    let mut summary = ExecutionSummary::default();

    for (phase, members) in group_phases(tasks) {
        info!("Phase {}: {} task(s)", phase, members.len());
        executor.begin_phase(&phase, members.len());

        let (parallel, sequential): (Vec<usize>, Vec<usize>) =
            members.into_iter().partition(|&idx| tasks[idx].parallel);

        debug!(
            "Phase {}: {} parallel, {} sequential",
            phase,
            parallel.len(),
            sequential.len()
        );

        let mut run = PhaseRun {
            phase: phase.clone(),
            parallel: Vec::with_capacity(parallel.len()),
            sequential: Vec::with_capacity(sequential.len()),
        };

        for idx in parallel {
            executor.execute(&phase, &tasks[idx]);
            tasks[idx].completed = true;
            run.parallel.push(tasks[idx].id.clone());
        }

        for idx in sequential {
            executor.execute(&phase, &tasks[idx]);
            tasks[idx].completed = true;
            run.sequential.push(tasks[idx].id.clone());
        }

        summary.phases.push(run);
    }

    summary
}
