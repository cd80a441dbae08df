//! Writing completion markers back into the tasks file.
//!
//! Each completed task's unchecked line is located by identifier and
//! description and replaced with a checked line rebuilt from the record.
//! The description is regex-escaped, so metacharacters in task text are
//! matched literally.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, warn};

use super::Task;
use crate::error::{Result, SpeckitError};

/// Temporary file suffix for atomic writes.
const TMP_SUFFIX: &str = ".tmp";

/// Lock file suffix for concurrent access prevention.
const LOCK_SUFFIX: &str = ".lock";

/// Result of rewriting the tasks file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    /// Ids whose line was checked off.
    pub updated: Vec<String>,
    /// Completed ids whose line could not be found.
    pub unmatched: Vec<String>,
}

/// Build the checked form of a task line.
///
/// # Example
///
/// ```
/// use speckit::tasks::{checked_line, Task};
///
/// let task = Task::new("T001", "Setup project").with_parallel(true);
/// assert_eq!(checked_line(&task), "- [X] T001 [P] Setup project");
/// ```
#[must_use]
pub fn checked_line(task: &Task) -> String {
    let mut line = format!("- [X] {}", task.id);
    if task.parallel {
        line.push_str(" [P]");
    }
    if let Some(story) = &task.story {
        line.push_str(&format!(" [{story}]"));
    }
    line.push(' ');
    line.push_str(&task.description);
    line
}

/// Matches the task's unchecked line up to the end of its description,
/// capturing its indentation.
///
/// Only `[P]` and `[USn]` markers may sit between the identifier and the
/// description, so a duplicate id whose text merely ends with this
/// description is left alone.
fn unchecked_pattern(task: &Task) -> Result<Regex> {
    let pattern = format!(
        r"(?m)^([ \t]*)-[ \t]*\[[ \t]*\][ \t]*{}\b(?:[ \t]*\[(?:P|US\d+)\])*[ \t]*{}",
        regex::escape(&task.id),
        regex::escape(&task.description)
    );
    Regex::new(&pattern).map_err(|e| SpeckitError::TaskParse {
        message: format!("invalid pattern for {}: {e}", task.id),
    })
}

/// Apply completion markers to tasks-file content.
///
/// Returns the new content and which tasks were matched.
pub fn apply_completion_markers(content: &str, tasks: &[Task]) -> Result<(String, UpdateOutcome)> {
    let mut content = content.to_string();
    let mut outcome = UpdateOutcome::default();

    for task in tasks.iter().filter(|t| t.completed) {
        let re = unchecked_pattern(task)?;
        if !re.is_match(&content) {
            warn!(
                "Task {} not found in tasks file; leaving it unchanged",
                task.id
            );
            outcome.unmatched.push(task.id.clone());
            continue;
        }

        let replacement = checked_line(task);
        content = re
            .replace_all(&content, |caps: &Captures<'_>| format!("{}{replacement}", &caps[1]))
            .into_owned();
        debug!("Checked off {}", task.id);
        outcome.updated.push(task.id.clone());
    }

    Ok((content, outcome))
}

/// Rewrite the tasks file at `path`, checking off every completed task.
///
/// The write is atomic: content goes to a sibling temporary file which is
/// renamed over the original while an exclusive lock is held.
///
/// # Errors
///
/// Returns [`SpeckitError::MissingFile`] if the file is gone and
/// [`SpeckitError::Update`] if it cannot be rewritten.
pub fn update_tasks_file(path: &Path, tasks: &[Task]) -> Result<UpdateOutcome> {
    if !path.is_file() {
        return Err(SpeckitError::missing_file(path));
    }

    let lock_file = File::create(sibling(path, LOCK_SUFFIX))?;
    FileExt::lock_exclusive(&lock_file)
        .map_err(|e| SpeckitError::update(path, format!("failed to acquire lock: {e}")))?;

    let result = rewrite_locked(path, tasks);

    let _ = FileExt::unlock(&lock_file);
    let _ = fs::remove_file(sibling(path, LOCK_SUFFIX));

    result
}

fn rewrite_locked(path: &Path, tasks: &[Task]) -> Result<UpdateOutcome> {
    let original = fs::read_to_string(path)
        .map_err(|e| SpeckitError::update(path, format!("failed to read: {e}")))?;

    let (content, outcome) = apply_completion_markers(&original, tasks)?;
    if content == original {
        return Ok(outcome);
    }

    let tmp_path = sibling(path, TMP_SUFFIX);
    let write = || -> std::io::Result<()> {
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        fs::rename(&tmp_path, path)
    };

    write().map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        SpeckitError::update(path, e.to_string())
    })?;

    Ok(outcome)
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}
