//! Tasks file parsing.
//!
//! Extracts unchecked checkbox tasks of the form
//! `- [ ] T001 [P] [US1] Description` from markdown content.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::Task;
use crate::error::{Result, SpeckitError};

// ============================================================================
// Line Pattern
// ============================================================================

/// Unchecked checkbox, identifier, optional `[P]`, optional `[USn]`, description.
const TASK_LINE_PATTERN: &str =
    r"^\s*-\s*\[\s*\]\s*(T\d{3})\b\s*(\[P\])?\s*(\[(US\d+)\])?\s*(.+)$";

fn task_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TASK_LINE_PATTERN).expect("task line pattern is valid"))
}

/// Parse a single line into a task, if it is an unchecked task line.
///
/// # Example
///
/// ```
/// use speckit::tasks::parsing::parse_task_line;
///
/// let task = parse_task_line("- [ ] T002 [US1] Implement feature").unwrap();
/// assert_eq!(task.id, "T002");
/// assert_eq!(task.story.as_deref(), Some("US1"));
/// assert!(!task.parallel);
///
/// assert!(parse_task_line("- [X] T003 Already done").is_none());
/// ```
#[must_use]
pub fn parse_task_line(line: &str) -> Option<Task> {
    let caps = task_line_regex().captures(line)?;
    let description = caps[5].trim();
    if description.is_empty() {
        return None;
    }

    Some(Task {
        id: caps[1].to_string(),
        description: description.to_string(),
        parallel: caps.get(2).is_some(),
        story: caps.get(4).map(|m| m.as_str().to_string()),
        completed: false,
        line: 0,
    })
}

// ============================================================================
// File Parsing
// ============================================================================

/// Parse all unchecked tasks from tasks-file content, in file order.
///
/// Lines that do not match are ignored.
#[must_use]
pub fn parse_tasks(content: &str) -> Vec<Task> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            parse_task_line(line).map(|mut task| {
                task.line = idx + 1;
                task
            })
        })
        .collect()
}

/// Read and parse a tasks file.
///
/// # Errors
///
/// Returns [`SpeckitError::MissingFile`] if the file does not exist and
/// [`SpeckitError::TaskParse`] if it cannot be read as UTF-8 text.
pub fn parse_tasks_file(path: &Path) -> Result<Vec<Task>> {
    if !path.is_file() {
        return Err(SpeckitError::missing_file(path));
    }

    let content = std::fs::read_to_string(path).map_err(|e| SpeckitError::TaskParse {
        message: format!("{}: {e}", path.display()),
    })?;

    let tasks = parse_tasks(&content);
    debug!("Parsed {} tasks from {}", tasks.len(), path.display());
    Ok(tasks)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_tasks_empty() {
        assert!(parse_tasks("").is_empty());
    }

    #[test]
    fn test_parse_tasks_no_task_lines() {
        let content = r#"
# Tasks: Photo albums

## Phase 1: Setup

Some prose that mentions T001 without a checkbox.
- [ ] A checkbox without an identifier
"#;
        assert!(parse_tasks(content).is_empty());
    }

    #[test]
    fn test_parse_tasks_markers() {
        let content = "- [ ] T001 [P] Setup project\n- [ ] T002 [US1] Implement feature\n";
        let tasks = parse_tasks(content);
        assert_eq!(tasks.len(), 2);

        assert_eq!(tasks[0].id, "T001");
        assert!(tasks[0].parallel);
        assert_eq!(tasks[0].story, None);
        assert_eq!(tasks[0].description, "Setup project");
        assert_eq!(tasks[0].line, 1);

        assert_eq!(tasks[1].id, "T002");
        assert!(!tasks[1].parallel);
        assert_eq!(tasks[1].story.as_deref(), Some("US1"));
        assert_eq!(tasks[1].description, "Implement feature");
        assert_eq!(tasks[1].line, 2);
    }

    #[test]
    fn test_parse_tasks_both_markers() {
        let tasks = parse_tasks("- [ ] T010 [P] [US12] Add album model in src/models/album.py");
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].parallel);
        assert_eq!(tasks[0].story.as_deref(), Some("US12"));
        assert_eq!(tasks[0].description, "Add album model in src/models/album.py");
    }

    #[test]
    fn test_parse_tasks_skips_checked() {
        let content = r#"
- [x] T001 Done lowercase
- [X] T002 Done uppercase
- [ ] T003 Still open
"#;
        let tasks = parse_tasks(content);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "T003");
    }

    #[test]
    fn test_parse_tasks_preserves_order_and_lines() {
        let content = "intro\n- [ ] T003 Third\n\n- [ ] T001 First\n  - [ ] T002 Nested\n";
        let tasks = parse_tasks(content);
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["T003", "T001", "T002"]);
        let lines: Vec<_> = tasks.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![2, 4, 5]);
    }

    #[test]
    fn test_parse_tasks_loose_checkbox_spacing() {
        let tasks = parse_tasks("-[  ]T004 Tight formatting");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "T004");
        assert_eq!(tasks[0].description, "Tight formatting");
    }

    #[test]
    fn test_parse_tasks_identifier_needs_three_digits() {
        assert!(parse_tasks("- [ ] T01 Too short").is_empty());
        assert!(parse_tasks("- [ ] T0012 Too long").is_empty());
    }

    #[test]
    fn test_parse_tasks_duplicates_kept() {
        let tasks = parse_tasks("- [ ] T001 One\n- [ ] T001 One again");
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn test_parse_task_line_requires_description() {
        assert!(parse_task_line("- [ ] T001").is_none());
        assert!(parse_task_line("- [ ] T001 [P]   ").is_none());
    }

    #[test]
    fn test_parse_tasks_file_missing() {
        let temp = TempDir::new().unwrap();
        let err = parse_tasks_file(&temp.path().join("tasks.md")).unwrap_err();
        assert!(matches!(err, SpeckitError::MissingFile { .. }));
    }

    #[test]
    fn test_parse_tasks_file_reads_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.md");
        std::fs::write(&path, "- [ ] T001 Setup project\n").unwrap();
        let tasks = parse_tasks_file(&path).unwrap();
        assert_eq!(tasks.len(), 1);
    }
}
