//! Checklist validation.
//!
//! Every `*.md` file directly inside a feature's `checklists/` directory is a
//! readiness gate. A file passes when none of its checkbox items is open.
//! If any file fails, the user is asked whether to proceed anyway.

use std::path::Path;
use std::sync::OnceLock;

use colored::Colorize;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::ImplementConfig;
use crate::error::{Result, SpeckitError};
use crate::testing::Confirmation;

/// Question put to the user when a checklist fails.
pub const PROCEED_PROMPT: &str =
    "Some checklists are incomplete. Do you want to proceed with implementation anyway? (yes/no):";

fn checkbox_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-\s*\[([ xX])\]\s*(.+)").expect("checkbox pattern is valid"))
}

// ============================================================================
// Counting
// ============================================================================

/// Item counts for one checklist file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistStatus {
    /// File name, e.g. `ux.md`.
    pub name: String,
    pub total: usize,
    pub completed: usize,
    pub incomplete: usize,
}

impl ChecklistStatus {
    /// Count checkbox items in `content`, one item per line at most.
    #[must_use]
    pub fn from_content(name: impl Into<String>, content: &str) -> Self {
        let mut completed = 0;
        let mut incomplete = 0;

        for caps in content.lines().filter_map(|line| checkbox_regex().captures(line)) {
            if caps[1].eq_ignore_ascii_case("x") {
                completed += 1;
            } else {
                incomplete += 1;
            }
        }

        Self {
            name: name.into(),
            total: completed + incomplete,
            completed,
            incomplete,
        }
    }

    /// A checklist passes when it has no incomplete items.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.incomplete == 0
    }
}

/// Scan every `*.md` file directly inside `dir`, sorted by file name.
///
/// Returns `Ok(None)` if `dir` does not exist.
///
/// # Errors
///
/// Returns an error naming the file if a checklist cannot be read.
pub fn scan_checklists(dir: &Path) -> Result<Option<Vec<ChecklistStatus>>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut statuses = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SpeckitError::Other(anyhow::anyhow!(
                "failed to read checklist {}: {e}",
                path.display()
            ))
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let status = ChecklistStatus::from_content(name, &content);
        debug!(
            "Checklist {}: {}/{} complete",
            status.name, status.completed, status.total
        );
        statuses.push(status);
    }

    Ok(Some(statuses))
}

/// Render the status table as markdown.
#[must_use]
pub fn render_table(statuses: &[ChecklistStatus]) -> String {
    let mut table = String::from(
        "| Checklist | Total | Completed | Incomplete | Status |\n\
         |-----------|-------|-----------|------------|--------|\n",
    );
    for status in statuses {
        let label = if status.passed() {
            "✓ PASS"
        } else {
            "✗ FAIL"
        };
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            status.name, status.total, status.completed, status.incomplete, label
        ));
    }
    table
}

// ============================================================================
// Gate
// ============================================================================

/// Outcome of the checklist gate when the run may continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "checklists", rename_all = "snake_case")]
pub enum ChecklistGate {
    /// Validation disabled by configuration.
    Skipped,
    /// No `checklists/` directory.
    NoChecklists,
    /// Every checklist passed.
    Passed(Vec<ChecklistStatus>),
    /// Some checklists failed and the user chose to proceed.
    Overridden(Vec<ChecklistStatus>),
}

impl ChecklistGate {
    /// Statuses that were scanned, if any.
    #[must_use]
    pub fn statuses(&self) -> &[ChecklistStatus] {
        match self {
            Self::Passed(s) | Self::Overridden(s) => s.as_slice(),
            Self::Skipped | Self::NoChecklists => &[],
        }
    }
}

/// Validate the checklists in `dir` and ask before proceeding past failures.
///
/// # Errors
///
/// Returns [`SpeckitError::ChecklistsIncomplete`] if a checklist fails and
/// the answer is not affirmative (a failed prompt counts as "no").
pub fn validate_checklists(
    config: &ImplementConfig,
    dir: &Path,
    confirm: &mut dyn Confirmation,
) -> Result<ChecklistGate> {
    if config.skip_checklists {
        info!("Checklist validation skipped");
        return Ok(ChecklistGate::Skipped);
    }

    let Some(statuses) = scan_checklists(dir)? else {
        warn!(
            "No checklists directory at {}; continuing",
            dir.display()
        );
        return Ok(ChecklistGate::NoChecklists);
    };

    if !config.quiet {
        println!("\n{}", "Checklist status:".cyan().bold());
        print!("{}", render_table(&statuses));
    }

    let failing: Vec<String> = statuses
        .iter()
        .filter(|s| !s.passed())
        .map(|s| s.name.clone())
        .collect();

    if failing.is_empty() {
        if !config.quiet {
            println!("{} All checklists passed", "OK".green().bold());
        }
        return Ok(ChecklistGate::Passed(statuses));
    }

    let answer = match confirm.ask(PROCEED_PROMPT) {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Could not read confirmation: {}", e);
            String::new()
        }
    };

    if config.settings.checklists.is_affirmative(&answer) {
        info!("Proceeding despite incomplete checklists: {}", failing.join(", "));
        Ok(ChecklistGate::Overridden(statuses))
    } else {
        Err(SpeckitError::ChecklistsIncomplete { failing })
    }
}
