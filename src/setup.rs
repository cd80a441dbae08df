//! Project setup verification.
//!
//! Before any task runs, the project is checked for a git repository and its
//! `.gitignore` is brought in line with the technologies named in `plan.md`.
//! Each technology contributes one block, opened by a `# <Name>` header; a
//! block whose header is already present is never appended twice.

pub mod technology;

pub use technology::{detect_technologies, Technology};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ImplementConfig;
use crate::error::Result;
use crate::feature::FeatureContext;
use crate::testing::ProcessRunner;

/// Ignore file maintained at the project root.
pub const IGNORE_FILE: &str = ".gitignore";

/// What project setup found and changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetupReport {
    pub git_repository: bool,
    /// `.gitignore` did not exist and was created.
    pub ignore_file_created: bool,
    /// Technologies mentioned in the plan.
    pub technologies: Vec<Technology>,
    /// Technologies whose block was appended on this run.
    pub ignore_blocks_added: Vec<Technology>,
}

/// Whether `dir` is inside a git working tree.
///
/// Any failure to run git counts as "not a repository".
pub fn is_git_repository(runner: &dyn ProcessRunner, dir: &Path) -> bool {
    let args = ["rev-parse".to_string(), "--git-dir".to_string()];
    match runner.run("git", &args, dir) {
        Ok(output) if output.succeeded() => true,
        Ok(output) => {
            debug!("Not a git repository: {}", output.stderr.trim());
            false
        }
        Err(e) => {
            warn!("Could not run git: {}", e);
            false
        }
    }
}

/// Append the block for `tech` to `path` unless its header is already there.
///
/// Returns `true` if the block was written.
///
/// # Errors
///
/// Returns an error if the file cannot be read or appended to.
pub fn append_ignore_block(path: &Path, tech: Technology) -> Result<bool> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    if existing.lines().any(|line| line.trim() == tech.ignore_header()) {
        debug!("{} already has a {} block", path.display(), tech);
        return Ok(false);
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    write!(file, "{}", tech.ignore_block())?;
    Ok(true)
}

/// Check the repository and update `.gitignore` for the plan's technologies.
///
/// `.gitignore` is only created inside a git repository. Outside one, an
/// existing file is still updated.
///
/// # Errors
///
/// Returns an error if the plan cannot be read or `.gitignore` cannot be
/// written.
pub fn verify_project_setup(
    config: &ImplementConfig,
    context: &FeatureContext,
    runner: &dyn ProcessRunner,
) -> Result<SetupReport> {
    let plan = fs::read_to_string(&context.plan)?;
    let mut report = SetupReport {
        git_repository: is_git_repository(runner, &config.project_root),
        technologies: detect_technologies(&plan),
        ..SetupReport::default()
    };

    if !config.settings.ignore_file.enabled {
        debug!("Ignore file maintenance disabled");
        return Ok(report);
    }

    let ignore_path = ignore_file_path(&config.project_root);
    if report.git_repository && !ignore_path.exists() {
        fs::File::create(&ignore_path)?;
        report.ignore_file_created = true;
        if !config.quiet {
            println!("   Created: {IGNORE_FILE}");
        }
    }

    if !ignore_path.exists() {
        if !report.technologies.is_empty() {
            info!("No git repository and no {}; skipping ignore patterns", IGNORE_FILE);
        }
        return Ok(report);
    }

    for tech in &report.technologies {
        if append_ignore_block(&ignore_path, *tech)? {
            report.ignore_blocks_added.push(*tech);
        }
    }
    if !report.ignore_blocks_added.is_empty() && !config.quiet {
        println!("   Updated: {IGNORE_FILE}");
    }

    Ok(report)
}

/// Path of the ignore file under `project_root`.
#[must_use]
pub fn ignore_file_path(project_root: &Path) -> PathBuf {
    project_root.join(IGNORE_FILE)
}
