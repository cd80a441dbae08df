//! Speckit - the implement step of a spec-driven workflow
//!
//! Executes a feature's task list phase by phase and checks tasks off in
//! `tasks.md`.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use speckit::checklist::{render_table, scan_checklists};
use speckit::config::{ImplementConfig, SettingsLoader};
use speckit::feature::{checklists_dir, resolve_feature_dir, TASKS_FILE};
use speckit::implement::{ImplementDependencies, ImplementReport, Implementer};
use speckit::operations::{AutoConfirmation, SimulatedExecutor};
use speckit::tasks::{parse_tasks_file, plan_phases};

#[derive(Parser)]
#[command(name = "speckit")]
#[command(version)]
#[command(about = "Execute a feature's task plan and record progress in tasks.md", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full implement pipeline
    Implement {
        /// Feature directory (discovered under specs/ when omitted)
        #[arg(long, value_name = "DIR")]
        feature_dir: Option<PathBuf>,

        /// Tasks file to use instead of <feature>/tasks.md
        #[arg(long, value_name = "FILE")]
        tasks_file: Option<PathBuf>,

        /// Do not validate checklists
        #[arg(long)]
        skip_checklists: bool,

        /// Proceed past incomplete checklists without asking
        #[arg(short, long)]
        yes: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show checklist status without prompting
    Checklists {
        /// Feature directory (discovered under specs/ when omitted)
        #[arg(long, value_name = "DIR")]
        feature_dir: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show tasks grouped into phases, in execution order
    Tasks {
        /// Feature directory (discovered under specs/ when omitted)
        #[arg(long, value_name = "DIR")]
        feature_dir: Option<PathBuf>,

        /// Tasks file to use instead of <feature>/tasks.md
        #[arg(long, value_name = "FILE")]
        tasks_file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "speckit=debug,info"
    } else {
        "speckit=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Resolve project path
    let project_path = cli.project.canonicalize().unwrap_or(cli.project.clone());

    if !project_path.exists() {
        eprintln!(
            "{} Project directory does not exist: {}",
            "Error:".red().bold(),
            project_path.display()
        );
        std::process::exit(1);
    }

    match cli.command {
        Commands::Implement {
            feature_dir,
            tasks_file,
            skip_checklists,
            yes,
            json,
        } => {
            let settings = SettingsLoader::new().load(&project_path)?;
            let config = ImplementConfig::new(project_path.clone())
                .with_feature_dir(feature_dir)
                .with_tasks_file(tasks_file)
                .with_skip_checklists(skip_checklists)
                .with_quiet(json)
                .with_settings(settings);

            let mut deps = ImplementDependencies::real();
            if yes {
                deps = deps.with_confirmation(Box::new(AutoConfirmation::yes()));
            }
            if json {
                deps = deps.with_executor(Box::new(SimulatedExecutor::quiet()));
            }

            match Implementer::with_deps(config, deps).run() {
                Ok(report) if json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                Ok(report) => print_summary(&report),
                Err(e) => {
                    eprintln!("{} {}", "Error:".red().bold(), e);
                    std::process::exit(e.exit_code());
                }
            }
        }

        Commands::Checklists { feature_dir, json } => {
            let feature = locate_feature(&project_path, feature_dir.as_deref());
            let dir = checklists_dir(&feature);

            let Some(statuses) = scan_checklists(&dir)? else {
                if json {
                    println!("[]");
                } else {
                    println!(
                        "{} No checklists directory at {}",
                        "Note:".yellow(),
                        dir.display()
                    );
                }
                return Ok(());
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&statuses)?);
            } else {
                print!("{}", render_table(&statuses));
            }

            if statuses.iter().any(|s| !s.passed()) {
                std::process::exit(1);
            }
        }

        Commands::Tasks {
            feature_dir,
            tasks_file,
            json,
        } => {
            let feature = locate_feature(&project_path, feature_dir.as_deref());
            let tasks_path = match tasks_file {
                Some(path) if path.is_absolute() => path,
                Some(path) => project_path.join(path),
                None => feature.join(TASKS_FILE),
            };

            let tasks = match parse_tasks_file(&tasks_path) {
                Ok(tasks) => tasks,
                Err(e) => {
                    eprintln!("{} {}", "Error:".red().bold(), e);
                    std::process::exit(e.exit_code());
                }
            };
            let phases = plan_phases(&tasks);

            if json {
                println!("{}", serde_json::to_string_pretty(&phases)?);
                return Ok(());
            }

            if phases.is_empty() {
                println!("No unchecked tasks in {}", tasks_path.display());
                return Ok(());
            }

            for run in &phases {
                println!("\n{} {}", "Phase:".cyan().bold(), run.phase.to_string().bold());
                for id in &run.parallel {
                    println!("    {} {} [P]", "→".cyan(), id);
                }
                for id in &run.sequential {
                    println!("    {} {}", "→".cyan(), id);
                }
            }
            println!(
                "\n{} task(s) in {} phase(s)",
                tasks.len(),
                phases.len()
            );
        }
    }

    Ok(())
}

/// Resolve the feature directory or exit with an error.
fn locate_feature(project: &Path, explicit: Option<&Path>) -> PathBuf {
    let explicit = explicit.map(|dir| {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            project.join(dir)
        }
    });

    match resolve_feature_dir(explicit.as_deref(), project) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(e.exit_code());
        }
    }
}

fn print_summary(report: &ImplementReport) {
    println!();
    println!(
        "{} Implementation complete: {} task(s) in {} phase(s)",
        "OK".green().bold(),
        report.task_count(),
        report.execution.phases.len()
    );
    println!("   Feature: {}", report.feature_dir.display());

    if !report.available_docs.is_empty() {
        println!("   Available docs: {}", report.available_docs.join(", "));
    }
    if !report.setup.technologies.is_empty() {
        let names: Vec<String> = report
            .setup
            .technologies
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("   Technologies: {}", names.join(", "));
    }

    if let Some(update) = &report.update {
        println!(
            "   Checked off: {} in {}",
            update.updated.len(),
            report.tasks_file.display()
        );
        if !update.unmatched.is_empty() {
            println!(
                "   {} Not found in tasks file: {}",
                "Warning:".yellow(),
                update.unmatched.join(", ")
            );
        }
    }
    if let Some(error) = &report.update_error {
        println!(
            "   {} Tasks file not updated: {}",
            "Warning:".yellow(),
            error
        );
    }
    if let Some(warning) = &report.prerequisite_warning {
        println!(
            "   {} Prerequisites skipped: {}",
            "Warning:".yellow(),
            warning
        );
    }
}
