//! Project file commands: `new`, `add` and `run`.

use anyhow::{bail, Context, Result};
use clap::Args;
use grillage_core::calculations::{CalculationItem, CalculationOutput, GirderSpacingInput};
use grillage_core::file_io::{load_project, save_project, ProjectLock};
use grillage_core::project::Project;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::calc::DeckArgs;
use crate::output::{render_json, render_number, render_table, OutputFormat, Report};

/// Create a project file
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Project file to create (.gsp)
    pub file: PathBuf,

    /// Responsible engineer
    #[arg(long, default_value = "")]
    pub engineer: String,

    /// Job number
    #[arg(long, default_value = "")]
    pub job: String,

    /// Client name
    #[arg(long, default_value = "")]
    pub client: String,

    /// Replace an existing file
    #[arg(long)]
    pub force: bool,
}

/// Append a calculation to a project
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Project file (.gsp)
    pub file: PathBuf,

    /// Label for the new layout
    #[arg(short, long)]
    pub label: String,

    /// JSON input file to start from
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub deck: DeckArgs,

    /// User recorded in the lock file (defaults to $USER)
    #[arg(long)]
    pub user: Option<String>,
}

/// Evaluate every calculation in a project
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Project file (.gsp)
    pub file: PathBuf,

    /// Only calculate the layout with this label
    #[arg(long)]
    pub layout: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

fn current_user(explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var("USER").ok())
        .or_else(|| std::env::var("USERNAME").ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Create a project holding one default layout
pub fn execute_new(args: NewArgs) -> Result<()> {
    if args.file.exists() && !args.force {
        bail!("{} already exists (use --force to replace it)", args.file.display());
    }

    let mut project = Project::new(args.engineer, args.job, args.client);
    project.add_layout(CalculationItem::GirderSpacing(GirderSpacingInput::default()))?;
    save_project(&project, &args.file).with_context(|| format!("cannot write {}", args.file.display()))?;

    info!(path = %args.file.display(), "project created");
    println!("Created {}", args.file.display());
    Ok(())
}

/// Add a layout under the project lock. The layout is validated first so
/// a broken deck never reaches the file.
pub fn execute_add(args: AddArgs) -> Result<()> {
    let mut input = args.deck.resolve(args.input.as_ref())?;
    input.label = args.label;
    grillage_core::calculations::girder_spacing::calculate(&input)
        .with_context(|| format!("layout '{}' is not valid", input.label))?;

    let id = add_to_project(&args.file, input, &current_user(args.user.as_deref()))?;
    println!("Added {} to {}", id, args.file.display());
    Ok(())
}

fn add_to_project(path: &Path, input: GirderSpacingInput, user: &str) -> Result<String> {
    let _lock = ProjectLock::acquire(path, user)?;
    let mut project = load_project(path).with_context(|| format!("cannot open {}", path.display()))?;
    let id = project.add_layout(CalculationItem::GirderSpacing(input))?;
    save_project(&project, path)?;
    info!(path = %path.display(), %id, "layout added");
    Ok(id.to_string())
}

/// Run every layout (or the one named by `--layout`); fails if any layout
/// fails, after reporting all of them
pub fn execute_run(args: RunArgs) -> Result<()> {
    let project = load_project(&args.file).with_context(|| format!("cannot open {}", args.file.display()))?;
    if let Some(holder) = ProjectLock::holder_of(&args.file) {
        warn!(user = %holder.user, pid = holder.pid, "project is being edited; results may be stale");
    }

    let outcomes = match &args.layout {
        Some(label) => vec![project.run_one(label)?],
        None => project.run_all(),
    };
    let mut failures = 0;
    let mut reports = Vec::new();

    for outcome in &outcomes {
        let CalculationItem::GirderSpacing(input) = &outcome.layout.item;
        let label = input.label.as_str();
        let (result, error) = match &outcome.result {
            Ok(CalculationOutput::GirderSpacing(result)) => (Some(result), None),
            Err(e) => {
                failures += 1;
                (None, Some(e))
            }
        };

        match args.format {
            OutputFormat::Json => reports.push(Report {
                label,
                input,
                result,
                error,
            }),
            OutputFormat::Number => match (result, error) {
                (Some(r), _) => println!("{}\t{}", label, render_number(r)),
                (_, Some(e)) => println!("{}\tERROR {}", label, e),
                _ => {}
            },
            OutputFormat::Table => match (result, error) {
                (Some(r), _) => println!("{}", render_table(input, r)),
                (_, Some(e)) => println!("{}: {}\n", label, e),
                _ => {}
            },
        }
    }

    if args.format == OutputFormat::Json {
        println!("{}", render_json(&reports)?);
    }

    if failures > 0 {
        bail!("{} of {} layouts failed", failures, outcomes.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_project(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("grillage_cli_{}_{}.gsp", name, std::process::id()))
    }

    fn cleanup(path: &Path) {
        let _ = fs::remove_file(path);
        let mut lock = path.as_os_str().to_owned();
        lock.push(".lock");
        let _ = fs::remove_file(PathBuf::from(lock));
    }

    fn layout(label: &str) -> GirderSpacingInput {
        GirderSpacingInput {
            label: label.to_string(),
            ..GirderSpacingInput::default()
        }
    }

    #[test]
    fn test_new_refuses_overwrite() {
        let path = temp_project("new");
        let args = || NewArgs {
            file: path.clone(),
            engineer: "E".to_string(),
            job: "J".to_string(),
            client: "C".to_string(),
            force: false,
        };

        execute_new(args()).unwrap();
        assert!(execute_new(args()).is_err());

        let project = load_project(&path).unwrap();
        assert_eq!(project.layouts.len(), 1);
        assert_eq!(project.meta.job_id, "J");
        cleanup(&path);
    }

    #[test]
    fn test_add_appends_and_releases_lock() {
        let path = temp_project("add");
        save_project(&Project::new("E", "J", "C"), &path).unwrap();

        add_to_project(&path, layout("Option B"), "tester").unwrap();

        let project = load_project(&path).unwrap();
        assert!(project.layout("Option B").is_some());
        assert!(ProjectLock::holder_of(&path).is_none());
        cleanup(&path);
    }

    #[test]
    fn test_add_while_locked_leaves_file_alone() {
        let path = temp_project("add_locked");
        save_project(&Project::new("E", "J", "C"), &path).unwrap();
        let _held = ProjectLock::acquire(&path, "alice").unwrap();

        let err = add_to_project(&path, layout("Option C"), "bob").unwrap_err();
        assert!(err.to_string().contains("alice"));
        assert!(load_project(&path).unwrap().layouts.is_empty());

        drop(_held);
        cleanup(&path);
    }

    #[test]
    fn test_add_duplicate_label_fails() {
        let path = temp_project("add_dup");
        save_project(&Project::new("E", "J", "C"), &path).unwrap();

        add_to_project(&path, layout("Option A"), "tester").unwrap();
        assert!(add_to_project(&path, layout("Option A"), "tester").is_err());
        assert_eq!(load_project(&path).unwrap().layouts.len(), 1);
        cleanup(&path);
    }

    #[test]
    fn test_run_reports_failures() {
        let path = temp_project("run");
        let mut project = Project::new("E", "J", "C");
        let mut bad = layout("Too many");
        bad.path.girder_count = 500;
        project.add_layout(CalculationItem::GirderSpacing(bad)).unwrap();
        project.add_layout(CalculationItem::GirderSpacing(layout("Fine"))).unwrap();
        save_project(&project, &path).unwrap();

        let run = |layout: Option<&str>| {
            execute_run(RunArgs {
                file: path.clone(),
                layout: layout.map(str::to_string),
                format: OutputFormat::Number,
            })
        };

        let err = run(None).unwrap_err();
        assert!(err.to_string().contains("1 of 2"));
        assert!(run(Some("Fine")).is_ok());
        assert!(run(Some("Missing")).is_err());
        cleanup(&path);
    }

    #[test]
    fn test_current_user_prefers_explicit() {
        assert_eq!(current_user(Some("alice")), "alice");
    }
}
