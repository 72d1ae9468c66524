//! Charm-style CLI prompts using cliclack

use crate::config::ProjectLayout;
use crate::generators::{self, ChangeSet, NewPageRequest, PagePlan};
use crate::product::ProductConfig;
use crate::runtime::{check_tools, require_git, Tool};
use crate::templates::{fetch_template, TemplateSource};
use anyhow::{Context, Result};
use colored::Colorize;
use std::future::Future;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project directory name, created under the current directory
    pub name: String,

    /// Replace the directory if it already exists
    pub force: bool,

    /// Local directory to use as template instead of cloning the remote
    pub template_dir: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// CLI arguments for the new-page command
#[derive(Debug, Clone, Default)]
pub struct NewPageArgs {
    /// Page name, also the stem of generated identifiers
    pub name: String,

    /// Project under the pages directory (prompted when absent)
    pub project: Option<String>,

    /// Route label (prompted when absent)
    pub route_name: Option<String>,

    /// Export a state type for the page
    pub with_type: bool,

    /// Generate and register a model for the page
    pub with_model: bool,

    /// Print the planned changes instead of writing them
    pub dry_run: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Spinner messages around one I/O step
struct StepMessages<'a> {
    loading: &'a str,
    succeeded: &'a str,
    failed: &'a str,
}

/// Run `step` behind a spinner, reporting success or failure
async fn run_step<T, F>(messages: StepMessages<'_>, step: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let spinner = cliclack::spinner();
    spinner.start(messages.loading);

    match step.await {
        Ok(value) => {
            spinner.stop(messages.succeeded);
            Ok(value)
        }
        Err(e) => {
            spinner.stop(messages.failed);
            cliclack::log::error(format!("{:#}", e))?;
            Err(e)
        }
    }
}

/// Create a project from the template
pub async fn create<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Resolve and prepare the target directory
    if args.name.is_empty() || args.name.contains(['/', '\\']) || args.name == ".." {
        anyhow::bail!("Invalid project name '{}'", args.name);
    }
    let current_dir = std::env::current_dir().context("Failed to read current directory")?;
    let target = current_dir.join(&args.name);
    if !prepare_target(&target, &args).await? {
        cliclack::outro_cancel("Setup cancelled.")?;
        return Ok(());
    }

    // Step 2: Pick the template source
    let source = match &args.template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local template from {}", path.display()))?;
            TemplateSource::local(path.clone())
        }
        None => {
            let git = require_git()?;
            if let Some(version) = git.version {
                cliclack::log::info(version)?;
            }
            TemplateSource::from_config(config)?
        }
    };

    // Step 3: Fetch the template
    run_step(
        StepMessages {
            loading: "Loading template...",
            succeeded: "Template loaded",
            failed: "Failed to load template",
        },
        fetch_template(&source, &target),
    )
    .await?;
    cliclack::log::info(format!("Fetched {}", source.describe()))?;

    // Step 4: Configure the fetched project
    let changes = match generators::plan_project_setup(&target, &args.name).await {
        Ok(changes) => changes,
        Err(e) => {
            cliclack::log::error(format!("{:#}", e))?;
            cliclack::log::warning(format!(
                "The template is in {} but was not configured",
                target.display()
            ))?;
            return Err(e);
        }
    };
    commit(changes, &target).await?;

    // Step 5: Show next steps
    print_next_steps(config, &target)?;

    Ok(())
}

/// Returns false when the user declined to overwrite an existing directory
async fn prepare_target(target: &Path, args: &CreateArgs) -> Result<bool> {
    if !target.exists() {
        return Ok(true);
    }

    let overwrite = if args.force || args.yes {
        true
    } else {
        cliclack::log::warning(format!("Directory {} already exists", target.display()))?;
        cliclack::confirm("Overwrite it?")
            .initial_value(false)
            .interact()?
    };

    if !overwrite {
        return Ok(false);
    }

    run_step(
        StepMessages {
            loading: "Removing existing directory...",
            succeeded: "Removed existing directory",
            failed: "Failed to remove existing directory",
        },
        generators::clear_target(target),
    )
    .await?;
    Ok(true)
}

/// Add a page to one of the projects in the current repository
pub async fn new_page<C: ProductConfig>(config: &C, args: NewPageArgs) -> Result<()> {
    cliclack::intro(format!("{} - new page", config.display_name()))?;

    generators::page::validate_page_name(&args.name)?;

    let root = std::env::current_dir().context("Failed to read current directory")?;
    let layout = ProjectLayout::load(&root).await?;

    // Step 1: Select the project
    let project = select_project(&root, &layout, &args).await?;

    // Step 2: Route label
    let route_name = select_route_name(&args)?;

    // Step 3: Plan every change in memory
    let request = NewPageRequest {
        page_name: args.name.clone(),
        project,
        route_name,
        with_type: args.with_type,
        with_model: args.with_model,
    };
    let plan = run_step(
        StepMessages {
            loading: "Preparing page...",
            succeeded: "Page prepared",
            failed: "Failed to prepare page",
        },
        generators::plan_new_page(&root, &layout, &request),
    )
    .await?;

    let changes = match plan {
        PagePlan::AlreadyExists(dir) => {
            cliclack::log::warning(format!(
                "Page {} already exists ({})",
                args.name.green(),
                dir.display()
            ))?;
            cliclack::outro("Nothing to do.")?;
            return Ok(());
        }
        PagePlan::Ready(changes) => changes,
    };

    // Step 4: Show or write the changes
    if args.dry_run {
        print_preview(&changes, &root);
        cliclack::outro("Dry run: no files were written.")?;
        return Ok(());
    }

    commit(changes, &root).await?;
    cliclack::outro(format!("Page {} created", args.name))?;

    Ok(())
}

async fn select_project(root: &Path, layout: &ProjectLayout, args: &NewPageArgs) -> Result<String> {
    let projects = generators::list_projects(root, layout).await?;

    if let Some(project) = &args.project {
        if !projects.contains(project) {
            anyhow::bail!(
                "Project '{}' not found. Available projects: {}",
                project,
                projects.join(", ")
            );
        }
        cliclack::log::info(format!("Using project: {}", project))?;
        return Ok(project.clone());
    }

    if projects.is_empty() {
        anyhow::bail!(
            "No projects found in {}",
            root.join(&layout.pages_dir).display()
        );
    }

    // If only one project, use it automatically
    if projects.len() == 1 {
        cliclack::log::info(format!("Using project: {}", projects[0]))?;
        return Ok(projects[0].clone());
    }

    if args.yes {
        anyhow::bail!(
            "Several projects found ({}); choose one with --project",
            projects.join(", ")
        );
    }

    let mut select = cliclack::select("Select the project to add the page to");
    for project in &projects {
        select = select.item(project.clone(), project, "");
    }
    Ok(select.interact()?)
}

fn select_route_name(args: &NewPageArgs) -> Result<String> {
    if let Some(route_name) = &args.route_name {
        generators::page::validate_route_name(route_name)?;
        return Ok(route_name.clone());
    }

    if args.yes {
        return Ok(args.name.clone());
    }

    let input: String = cliclack::input("Route name")
        .placeholder(&args.name)
        .default_input(&args.name)
        .validate(|input: &String| {
            if crate::naming::is_valid_route_name(input) {
                Ok(())
            } else {
                Err("Use CJK characters, letters, digits or '_'")
            }
        })
        .interact()?;
    Ok(input)
}

async fn commit(changes: ChangeSet, root: &Path) -> Result<()> {
    let summaries: Vec<(PathBuf, String)> = changes
        .files()
        .iter()
        .map(|f| (f.path.clone(), f.summary.clone()))
        .collect();

    run_step(
        StepMessages {
            loading: "Writing files...",
            succeeded: "Files written",
            failed: "Failed to write files",
        },
        changes.commit(),
    )
    .await?;

    for (path, summary) in summaries {
        let shown = path.strip_prefix(root).unwrap_or(&path);
        cliclack::log::success(format!("{} ({})", shown.display(), summary))?;
    }
    Ok(())
}

fn print_preview(changes: &ChangeSet, root: &Path) {
    println!();
    for line in changes.preview(root).lines() {
        if line.starts_with("---") || line.starts_with("+++") {
            println!("{}", line.bold());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
    println!();
}

fn print_next_steps<C: ProductConfig>(config: &C, project_dir: &Path) -> Result<()> {
    if let Ok(tools) = check_tools(&[], &[Tool::Node]) {
        for tool in tools.iter().filter(|t| !t.available) {
            cliclack::log::warning(format!(
                "{} was not found; it is needed to run the project",
                tool.name
            ))?;
        }
    }

    let steps = config.next_steps(project_dir);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro(format!("Docs: {}", config.docs_url()))?;

    Ok(())
}
