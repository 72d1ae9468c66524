//! Clown Admin CLI - Project and page scaffolding for Clown Admin

use admin_scaffolder_core::tui::{CreateArgs, NewPageArgs};
use admin_scaffolder_core::ProductConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Clown Admin product configuration
#[derive(Clone)]
pub struct ClownAdminConfig;

impl ProductConfig for ClownAdminConfig {
    fn name(&self) -> &'static str {
        "clown-admin"
    }

    fn display_name(&self) -> &'static str {
        "Clown Admin"
    }

    fn default_template_url(&self) -> &'static str {
        "https://github.com/UniqueCrownClown/clown-admin.git"
    }

    fn template_url_env(&self) -> &'static str {
        "CLOWN_ADMIN_TEMPLATE_URL"
    }

    fn docs_url(&self) -> &'static str {
        "https://github.com/UniqueCrownClown/clown-admin"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding Clown Admin projects and pages"
    }

    fn next_steps(&self, dir: &Path) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }
        steps.push("npm install".to_string());
        steps.push("npm run dev".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "admin-tools")]
#[command(about = "CLI for scaffolding Clown Admin projects and pages")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project from the admin template
    Create(CliCreateArgs),
    /// Add a page to a project of the current admin repository
    NewPage(CliNewPageArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Project directory to create
    pub name: String,

    /// Replace the directory if it already exists
    #[arg(short, long)]
    pub force: bool,

    /// Local directory to use as template instead of cloning the remote (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            name: args.name,
            force: args.force,
            template_dir: args.template_dir,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliNewPageArgs {
    /// Page name (letters, digits, '_' or '$')
    pub name: String,

    /// Project to add the page to
    #[arg(short, long)]
    pub project: Option<String>,

    /// Route name shown in navigation
    #[arg(short, long = "route-name")]
    pub route_name: Option<String>,

    /// Also export a state type for the page
    #[arg(long = "with-type")]
    pub with_type: bool,

    /// Also generate a model and register it
    #[arg(long = "with-model")]
    pub with_model: bool,

    /// Show the changes without writing them
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliNewPageArgs> for NewPageArgs {
    fn from(args: CliNewPageArgs) -> Self {
        NewPageArgs {
            name: args.name,
            project: args.project,
            route_name: args.route_name,
            with_type: args.with_type,
            with_model: args.with_model,
            dry_run: args.dry_run,
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = ClownAdminConfig;

    let result = match args.command {
        Command::Create(create_args) => {
            admin_scaffolder_core::create(&config, create_args.into()).await
        }
        Command::NewPage(page_args) => {
            admin_scaffolder_core::new_page(&config, page_args.into()).await
        }
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_new_page() {
        let args = Args::try_parse_from([
            "admin-tools",
            "new-page",
            "orderList",
            "-p",
            "sales",
            "--route-name",
            "订单列表",
            "--with-model",
            "--dry-run",
        ])
        .unwrap();

        let Command::NewPage(page) = args.command else {
            panic!("expected new-page");
        };
        let page: NewPageArgs = page.into();
        assert_eq!(page.name, "orderList");
        assert_eq!(page.project.as_deref(), Some("sales"));
        assert_eq!(page.route_name.as_deref(), Some("订单列表"));
        assert!(page.with_model && page.dry_run);
        assert!(!page.with_type && !page.yes);
    }

    #[test]
    fn test_parse_create() {
        let args = Args::try_parse_from(["admin-tools", "create", "demo", "--force"]).unwrap();
        let Command::Create(create) = args.command else {
            panic!("expected create");
        };
        let create: CreateArgs = create.into();
        assert_eq!(create.name, "demo");
        assert!(create.force);
        assert!(create.template_dir.is_none());
    }

    #[test]
    fn test_next_steps_end_with_dev_server() {
        let steps = ClownAdminConfig.next_steps(Path::new("/tmp/elsewhere-demo"));
        assert_eq!(steps[0], "cd /tmp/elsewhere-demo");
        assert_eq!(steps.last().map(String::as_str), Some("npm run dev"));
    }
}
