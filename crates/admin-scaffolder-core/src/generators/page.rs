//! Page creation inside one project of the admin template

use super::staging::ChangeSet;
use crate::config::ProjectLayout;
use crate::mutate::{ModelBinding, MutationRequest, RouteEntry};
use crate::naming::{capitalize_first, is_identifier, is_valid_route_name};
use crate::templates::{boilerplate, render};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Everything the user decided about the new page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPageRequest {
    /// Directory and identifier stem of the page (e.g. `orderList`)
    pub page_name: String,
    /// Project directory under the pages dir
    pub project: String,
    /// Route label shown in navigation
    pub route_name: String,
    /// Also export a state type from the project's type barrel
    pub with_type: bool,
    /// Also generate a model and register it in the model registry
    pub with_model: bool,
}

/// Outcome of planning a page
#[derive(Debug)]
pub enum PagePlan {
    /// The page directory is already there; nothing to do
    AlreadyExists(PathBuf),
    Ready(ChangeSet),
}

/// Project directories available under the pages dir, sorted by name
pub async fn list_projects(root: &Path, layout: &ProjectLayout) -> Result<Vec<String>> {
    let pages_dir = root.join(&layout.pages_dir);
    let mut entries = tokio::fs::read_dir(&pages_dir)
        .await
        .with_context(|| format!("Failed to read {}", pages_dir.display()))?;

    let mut projects = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            projects.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    projects.sort();
    Ok(projects)
}

/// Check a page name before anything is prompted or planned
pub fn validate_page_name(name: &str) -> Result<()> {
    if !is_identifier(name) {
        anyhow::bail!(
            "Invalid page name '{}': use letters, digits, '_' or '$', not starting with a digit",
            name
        );
    }
    Ok(())
}

/// Check a route label entered by the user
pub fn validate_route_name(name: &str) -> Result<()> {
    if !is_valid_route_name(name) {
        anyhow::bail!("Route name may only contain CJK characters, letters, digits and '_'");
    }
    Ok(())
}

/// Stage the page file, route entry and optional type and model registration
pub async fn plan_new_page(
    root: &Path,
    layout: &ProjectLayout,
    request: &NewPageRequest,
) -> Result<PagePlan> {
    validate_page_name(&request.page_name)?;
    validate_route_name(&request.route_name)?;

    let project_dir = root.join(&layout.pages_dir).join(&request.project);
    if !project_dir.is_dir() {
        anyhow::bail!("Project directory not found: {}", project_dir.display());
    }

    let page_dir = project_dir.join(&request.page_name);
    if page_dir.exists() {
        return Ok(PagePlan::AlreadyExists(page_dir));
    }

    let name = request.page_name.as_str();
    let file_name = capitalize_first(name);
    let mut changes = ChangeSet::new();

    // Page body
    let template = load_page_template(&root.join(&layout.page_template)).await?;
    let page = render(&template, &[("name", name), ("fileName", file_name.as_str())])
        .with_context(|| format!("Failed to render {}", layout.page_template.display()))?;
    changes.stage_create(page_dir.join(&layout.page_file), page, "page component");

    // Route table
    let route = RouteEntry::for_page(
        name,
        &request.route_name,
        &request.project,
        &layout.component_prefix,
    );
    changes
        .stage_mutation(
            &root.join(&layout.router_file),
            &MutationRequest::AddRouteEntry(route),
        )
        .await?;

    if request.with_type {
        let type_index = project_dir.join(&layout.type_index);
        changes
            .stage_mutation(
                &type_index,
                &MutationRequest::AddTypeExport {
                    module_name: name.to_string(),
                },
            )
            .await?;
        let type_dir = type_index
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project_dir.clone());
        changes.stage_create(
            type_dir.join(name).join("index.ts"),
            boilerplate::type_file(name),
            "state type",
        );
    }

    if request.with_model {
        changes
            .stage_mutation(
                &project_dir.join(&layout.models_registry),
                &MutationRequest::AddModelBinding(ModelBinding::for_model(name)),
            )
            .await?;
        changes.stage_create(
            project_dir
                .join(&layout.models_dir)
                .join(format!("{}Store.ts", name)),
            boilerplate::model_file(name),
            "model",
        );
    }

    Ok(PagePlan::Ready(changes))
}

async fn load_page_template(path: &Path) -> Result<String> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    } else {
        Ok(boilerplate::DEFAULT_PAGE_TEMPLATE.to_string())
    }
}
