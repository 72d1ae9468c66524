//! Project creation: materialize the template, then point it at the new project

use super::staging::ChangeSet;
use crate::config::ProjectLayout;
use crate::mutate::MutationRequest;
use anyhow::{Context, Result};
use std::path::Path;

/// Name of the environment file written into a new project
pub const ENV_FILE: &str = ".env";

/// Body of the project's `.env`
pub fn env_file(project_name: &str) -> String {
    format!("PROJECT = {}", project_name)
}

/// Remove an existing target directory (used with `--force` or after the user agreed)
pub async fn clear_target(target: &Path) -> Result<()> {
    if tokio::fs::try_exists(target).await.unwrap_or(false) {
        tokio::fs::remove_dir_all(target)
            .await
            .with_context(|| format!("Failed to remove {}", target.display()))?;
    }
    Ok(())
}

/// Stage the edits that turn a freshly fetched template into `project_name`.
///
/// The layout is read from the template itself so templates can move their route table.
pub async fn plan_project_setup(project_dir: &Path, project_name: &str) -> Result<ChangeSet> {
    let layout = ProjectLayout::load(project_dir).await?;
    let mut changes = ChangeSet::new();

    changes.stage_create(
        project_dir.join(ENV_FILE),
        env_file(project_name),
        "project environment",
    );

    let request = MutationRequest::ReplaceComponentPath {
        new_path: layout.default_component.clone(),
    };
    changes
        .stage_mutation(&project_dir.join(&layout.project_route_file), &request)
        .await?;

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_file() {
        assert_eq!(env_file("sales"), "PROJECT = sales");
    }

    #[tokio::test]
    async fn test_plan_project_setup() {
        let dir = tempfile::tempdir().unwrap();
        let route = dir.path().join("src/route/index.ts");
        std::fs::create_dir_all(route.parent().unwrap()).unwrap();
        std::fs::write(
            &route,
            "export default [\n  { path: '/', component: '@/pages/demo' },\n];\n",
        )
        .unwrap();

        let changes = plan_project_setup(dir.path(), "sales").await.unwrap();
        // nothing on disk changes before commit
        assert!(!dir.path().join(ENV_FILE).exists());

        changes.commit().await.unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join(ENV_FILE)).unwrap(),
            "PROJECT = sales"
        );
        assert!(std::fs::read_to_string(&route)
            .unwrap()
            .contains("component: '@/pages/adjustTheRecord'"));
    }

    #[tokio::test]
    async fn test_plan_project_setup_without_route_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(plan_project_setup(dir.path(), "sales").await.is_err());
    }

    #[tokio::test]
    async fn test_clear_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("demo");
        std::fs::create_dir_all(target.join("src")).unwrap();

        clear_target(&target).await.unwrap();
        assert!(!target.exists());
        // a missing target is fine
        clear_target(&target).await.unwrap();
    }
}
