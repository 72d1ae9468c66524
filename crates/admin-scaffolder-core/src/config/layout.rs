//! Where a generated admin project keeps the files the scaffolder edits

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional layout override, read from the working directory
pub const LAYOUT_FILE: &str = "scaffold.yaml";

/// File locations inside a generated project.
///
/// Paths under "project dir" are relative to `<pages_dir>/<project>`; the others are
/// relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLayout {
    /// Directory holding one sub-directory per project
    pub pages_dir: PathBuf,

    /// Route table new pages are appended to
    pub router_file: PathBuf,

    /// Route table rewritten when a project is created
    pub project_route_file: PathBuf,

    /// Component path written into the created project's route table
    pub default_component: String,

    /// Import alias prefix of page components in route entries
    pub component_prefix: String,

    /// Page template; a built-in template is used when the file is absent
    pub page_template: PathBuf,

    /// File name of a generated page inside its directory
    pub page_file: String,

    /// Type barrel file (project dir)
    pub type_index: PathBuf,

    /// Directory of generated model files (project dir)
    pub models_dir: PathBuf,

    /// Model registry declaring `ConnectState` (project dir)
    pub models_registry: PathBuf,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            pages_dir: PathBuf::from("src/views/pages"),
            router_file: PathBuf::from("src/router/index.ts"),
            project_route_file: PathBuf::from("src/route/index.ts"),
            default_component: "@/pages/adjustTheRecord".to_string(),
            component_prefix: "@/views/pages".to_string(),
            page_template: PathBuf::from("template/page.tpl"),
            page_file: "index.vue".to_string(),
            type_index: PathBuf::from("type/index.ts"),
            models_dir: PathBuf::from("models"),
            models_registry: PathBuf::from("models/connect.d.ts"),
        }
    }
}

impl ProjectLayout {
    /// Load `scaffold.yaml` from `root`, falling back to defaults when it does not exist
    pub async fn load(root: &Path) -> Result<Self> {
        let path = root.join(LAYOUT_FILE);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let layout = ProjectLayout::from_yaml(
            "router_file: src/routes.ts\ncomponent_prefix: '@/pages'\n",
        )
        .unwrap();

        assert_eq!(layout.router_file, PathBuf::from("src/routes.ts"));
        assert_eq!(layout.component_prefix, "@/pages");
        assert_eq!(layout.pages_dir, PathBuf::from("src/views/pages"));
        assert_eq!(layout.page_file, "index.vue");
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(ProjectLayout::from_yaml("\n").unwrap(), ProjectLayout::default());
    }

    #[test]
    fn test_unknown_type_is_error() {
        assert!(ProjectLayout::from_yaml("pages_dir: [1, 2]\n").is_err());
    }

    #[tokio::test]
    async fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::load(dir.path()).await.unwrap();
        assert_eq!(layout, ProjectLayout::default());
    }

    #[tokio::test]
    async fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LAYOUT_FILE), "page_file: index.tsx\n").unwrap();

        let layout = ProjectLayout::load(dir.path()).await.unwrap();
        assert_eq!(layout.page_file, "index.tsx");
    }
}
