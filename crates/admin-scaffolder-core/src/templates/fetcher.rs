//! Template fetching from a remote git repository or a local directory
//!
//! - Remote: `git clone -b <branch> <url> <target>` in a child process
//! - Local: recursive copy of a checked-out template (for development use)

use crate::product::ProductConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use url::Url;
use walkdir::WalkDir;

/// Timeout for cloning the template repository
const CLONE_TIMEOUT: Duration = Duration::from_secs(120);

/// Template source - either remote git URL or local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Remote { url: Url, branch: String },
    Local(PathBuf),
}

impl TemplateSource {
    /// Create a remote template source from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.template_url_env())
            .unwrap_or_else(|_| config.default_template_url().to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid template URL: {}", url_str))?;
        Ok(Self::Remote {
            url,
            branch: config.template_branch().to_string(),
        })
    }

    /// Create a local template source from a path
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }

    /// Human-readable origin, for progress messages
    pub fn describe(&self) -> String {
        match self {
            TemplateSource::Remote { url, branch } => format!("{} ({})", url, branch),
            TemplateSource::Local(path) => path.display().to_string(),
        }
    }
}

/// Materialize the template into `target`. `target` must not exist yet.
pub async fn fetch_template(source: &TemplateSource, target: &Path) -> Result<()> {
    match source {
        TemplateSource::Remote { url, branch } => clone_repository(url, branch, target).await,
        TemplateSource::Local(path) => copy_local(path, target).await,
    }
}

/// Arguments passed to `git` for cloning
fn clone_args(url: &Url, branch: &str, target: &Path) -> Vec<String> {
    vec![
        "clone".to_string(),
        "-b".to_string(),
        branch.to_string(),
        url.to_string(),
        target.display().to_string(),
    ]
}

async fn clone_repository(url: &Url, branch: &str, target: &Path) -> Result<()> {
    let child = TokioCommand::new("git")
        .args(clone_args(url, branch, target))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .context("Failed to run git")?;

    // dropping the timed-out future kills the child (kill_on_drop)
    let output = match timeout(CLONE_TIMEOUT, child.wait_with_output()).await {
        Ok(output) => output.context("Failed to wait for git clone")?,
        Err(_) => anyhow::bail!(
            "Cloning {} timed out after {} seconds.\n\
             The server may be unreachable. Please try again later.",
            url,
            CLONE_TIMEOUT.as_secs()
        ),
    };

    if !output.status.success() {
        anyhow::bail!(
            "git clone of {} ({}) failed with exit code {}:\n{}",
            url,
            branch,
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(())
}

async fn copy_local(source: &Path, target: &Path) -> Result<()> {
    if !source.is_dir() {
        anyhow::bail!("Template directory not found: {}", source.display());
    }

    for entry in WalkDir::new(source)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
    {
        let entry = entry.with_context(|| format!("Failed to walk {}", source.display()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("{} is outside the template", entry.path().display()))?;
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            tokio::fs::create_dir_all(&dest)
                .await
                .with_context(|| format!("Failed to create directory: {}", dest.display()))?;
        } else {
            tokio::fs::copy(entry.path(), &dest)
                .await
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::testing::TestProduct;

    #[test]
    fn test_from_config_uses_default_url_and_branch() {
        let source = TemplateSource::from_config(&TestProduct).unwrap();
        match source {
            TemplateSource::Remote { url, branch } => {
                assert_eq!(url.as_str(), "https://example.com/test-admin.git");
                assert_eq!(branch, "master");
            }
            other => panic!("expected remote source, got {:?}", other),
        }
    }

    #[test]
    fn test_clone_args() {
        let url = Url::parse("https://github.com/acme/admin.git").unwrap();
        let args = clone_args(&url, "master", Path::new("/tmp/demo"));
        assert_eq!(
            args,
            vec!["clone", "-b", "master", "https://github.com/acme/admin.git", "/tmp/demo"]
        );
    }

    #[tokio::test]
    async fn test_copy_local_skips_git_dir() {
        let src = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src.path().join("src/route")).unwrap();
        std::fs::create_dir_all(src.path().join(".git")).unwrap();
        std::fs::write(src.path().join("src/route/index.ts"), "export default [];\n").unwrap();
        std::fs::write(src.path().join(".git/HEAD"), "ref: refs/heads/master\n").unwrap();

        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("demo");
        fetch_template(&TemplateSource::local(src.path().to_path_buf()), &target)
            .await
            .unwrap();

        assert!(target.join("src/route/index.ts").exists());
        assert!(!target.join(".git").exists());
    }

    #[tokio::test]
    async fn test_copy_local_missing_dir_fails() {
        let out = tempfile::tempdir().unwrap();
        let source = TemplateSource::local(out.path().join("nope"));
        assert!(fetch_template(&source, &out.path().join("demo")).await.is_err());
    }
}
