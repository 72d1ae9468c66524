//! Staged file changes, committed all-or-none
//!
//! Flows compute every file they touch in memory first. Nothing reaches the
//! disk until the whole plan succeeded, and a failing write puts back what the
//! commit already wrote.

use crate::mutate::{MutationRequest, SourceMutator};
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Whether a staged file is new or an edit of an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Modify { original: String },
}

/// One file the commit will write
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub path: PathBuf,
    pub contents: String,
    pub kind: ChangeKind,
    /// What produced this change, for progress output
    pub summary: String,
}

#[derive(Debug, Default)]
pub struct ChangeSet {
    files: Vec<StagedFile>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Stage a new file (an existing file at `path` is overwritten on commit)
    pub fn stage_create(
        &mut self,
        path: impl Into<PathBuf>,
        contents: impl Into<String>,
        summary: impl Into<String>,
    ) {
        self.files.push(StagedFile {
            path: path.into(),
            contents: contents.into(),
            kind: ChangeKind::Create,
            summary: summary.into(),
        });
    }

    /// Stage an edit of an existing file
    pub fn stage_modify(
        &mut self,
        path: impl Into<PathBuf>,
        original: impl Into<String>,
        contents: impl Into<String>,
        summary: impl Into<String>,
    ) {
        self.files.push(StagedFile {
            path: path.into(),
            contents: contents.into(),
            kind: ChangeKind::Modify {
                original: original.into(),
            },
            summary: summary.into(),
        });
    }

    /// Apply `request` to the file at `path` and stage the result.
    ///
    /// A file that is already staged is mutated from its staged contents, so
    /// several requests against one file compose.
    pub async fn stage_mutation(&mut self, path: &Path, request: &MutationRequest) -> Result<()> {
        let mutator = SourceMutator::for_path(path);

        if let Some(staged) = self.files.iter_mut().find(|f| f.path == path) {
            staged.contents = mutator
                .mutate(&staged.contents, request)
                .with_context(|| format!("Failed to {} in {}", request.describe(), path.display()))?;
            staged.summary = format!("{}, {}", staged.summary, request.describe());
            return Ok(());
        }

        let original = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let contents = mutator
            .mutate(&original, request)
            .with_context(|| format!("Failed to {} in {}", request.describe(), path.display()))?;
        self.stage_modify(path, original, contents, request.describe());
        Ok(())
    }

    /// Unified diff of every staged change, paths shown relative to `root`
    pub fn preview(&self, root: &Path) -> String {
        let mut out = String::new();
        for file in &self.files {
            let shown = file.path.strip_prefix(root).unwrap_or(&file.path);
            let original = match &file.kind {
                ChangeKind::Create => {
                    out.push_str(&format!("--- /dev/null\n+++ {}\n", shown.display()));
                    ""
                }
                ChangeKind::Modify { original } => {
                    out.push_str(&format!(
                        "--- {}\n+++ {}\n",
                        shown.display(),
                        shown.display()
                    ));
                    original.as_str()
                }
            };

            let patch = diffy::create_patch(original, &file.contents).to_string();
            // drop diffy's own file headers; ours name the real path
            for line in patch.lines().filter(|l| !l.starts_with("---") && !l.starts_with("+++")) {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    /// Write every staged file. On failure, files written so far are restored and
    /// directories the commit created are removed.
    pub async fn commit(self) -> Result<Vec<PathBuf>> {
        let mut journal = Journal::default();

        for file in &self.files {
            if let Err(e) = write_one(file, &mut journal).await {
                return Err(match journal.rollback().await {
                    Ok(()) => e.context("Failed to write files; previous contents restored"),
                    Err(restore) => e.context(format!(
                        "Failed to write files and to restore previous contents: {:#}",
                        restore
                    )),
                });
            }
        }

        Ok(journal.written.into_iter().map(|(path, _)| path).collect())
    }
}

/// What a commit changed on disk, in order
#[derive(Debug, Default)]
struct Journal {
    /// Written files with their previous bytes; `None` if the file did not exist
    written: Vec<(PathBuf, Option<Vec<u8>>)>,
    /// Outermost directory each `create_dir_all` brought into existence
    created_dirs: Vec<PathBuf>,
}

impl Journal {
    /// Undo everything recorded, newest first, and report every step that failed
    async fn rollback(&self) -> Result<()> {
        let mut failures = Vec::new();

        for (path, previous) in self.written.iter().rev() {
            let restored = match previous {
                Some(contents) => fs::write(path, contents).await,
                None => remove_missing_ok(fs::remove_file(path).await),
            };
            if let Err(e) = restored {
                failures.push(format!("{}: {}", path.display(), e));
            }
        }

        for dir in self.created_dirs.iter().rev() {
            if let Err(e) = remove_missing_ok(fs::remove_dir_all(dir).await) {
                failures.push(format!("{}: {}", dir.display(), e));
            }
        }

        if !failures.is_empty() {
            anyhow::bail!(
                "could not undo:\n{}",
                failures
                    .iter()
                    .map(|f| format!("  - {}", f))
                    .collect::<Vec<_>>()
                    .join("\n")
            );
        }
        Ok(())
    }
}

fn remove_missing_ok(result: std::io::Result<()>) -> std::io::Result<()> {
    match result {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Outermost ancestor of `dir` (itself included) that does not exist yet
async fn outermost_missing(dir: &Path) -> Option<PathBuf> {
    let mut missing = None;
    for ancestor in dir.ancestors() {
        // an unreadable ancestor counts as existing so rollback never removes it
        if ancestor.as_os_str().is_empty() || fs::try_exists(ancestor).await.unwrap_or(true) {
            break;
        }
        missing = Some(ancestor.to_path_buf());
    }
    missing
}

async fn write_one(file: &StagedFile, journal: &mut Journal) -> Result<()> {
    if let Some(parent) = file.path.parent() {
        if let Some(created) = outermost_missing(parent).await {
            journal.created_dirs.push(created);
        }
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let previous = match fs::read(&file.path).await {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read file: {}", file.path.display()))
        }
    };
    fs::write(&file.path, &file.contents)
        .await
        .with_context(|| format!("Failed to write file: {}", file.path.display()))?;
    journal.written.push((file.path.clone(), previous));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commit_writes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("type/index.ts");
        std::fs::create_dir_all(existing.parent().unwrap()).unwrap();
        std::fs::write(&existing, "export * from './a';\n").unwrap();

        let mut changes = ChangeSet::new();
        changes
            .stage_mutation(
                &existing,
                &MutationRequest::AddTypeExport {
                    module_name: "b".to_string(),
                },
            )
            .await
            .unwrap();
        changes.stage_create(dir.path().join("type/b/index.ts"), "export {};\n", "type file");

        let written = changes.commit().await.unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(
            std::fs::read_to_string(&existing).unwrap(),
            "export * from './a';\nexport * from './b';\n"
        );
        assert!(dir.path().join("type/b/index.ts").exists());
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_disk_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let registry = dir.path().join("connect.d.ts");
        let original = "export interface ConnectState {}\n";
        std::fs::write(&registry, original).unwrap();

        let mut changes = ChangeSet::new();
        changes.stage_create(dir.path().join("models/userStore.ts"), "x", "model file");
        let result = changes
            .stage_mutation(
                &registry,
                &MutationRequest::AddModelBinding(crate::mutate::ModelBinding::for_model("user")),
            )
            .await;

        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("import from '../type'"));
        assert_eq!(std::fs::read_to_string(&registry).unwrap(), original);
        assert!(!dir.path().join("models").exists());
    }

    #[tokio::test]
    async fn test_mutations_on_same_file_compose() {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join("index.ts");
        std::fs::write(&index, "").unwrap();

        let mut changes = ChangeSet::new();
        for name in ["a", "b"] {
            let request = MutationRequest::AddTypeExport {
                module_name: name.to_string(),
            };
            changes.stage_mutation(&index, &request).await.unwrap();
        }

        assert_eq!(changes.files().len(), 1);
        assert_eq!(
            changes.files()[0].contents,
            "export * from \"./a\";\nexport * from \"./b\";\n"
        );
    }

    #[tokio::test]
    async fn test_rollback_restores_written_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.ts");
        std::fs::write(&first, "old\n").unwrap();
        // a regular file where a parent directory is needed makes the last write fail
        std::fs::write(dir.path().join("blocker"), "").unwrap();

        let mut changes = ChangeSet::new();
        changes.stage_modify(&first, "old\n", "new\n", "edit");
        changes.stage_create(dir.path().join("fresh.ts"), "fresh\n", "create");
        changes.stage_create(dir.path().join("blocker/child.ts"), "x", "create");

        let err = changes.commit().await.unwrap_err();
        assert!(format!("{:#}", err).contains("previous contents restored"));
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "old\n");
        assert!(!dir.path().join("fresh.ts").exists());
    }

    #[tokio::test]
    async fn test_rollback_removes_created_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("pages")).unwrap();
        std::fs::write(dir.path().join("blocker"), "").unwrap();

        let mut changes = ChangeSet::new();
        changes.stage_create(dir.path().join("pages/report/index.vue"), "<template/>", "page");
        changes.stage_create(dir.path().join("models/deep/reportStore.ts"), "x", "model");
        changes.stage_create(dir.path().join("blocker/child.ts"), "x", "create");

        assert!(changes.commit().await.is_err());
        assert!(dir.path().join("pages").is_dir());
        assert!(!dir.path().join("pages/report").exists());
        assert!(!dir.path().join("models").exists());
    }

    #[tokio::test]
    async fn test_rollback_restores_non_utf8_file() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("logo.bin");
        let bytes = vec![0xff, 0xfe, 0x00, 0x80];
        std::fs::write(&binary, &bytes).unwrap();
        std::fs::write(dir.path().join("blocker"), "").unwrap();

        let mut changes = ChangeSet::new();
        changes.stage_create(&binary, "replaced", "overwrite");
        changes.stage_create(dir.path().join("blocker/child.ts"), "x", "create");

        assert!(changes.commit().await.is_err());
        assert_eq!(std::fs::read(&binary).unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_rollback_reports_what_it_could_not_undo() {
        assert!(Journal::default().rollback().await.is_ok());

        let dir = tempfile::tempdir().unwrap();
        let journal = Journal {
            // restoring into a missing directory fails
            written: vec![(dir.path().join("gone/file.ts"), Some(b"old".to_vec()))],
            created_dirs: Vec::new(),
        };
        let err = journal.rollback().await.unwrap_err();
        assert!(err.to_string().contains("gone/file.ts"));
    }

    #[test]
    fn test_preview_shows_paths_and_changes() {
        let root = Path::new("/project");
        let mut changes = ChangeSet::new();
        changes.stage_modify(
            root.join("type/index.ts"),
            "export * from './a';\n",
            "export * from './a';\nexport * from './b';\n",
            "export",
        );
        changes.stage_create(root.join("type/b/index.ts"), "export {};\n", "type file");

        let preview = changes.preview(root);
        assert!(preview.contains("--- type/index.ts\n+++ type/index.ts\n"));
        assert!(preview.contains("+export * from './b';"));
        assert!(preview.contains("--- /dev/null\n+++ type/b/index.ts\n"));
        assert!(preview.contains("+export {};"));
    }
}
