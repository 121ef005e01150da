//! Local file system adapter for file selection.

use async_trait::async_trait;
use ensemble_application::ports::file_system::{FileSystemError, FileSystemPort};
use glob::{Pattern, glob};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Directories never listed in the project tree.
const SKIPPED_DIRS: [&str; 4] = [".git", "target", "node_modules", ".ensemble"];

/// Upper bound on listed files.
const MAX_TREE_ENTRIES: usize = 2000;

/// Reads files below a project root.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a relative path onto the root, refusing anything that could
    /// leave it.
    fn resolve(&self, path: &str) -> Result<PathBuf, FileSystemError> {
        let relative = Path::new(path.trim());
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || relative.as_os_str().is_empty() {
            return Err(FileSystemError::OutsideRoot(path.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// Sorted relative paths of every file below `root`, keeping the first
    /// `limit`.
    fn list_files(root: &Path, limit: usize) -> Result<Vec<String>, FileSystemError> {
        let pattern = format!("{}/**/*", Pattern::escape(&root.display().to_string()));
        let entries = glob(&pattern).map_err(|e| FileSystemError::Io {
            path: root.display().to_string(),
            message: e.to_string(),
        })?;

        let mut files: Vec<String> = entries
            .flatten()
            .filter(|path| path.is_file())
            .filter_map(|path| {
                let relative = path.strip_prefix(root).ok()?.to_path_buf();
                let skipped = relative.components().any(|c| {
                    c.as_os_str()
                        .to_str()
                        .is_some_and(|name| SKIPPED_DIRS.contains(&name))
                });
                (!skipped).then(|| relative.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        files.sort();
        if files.len() > limit {
            warn!(
                "Project tree under {} lists only {} of {} files",
                root.display(),
                limit,
                files.len()
            );
            files.truncate(limit);
        }
        Ok(files)
    }
}

/// Render sorted relative paths as an indented tree, directories suffixed
/// with `/`.
fn render_tree(files: &[String]) -> String {
    let mut out = String::new();
    let mut previous: Vec<&str> = Vec::new();

    for file in files {
        let parts: Vec<&str> = file.split('/').collect();
        let (dirs, name) = parts.split_at(parts.len() - 1);
        let shared = dirs
            .iter()
            .zip(previous.iter())
            .take_while(|(a, b)| a == b)
            .count();
        for (depth, dir) in dirs.iter().enumerate().skip(shared) {
            out.push_str(&"  ".repeat(depth));
            out.push_str(dir);
            out.push_str("/\n");
        }
        out.push_str(&"  ".repeat(dirs.len()));
        out.push_str(name[0]);
        out.push('\n');
        previous = dirs.to_vec();
    }
    out
}

#[async_trait]
impl FileSystemPort for LocalFileSystem {
    async fn read_file(&self, path: &str) -> Result<String, FileSystemError> {
        let full = self.resolve(path)?;
        debug!("Reading {}", full.display());
        tokio::fs::read_to_string(&full).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FileSystemError::NotFound(path.to_string())
            } else {
                FileSystemError::Io {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    async fn file_tree(&self) -> Result<String, FileSystemError> {
        let root = self.root.clone();
        let files = tokio::task::spawn_blocking(move || Self::list_files(&root, MAX_TREE_ENTRIES))
            .await
            .map_err(|e| FileSystemError::Io {
                path: self.root.display().to_string(),
                message: e.to_string(),
            })??;
        debug!("Listed {} files under {}", files.len(), self.root.display());
        Ok(render_tree(&files))
    }
}
