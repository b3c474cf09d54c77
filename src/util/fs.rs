//! Filesystem access.
//!
//! The calculation never touches `std::fs` directly: files are opened through
//! [`FileAccess`] and artifact locations are materialized through
//! [`ArtifactResolver`], so tests can substitute an in-memory filesystem.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::core::{ArtifactLocation, ImportRoots, SourceArtifact, TargetKey, WorkspacePath};

/// Label given to artifacts found by [`discover_artifacts`].
pub const DISCOVERED_TARGET: &str = "//:discovered";

/// Read access to files.
pub trait FileAccess: Send + Sync {
    /// Open a file for reading. Missing files fail with
    /// [`io::ErrorKind::NotFound`].
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;
}

/// [`FileAccess`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileAccess for LocalFileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        let file = fs::File::open(path)?;
        Ok(Box::new(file))
    }
}

/// Maps artifact locations to local paths.
pub trait ArtifactResolver: Send + Sync {
    /// Local path of the artifact.
    fn resolve(&self, location: &ArtifactLocation) -> PathBuf;
}

/// Resolves workspace sources under the workspace root and everything else
/// under the execution root.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    workspace_root: PathBuf,
    execution_root: PathBuf,
}

impl WorkspaceLayout {
    /// Layout whose execution root is the workspace root itself.
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        let workspace_root = workspace_root.into();
        WorkspaceLayout {
            execution_root: workspace_root.clone(),
            workspace_root,
        }
    }

    /// Set a separate execution root.
    pub fn with_execution_root(mut self, execution_root: impl Into<PathBuf>) -> Self {
        self.execution_root = execution_root.into();
        self
    }

    /// The workspace root directory.
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}

impl ArtifactResolver for WorkspaceLayout {
    fn resolve(&self, location: &ArtifactLocation) -> PathBuf {
        if location.is_source && !location.is_external {
            return self.workspace_root.join(&location.relative_path);
        }
        let mut path = self.execution_root.clone();
        if !location.root_execution_path_fragment.is_empty() {
            path.push(&location.root_execution_path_fragment);
        }
        path.push(&location.relative_path);
        path
    }
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Walk the import roots on disk and report every file as a source artifact
/// of [`DISCOVERED_TARGET`].
///
/// Excluded directories and hidden directories are not entered. The result
/// is sorted and free of duplicates.
pub fn discover_artifacts(
    workspace_root: &Path,
    import_roots: &ImportRoots,
) -> Result<Vec<SourceArtifact>> {
    let target = TargetKey::for_plain_target(DISCOVERED_TARGET);
    let mut artifacts = Vec::new();

    for root in import_roots.roots() {
        let dir = root.to_path(workspace_root);
        if !dir.is_dir() {
            tracing::warn!("import root does not exist: {}", dir.display());
            continue;
        }

        let walker = WalkDir::new(&dir).into_iter().filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            if entry.file_name().to_string_lossy().starts_with('.') {
                return false;
            }
            match workspace_relative(workspace_root, entry.path()) {
                Some(path) => !import_roots.is_excluded(&path),
                None => false,
            }
        });

        for entry in walker {
            let entry =
                entry.with_context(|| format!("failed to walk directory: {}", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(path) = workspace_relative(workspace_root, entry.path()) {
                artifacts.push(SourceArtifact::new(
                    target.clone(),
                    ArtifactLocation::source(path.as_str()),
                ));
            }
        }
    }

    artifacts.sort_by(|a, b| a.relative_path().cmp(b.relative_path()));
    artifacts.dedup();
    tracing::debug!("discovered {} files", artifacts.len());
    Ok(artifacts)
}

fn workspace_relative(workspace_root: &Path, path: &Path) -> Option<WorkspacePath> {
    let relative = relative_path(workspace_root, path);
    let relative = relative.to_str()?.replace('\\', "/");
    WorkspacePath::new(relative).ok()
}
