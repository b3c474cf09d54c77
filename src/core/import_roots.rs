//! Import roots: the directories a project imports, minus exclusions.

use serde::{Deserialize, Serialize};

use crate::core::workspace_path::WorkspacePath;

/// Root directories to scan plus directories to leave out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRoots {
    #[serde(default)]
    roots: Vec<WorkspacePath>,
    #[serde(default)]
    excluded: Vec<WorkspacePath>,
}

impl ImportRoots {
    /// Create an empty set of import roots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an import root. Duplicates are ignored and insertion order is kept.
    pub fn with_root(mut self, root: WorkspacePath) -> Self {
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
        self
    }

    /// Add an excluded directory.
    pub fn with_excluded(mut self, dir: WorkspacePath) -> Self {
        if !self.excluded.contains(&dir) {
            self.excluded.push(dir);
        }
        self
    }

    /// Import roots in insertion order.
    pub fn roots(&self) -> &[WorkspacePath] {
        &self.roots
    }

    /// The deepest import root containing `path`.
    pub fn owning_root(&self, path: &WorkspacePath) -> Option<&WorkspacePath> {
        self.roots
            .iter()
            .filter(|root| path.is_under(root))
            .max_by_key(|root| root.depth())
    }

    /// Whether `path` sits in an excluded directory.
    ///
    /// An exclusion only counts when it is at least as deep as the owning
    /// root; a root nested inside an excluded directory stays imported.
    pub fn is_excluded(&self, path: &WorkspacePath) -> bool {
        let root_depth = self.owning_root(path).map_or(0, WorkspacePath::depth);
        self.excluded
            .iter()
            .any(|dir| path.is_under(dir) && dir.depth() >= root_depth)
    }
}
