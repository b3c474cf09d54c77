//! Output model: content entries and their source directories.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A directory whose files share a package prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceDirectory {
    /// Absolute directory
    pub directory: PathBuf,
    /// Package prefix of the directory itself
    pub package_prefix: String,
    /// Whether the directory holds generated sources
    pub generated: bool,
}

impl SourceDirectory {
    /// A hand-written source directory with an empty prefix.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        SourceDirectory {
            directory: directory.into(),
            package_prefix: String::new(),
            generated: false,
        }
    }

    /// Set the package prefix.
    pub fn with_package_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.package_prefix = prefix.into();
        self
    }
}

impl Ord for SourceDirectory {
    fn cmp(&self, other: &Self) -> Ordering {
        self.directory
            .cmp(&other.directory)
            .then(self.generated.cmp(&other.generated))
            .then_with(|| self.package_prefix.cmp(&other.package_prefix))
    }
}

impl PartialOrd for SourceDirectory {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// All source directories of one import root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentEntry {
    /// Absolute import root directory
    pub content_root: PathBuf,
    /// Source directories, sorted
    pub sources: Vec<SourceDirectory>,
}

impl ContentEntry {
    /// Create an entry; the sources are sorted.
    pub fn new(content_root: impl Into<PathBuf>, mut sources: Vec<SourceDirectory>) -> Self {
        sources.sort();
        ContentEntry {
            content_root: content_root.into(),
            sources,
        }
    }

    /// The source directory registered for `dir`, if any.
    pub fn source_for(&self, dir: &Path) -> Option<&SourceDirectory> {
        self.sources.iter().find(|s| s.directory == dir)
    }
}
