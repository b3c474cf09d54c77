//! Workspace-relative paths.
//!
//! A [`WorkspacePath`] is always relative to the workspace root, uses `/` as
//! separator, and has no leading, trailing or repeated separators. The empty
//! path denotes the workspace root itself.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a string is not a valid workspace-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspacePathError {
    #[error("workspace path must be relative: `{0}`")]
    Absolute(String),

    #[error("workspace path must not contain `..`: `{0}`")]
    ParentComponent(String),
}

/// A normalized workspace-relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkspacePath {
    relative: String,
}

impl WorkspacePath {
    /// Parse and normalize a relative path.
    pub fn new(path: impl AsRef<str>) -> Result<Self, WorkspacePathError> {
        let raw = path.as_ref();
        if raw.starts_with('/') {
            return Err(WorkspacePathError::Absolute(raw.to_string()));
        }

        let mut components = Vec::new();
        for component in raw.split('/') {
            match component {
                "" | "." => continue,
                ".." => return Err(WorkspacePathError::ParentComponent(raw.to_string())),
                c => components.push(c),
            }
        }

        Ok(WorkspacePath {
            relative: components.join("/"),
        })
    }

    /// The workspace root.
    pub fn root() -> Self {
        WorkspacePath::default()
    }

    /// The normalized relative path string.
    pub fn as_str(&self) -> &str {
        &self.relative
    }

    /// Whether this is the workspace root.
    pub fn is_root(&self) -> bool {
        self.relative.is_empty()
    }

    /// Path components, outermost first. The root has none.
    pub fn components(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.relative.split('/').filter(|c| !c.is_empty())
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        self.components().count()
    }

    /// Last component, `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.components().next_back()
    }

    /// Parent directory, `None` for the root.
    pub fn parent(&self) -> Option<WorkspacePath> {
        if self.is_root() {
            return None;
        }
        let parent = match self.relative.rfind('/') {
            Some(idx) => &self.relative[..idx],
            None => "",
        };
        Some(WorkspacePath {
            relative: parent.to_string(),
        })
    }

    /// Extension of the last component, if any.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() {
            None
        } else {
            Some(ext)
        }
    }

    /// Append a single component.
    pub fn join(&self, component: &str) -> WorkspacePath {
        if self.is_root() {
            WorkspacePath {
                relative: component.to_string(),
            }
        } else {
            WorkspacePath {
                relative: format!("{}/{}", self.relative, component),
            }
        }
    }

    /// Component-wise ancestor test. A path is under itself and every path is
    /// under the root.
    pub fn is_under(&self, ancestor: &WorkspacePath) -> bool {
        if ancestor.is_root() {
            return true;
        }
        match self.relative.strip_prefix(ancestor.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Components of `self` below `ancestor`, or `None` when not under it.
    pub fn components_below<'a>(&'a self, ancestor: &WorkspacePath) -> Option<Vec<&'a str>> {
        if !self.is_under(ancestor) {
            return None;
        }
        Some(self.components().skip(ancestor.depth()).collect())
    }

    /// Resolve against a workspace root directory on disk.
    pub fn to_path(&self, workspace_root: &Path) -> PathBuf {
        let mut path = workspace_root.to_path_buf();
        for component in self.components() {
            path.push(component);
        }
        path
    }
}

impl fmt::Display for WorkspacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative)
    }
}

impl FromStr for WorkspacePath {
    type Err = WorkspacePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkspacePath::new(s)
    }
}

impl Serialize for WorkspacePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.relative)
    }
}

impl<'de> Deserialize<'de> for WorkspacePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        WorkspacePath::new(&s).map_err(serde::de::Error::custom)
    }
}
