//! Build artifacts as reported by the build graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::workspace_path::{WorkspacePath, WorkspacePathError};

/// Identifies the build target that produced an artifact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetKey {
    label: String,
}

impl TargetKey {
    /// Key for a plain (unconfigured) target label such as `//java/com/foo:lib`.
    pub fn for_plain_target(label: impl Into<String>) -> Self {
        TargetKey {
            label: label.into(),
        }
    }

    /// The target label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Location of an artifact, relative to the workspace or the execution root.
///
/// Equality covers every field, so two locations naming the same relative path
/// under different output roots are distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactLocation {
    /// Path relative to the workspace (sources) or the output root (generated)
    pub relative_path: String,

    /// Output root fragment, empty for workspace-native files
    #[serde(default)]
    pub root_execution_path_fragment: String,

    /// False for generated files
    #[serde(default = "default_is_source")]
    pub is_source: bool,

    /// True for files from external repositories
    #[serde(default)]
    pub is_external: bool,
}

fn default_is_source() -> bool {
    true
}

impl ArtifactLocation {
    /// A workspace source file.
    pub fn source(relative_path: impl Into<String>) -> Self {
        ArtifactLocation {
            relative_path: relative_path.into(),
            root_execution_path_fragment: String::new(),
            is_source: true,
            is_external: false,
        }
    }

    /// A generated file under an output root such as `bazel-out/k8-fastbuild/bin`.
    pub fn generated(root_fragment: impl Into<String>, relative_path: impl Into<String>) -> Self {
        ArtifactLocation {
            relative_path: relative_path.into(),
            root_execution_path_fragment: root_fragment.into(),
            is_source: false,
            is_external: false,
        }
    }

    /// Mark the location as coming from an external repository.
    pub fn external(mut self) -> Self {
        self.is_external = true;
        self
    }

    /// The relative path as a normalized workspace path.
    pub fn workspace_path(&self) -> Result<WorkspacePath, WorkspacePathError> {
        WorkspacePath::new(&self.relative_path)
    }
}

/// A source file attributed to the target that lists it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceArtifact {
    /// Target listing the file
    pub originating_target: TargetKey,
    /// Where the file lives
    pub artifact_location: ArtifactLocation,
}

impl SourceArtifact {
    /// Create a new source artifact.
    pub fn new(originating_target: TargetKey, artifact_location: ArtifactLocation) -> Self {
        SourceArtifact {
            originating_target,
            artifact_location,
        }
    }

    /// Whether the file is hand-written (as opposed to generated).
    pub fn is_source(&self) -> bool {
        self.artifact_location.is_source
    }

    /// Workspace-relative path of the file.
    pub fn relative_path(&self) -> &str {
        &self.artifact_location.relative_path
    }
}
