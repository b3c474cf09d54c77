//! Core data structures.
//!
//! This module contains the value types shared by every stage:
//! - Workspace-relative paths and import roots
//! - Source artifacts reported by the build graph
//! - The content entries handed to the project model

pub mod artifact;
pub mod content_entry;
pub mod import_roots;
pub mod language;
pub mod workspace_path;

pub use artifact::{ArtifactLocation, SourceArtifact, TargetKey};
pub use content_entry::{ContentEntry, SourceDirectory};
pub use import_roots::ImportRoots;
pub use language::SourceLanguage;
pub use workspace_path::{WorkspacePath, WorkspacePathError};
