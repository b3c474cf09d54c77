//! Shared utilities

pub mod cancel;
pub mod config;
pub mod diagnostic;
pub mod fs;

pub use cancel::CancellationToken;
pub use config::Config;
pub use diagnostic::{Diagnostic, Severity};
pub use fs::{ArtifactResolver, FileAccess, LocalFileSystem, WorkspaceLayout};
