//! sourceroots - source directory and package prefix inference for JVM projects
//!
//! Given the import roots of a project and the source files the build graph
//! reports, this crate works out which directories are source roots and
//! which package prefix each of them carries, keeping the list as short as
//! the directory layout allows.

pub mod core;
pub mod ops;
pub mod reader;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides an in-memory filesystem and fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    ArtifactLocation, ContentEntry, ImportRoots, SourceArtifact, SourceDirectory, TargetKey,
    WorkspacePath,
};
pub use ops::{calculate_content_entries, Calculation, CalculatorOptions, SourceDirectoryCalculator};
pub use resolver::{CalculateError, PrefixCalculator};
pub use util::{CancellationToken, Diagnostic};
