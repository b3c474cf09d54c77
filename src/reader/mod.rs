//! Package readers.
//!
//! A [`PackageReader`] maps a source artifact to the package it declares.
//! Readers are tried in order by a [`PackageReaderChain`]; the first one that
//! knows the answer wins:
//!
//! 1. [`ManifestReader`] - build-system package manifests (authoritative)
//! 2. [`SourceScanReader`] - the `package` line of the file itself
//! 3. [`PathDerivedReader`] - the directory layout (never fails)

pub mod manifest;
pub mod path_derived;
pub mod source_scan;

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{SourceArtifact, WorkspacePathError};
use crate::resolver::PrefixCalculator;
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs::{ArtifactResolver, FileAccess};

pub use manifest::{read_package_manifests, ManifestError, ManifestReader, PackageManifestIndex};
pub use path_derived::PathDerivedReader;
pub use source_scan::{parse_package_declaration, SourceScanReader};

/// Error reading a single source file.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("source file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    InvalidPath(#[from] WorkspacePathError),
}

impl ReadError {
    /// Classify an I/O error for `path`.
    pub fn from_io(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            ReadError::NotFound { path }
        } else {
            ReadError::Io { path, source }
        }
    }

    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ReadError::NotFound { path } => Diagnostic::warning("source file not found")
                .with_location(path)
                .with_context("the file is left out of source directory calculation")
                .with_suggestion(suggestions::MISSING_SOURCE),
            ReadError::Io { path, source } => {
                Diagnostic::error(format!("failed to read source file: {}", source))
                    .with_location(path)
                    .with_context("the file is left out of source directory calculation")
            }
            ReadError::InvalidPath(err) => Diagnostic::error(err.to_string()),
        }
    }
}

/// Maps a source artifact to its declared package.
pub trait PackageReader: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// The declared package, `Ok(None)` when this reader cannot tell.
    ///
    /// Recoverable findings (such as a file without a declaration) are pushed
    /// to `diagnostics`; they do not stop the chain.
    fn read_package(
        &self,
        artifact: &SourceArtifact,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Option<String>, ReadError>;
}

/// The reader strategies, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReaderKind {
    /// Build-system package manifests
    #[serde(rename = "manifest")]
    Manifest,
    /// `package` line of the source file
    #[serde(rename = "source")]
    SourceScan,
    /// Directory layout
    #[serde(rename = "path")]
    PathDerived,
}

impl ReaderKind {
    /// Default chain order.
    pub const DEFAULT_ORDER: [ReaderKind; 3] = [
        ReaderKind::Manifest,
        ReaderKind::SourceScan,
        ReaderKind::PathDerived,
    ];
}

/// Collaborators the built-in readers need.
#[derive(Clone, Copy)]
pub struct ReaderDeps<'a> {
    /// Precomputed manifest lookup table
    pub manifests: &'a PackageManifestIndex,
    /// File contents
    pub files: &'a dyn FileAccess,
    /// Artifact location to local path
    pub resolver: &'a dyn ArtifactResolver,
    /// Default prefixes
    pub prefixes: &'a PrefixCalculator,
}

/// Ordered readers; the first known package wins.
#[derive(Default)]
pub struct PackageReaderChain<'a> {
    readers: Vec<Box<dyn PackageReader + 'a>>,
}

impl<'a> PackageReaderChain<'a> {
    /// Create an empty chain.
    pub fn new() -> Self {
        PackageReaderChain {
            readers: Vec::new(),
        }
    }

    /// Build the chain for the given reader order.
    pub fn from_kinds(kinds: &[ReaderKind], deps: ReaderDeps<'a>) -> Self {
        let mut chain = PackageReaderChain::new();
        for kind in kinds {
            chain = match kind {
                ReaderKind::Manifest => chain.with_reader(ManifestReader::new(deps.manifests)),
                ReaderKind::SourceScan => {
                    chain.with_reader(SourceScanReader::new(deps.files, deps.resolver))
                }
                ReaderKind::PathDerived => {
                    chain.with_reader(PathDerivedReader::new(deps.prefixes))
                }
            };
        }
        chain
    }

    /// Append a reader with the lowest priority so far.
    pub fn with_reader(mut self, reader: impl PackageReader + 'a) -> Self {
        self.readers.push(Box::new(reader));
        self
    }

    /// Number of readers.
    pub fn len(&self) -> usize {
        self.readers.len()
    }

    /// Whether the chain has no readers.
    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    /// Ask each reader in turn. An error ends the chain.
    pub fn resolve_declared_package(
        &self,
        artifact: &SourceArtifact,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Option<String>, ReadError> {
        for reader in &self.readers {
            if let Some(package) = reader.read_package(artifact, diagnostics)? {
                tracing::trace!(
                    "{} -> `{}` ({})",
                    artifact.relative_path(),
                    package,
                    reader.name()
                );
                return Ok(Some(package));
            }
        }
        Ok(None)
    }
}
