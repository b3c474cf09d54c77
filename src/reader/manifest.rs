//! Package manifests written by the build system.
//!
//! A manifest lists, for one target, the package each of its sources
//! declares:
//!
//! ```json
//! {
//!   "sources": [
//!     {
//!       "artifact_location": {"relative_path": "java/com/google/Bla.java"},
//!       "package_string": "com.google"
//!     }
//!   ]
//! }
//! ```
//!
//! All manifests are read up front into a [`PackageManifestIndex`], which is
//! then shared read-only by every [`ManifestReader`].

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{ArtifactLocation, SourceArtifact, TargetKey};
use crate::reader::{PackageReader, ReadError};
use crate::util::cancel::CancellationToken;
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs::{ArtifactResolver, FileAccess};

/// One record of a package manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaSourcePackage {
    pub artifact_location: ArtifactLocation,
    pub package_string: String,
}

#[derive(Deserialize)]
struct RawManifest {
    #[serde(default)]
    sources: Vec<serde_json::Value>,
}

/// Error reading a package manifest file.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("package manifest not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read package manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse package manifest {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ManifestError {
    /// Convert to a user-facing diagnostic. Manifest problems are never fatal.
    pub fn to_diagnostic(&self, target: &TargetKey) -> Diagnostic {
        let path = match self {
            ManifestError::NotFound { path }
            | ManifestError::Io { path, .. }
            | ManifestError::Parse { path, .. } => path,
        };
        Diagnostic::warning(self.to_string())
            .with_location(path)
            .with_context(format!("while reading the package manifest of {}", target))
            .with_suggestion(suggestions::BAD_MANIFEST)
    }
}

/// Decode a manifest document.
///
/// Records that do not decode are skipped, each with a warning diagnostic;
/// only a document that is not a manifest at all is an error.
pub fn parse_package_manifest(
    bytes: &[u8],
    origin: &Path,
) -> Result<(Vec<JavaSourcePackage>, Vec<Diagnostic>), ManifestError> {
    let raw: RawManifest = serde_json::from_slice(bytes).map_err(|source| ManifestError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;

    let mut records = Vec::with_capacity(raw.sources.len());
    let mut diagnostics = Vec::new();
    for (idx, value) in raw.sources.into_iter().enumerate() {
        match serde_json::from_value::<JavaSourcePackage>(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::debug!("skipping record {} of {}: {}", idx, origin.display(), e);
                diagnostics.push(
                    Diagnostic::warning(format!("skipping malformed manifest record {}: {}", idx, e))
                        .with_location(origin),
                );
            }
        }
    }
    Ok((records, diagnostics))
}

/// Per-target lookup table of declared packages.
#[derive(Debug, Clone, Default)]
pub struct PackageManifestIndex {
    by_target: HashMap<TargetKey, HashMap<ArtifactLocation, String>>,
}

impl PackageManifestIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        PackageManifestIndex::default()
    }

    /// Record the package of one source of `target`.
    pub fn insert(
        &mut self,
        target: TargetKey,
        location: ArtifactLocation,
        package: impl Into<String>,
    ) {
        self.by_target
            .entry(target)
            .or_default()
            .insert(location, package.into());
    }

    /// The entries of one target, if it had a manifest.
    pub fn get(&self, target: &TargetKey) -> Option<&HashMap<ArtifactLocation, String>> {
        self.by_target.get(target)
    }

    /// Package of `artifact` as listed by its originating target.
    pub fn package_for(&self, artifact: &SourceArtifact) -> Option<&str> {
        self.get(&artifact.originating_target)?
            .get(&artifact.artifact_location)
            .map(String::as_str)
    }

    /// Number of targets with a manifest.
    pub fn len(&self) -> usize {
        self.by_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }
}

fn read_one(
    files: &dyn FileAccess,
    path: &Path,
) -> Result<(Vec<JavaSourcePackage>, Vec<Diagnostic>), ManifestError> {
    let io_error = |source: std::io::Error| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ManifestError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ManifestError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    };

    let mut bytes = Vec::new();
    files
        .open(path)
        .map_err(io_error)?
        .read_to_end(&mut bytes)
        .map_err(io_error)?;
    parse_package_manifest(&bytes, path)
}

/// Read every manifest in parallel and build the index.
///
/// Runs on the current rayon pool. Once `cancel` is raised, manifests not yet
/// started are skipped; the caller is expected to discard the result.
pub fn read_package_manifests(
    manifests: &BTreeMap<TargetKey, ArtifactLocation>,
    files: &dyn FileAccess,
    resolver: &dyn ArtifactResolver,
    cancel: &CancellationToken,
) -> (PackageManifestIndex, Vec<Diagnostic>) {
    let results: Vec<_> = manifests
        .par_iter()
        .filter(|_| !cancel.is_cancelled())
        .map(|(target, location)| {
            let path = resolver.resolve(location);
            (target, read_one(files, &path))
        })
        .collect();

    let mut index = PackageManifestIndex::new();
    let mut diagnostics = Vec::new();
    for (target, result) in results {
        match result {
            Ok((records, diags)) => {
                diagnostics.extend(diags);
                let entries = index.by_target.entry(target.clone()).or_default();
                for record in records {
                    entries.insert(record.artifact_location, record.package_string);
                }
            }
            Err(e) => {
                tracing::debug!("manifest of {} unusable: {}", target, e);
                diagnostics.push(e.to_diagnostic(target));
            }
        }
    }
    tracing::debug!("read {} package manifests", index.len());
    (index, diagnostics)
}

/// Reader backed by a [`PackageManifestIndex`].
pub struct ManifestReader<'a> {
    index: &'a PackageManifestIndex,
}

impl<'a> ManifestReader<'a> {
    pub fn new(index: &'a PackageManifestIndex) -> Self {
        ManifestReader { index }
    }
}

impl PackageReader for ManifestReader<'_> {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn read_package(
        &self,
        artifact: &SourceArtifact,
        _diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Option<String>, ReadError> {
        Ok(self.index.package_for(artifact).map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{manifest_json, MockFileSystem};
    use crate::util::fs::WorkspaceLayout;

    fn manifest_location(name: &str) -> ArtifactLocation {
        ArtifactLocation::generated("bazel-out/bin", format!("{}.manifest", name))
    }

    fn artifact(target: &str, path: &str) -> SourceArtifact {
        SourceArtifact::new(
            TargetKey::for_plain_target(target),
            ArtifactLocation::source(path),
        )
    }

    #[test]
    fn test_single_manifest() {
        let mut fs = MockFileSystem::new();
        fs.add_file(
            "/root/bazel-out/bin/java/com/test.manifest",
            manifest_json(&[
                ("java/com/google/Bla.java", "com.google"),
                ("java/com/google/subpackage/Bla.java", "com.google.subpackage"),
            ]),
        );
        let layout = WorkspaceLayout::new("/root");
        let mut manifests = BTreeMap::new();
        manifests.insert(
            TargetKey::for_plain_target("//java/com:test"),
            manifest_location("java/com/test"),
        );

        let (index, diags) =
            read_package_manifests(&manifests, &fs, &layout, &CancellationToken::new());
        assert!(diags.is_empty());
        assert_eq!(index.len(), 1);
        assert_eq!(
            index.package_for(&artifact("//java/com:test", "java/com/google/subpackage/Bla.java")),
            Some("com.google.subpackage")
        );
        assert_eq!(
            index.package_for(&artifact("//java/com:other", "java/com/google/Bla.java")),
            None
        );
    }

    #[test]
    fn test_repeated_sources_keep_per_target_entries() {
        let mut fs = MockFileSystem::new();
        fs.add_file(
            "/root/bazel-out/bin/one.manifest",
            manifest_json(&[("java/com/google/Bla.java", "com.google")]),
        );
        fs.add_file(
            "/root/bazel-out/bin/two.manifest",
            manifest_json(&[("java/com/google/Bla.java", "com.google.other")]),
        );
        let layout = WorkspaceLayout::new("/root");
        let mut manifests = BTreeMap::new();
        manifests.insert(TargetKey::for_plain_target("//:one"), manifest_location("one"));
        manifests.insert(TargetKey::for_plain_target("//:two"), manifest_location("two"));

        let (index, _) =
            read_package_manifests(&manifests, &fs, &layout, &CancellationToken::new());
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.package_for(&artifact("//:one", "java/com/google/Bla.java")),
            Some("com.google")
        );
        assert_eq!(
            index.package_for(&artifact("//:two", "java/com/google/Bla.java")),
            Some("com.google.other")
        );
    }

    #[test]
    fn test_malformed_record_is_skipped() {
        let json = r#"{"sources": [
            {"artifact_location": {"relative_path": "java/A.java"}},
            {"artifact_location": {"relative_path": "java/B.java"}, "package_string": "b"}
        ]}"#;
        let (records, diags) = parse_package_manifest(json.as_bytes(), Path::new("x.manifest"))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].package_string, "b");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("malformed manifest record 0"));
    }

    #[test]
    fn test_unreadable_manifests_are_warnings() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/root/bazel-out/bin/bad.manifest", "not json");
        let layout = WorkspaceLayout::new("/root");
        let mut manifests = BTreeMap::new();
        manifests.insert(TargetKey::for_plain_target("//:bad"), manifest_location("bad"));
        manifests.insert(
            TargetKey::for_plain_target("//:missing"),
            manifest_location("missing"),
        );

        let (index, diags) =
            read_package_manifests(&manifests, &fs, &layout, &CancellationToken::new());
        assert!(index.is_empty());
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| !d.is_error()));
        assert!(diags.iter().any(|d| d.message.contains("not found")));
        assert!(diags.iter().any(|d| d.message.contains("failed to parse")));
    }

    #[test]
    fn test_cancelled_reads_nothing() {
        let mut fs = MockFileSystem::new();
        fs.add_file(
            "/root/bazel-out/bin/one.manifest",
            manifest_json(&[("java/A.java", "a")]),
        );
        let layout = WorkspaceLayout::new("/root");
        let mut manifests = BTreeMap::new();
        manifests.insert(TargetKey::for_plain_target("//:one"), manifest_location("one"));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let (index, diags) = read_package_manifests(&manifests, &fs, &layout, &cancel);
        assert!(index.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_manifest_reader() {
        let mut index = PackageManifestIndex::new();
        index.insert(
            TargetKey::for_plain_target("//:lib"),
            ArtifactLocation::source("java/A.java"),
            "com.a",
        );
        let reader = ManifestReader::new(&index);
        let mut diags = Vec::new();
        assert_eq!(
            reader
                .read_package(&artifact("//:lib", "java/A.java"), &mut diags)
                .unwrap()
                .as_deref(),
            Some("com.a")
        );
        assert_eq!(
            reader
                .read_package(&artifact("//:lib", "java/B.java"), &mut diags)
                .unwrap(),
            None
        );
    }
}
