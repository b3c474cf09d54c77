//! Test fixtures for common test scenarios.

use crate::core::{ArtifactLocation, ImportRoots, SourceArtifact, TargetKey, WorkspacePath};

/// Target label used by fixtures.
pub const FIXTURE_TARGET: &str = "//fake:label";

/// A workspace path; panics on invalid input.
pub fn wp(path: &str) -> WorkspacePath {
    WorkspacePath::new(path).expect("invalid workspace path")
}

/// A hand-written source file of [`FIXTURE_TARGET`].
pub fn source_artifact(relative_path: &str) -> SourceArtifact {
    SourceArtifact::new(
        TargetKey::for_plain_target(FIXTURE_TARGET),
        ArtifactLocation::source(relative_path),
    )
}

/// A generated file of [`FIXTURE_TARGET`].
pub fn generated_artifact(root_fragment: &str, relative_path: &str) -> SourceArtifact {
    SourceArtifact::new(
        TargetKey::for_plain_target(FIXTURE_TARGET),
        ArtifactLocation::generated(root_fragment, relative_path),
    )
}

/// Import roots from path strings.
pub fn import_roots(roots: &[&str], excluded: &[&str]) -> ImportRoots {
    let with_roots = roots
        .iter()
        .fold(ImportRoots::new(), |acc, root| acc.with_root(wp(root)));
    excluded
        .iter()
        .fold(with_roots, |acc, dir| acc.with_excluded(wp(dir)))
}

/// A Java file declaring `package` with one class.
pub fn java_source(package: &str, class: &str) -> String {
    format!("package {};\n public class {} {{}}", package, class)
}

/// A package manifest listing workspace sources.
pub fn manifest_json(entries: &[(&str, &str)]) -> String {
    let sources: Vec<serde_json::Value> = entries
        .iter()
        .map(|(path, package)| {
            serde_json::json!({
                "artifact_location": {"relative_path": path, "is_source": true},
                "package_string": package,
            })
        })
        .collect();
    serde_json::json!({ "sources": sources }).to_string()
}
