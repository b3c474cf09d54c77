//! Assigns source artifacts to import roots.

use std::collections::BTreeMap;

use crate::core::{ImportRoots, SourceArtifact, WorkspacePath};

/// Bucket `artifacts` by the deepest import root containing them.
///
/// Generated files, excluded files and files under no root are dropped. Every
/// import root is present in the result, possibly with an empty bucket, and no
/// artifact lands in two buckets.
pub fn route_artifacts<'a>(
    import_roots: &ImportRoots,
    artifacts: &'a [SourceArtifact],
) -> BTreeMap<WorkspacePath, Vec<&'a SourceArtifact>> {
    let mut buckets: BTreeMap<WorkspacePath, Vec<&'a SourceArtifact>> = import_roots
        .roots()
        .iter()
        .map(|root| (root.clone(), Vec::new()))
        .collect();

    for artifact in artifacts {
        if !artifact.is_source() {
            continue;
        }
        let path = match artifact.artifact_location.workspace_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("ignoring {}: {}", artifact.relative_path(), e);
                continue;
            }
        };
        if import_roots.is_excluded(&path) {
            continue;
        }
        match import_roots.owning_root(&path) {
            Some(root) => {
                if let Some(bucket) = buckets.get_mut(root) {
                    bucket.push(artifact);
                }
            }
            None => tracing::debug!("{} is outside every import root", path),
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ArtifactLocation, TargetKey};

    fn wp(s: &str) -> WorkspacePath {
        WorkspacePath::new(s).unwrap()
    }

    fn source(path: &str) -> SourceArtifact {
        SourceArtifact::new(
            TargetKey::for_plain_target("//x"),
            ArtifactLocation::source(path),
        )
    }

    fn routed_paths(
        buckets: &BTreeMap<WorkspacePath, Vec<&SourceArtifact>>,
        root: &str,
    ) -> Vec<String> {
        buckets[&wp(root)]
            .iter()
            .map(|a| a.relative_path().to_string())
            .collect()
    }

    #[test]
    fn test_deepest_root_wins() {
        let roots = ImportRoots::new()
            .with_root(wp("java"))
            .with_root(wp("java/com/google/nested"));
        let artifacts = vec![
            source("java/com/A.java"),
            source("java/com/google/nested/B.java"),
        ];
        let buckets = route_artifacts(&roots, &artifacts);
        assert_eq!(routed_paths(&buckets, "java"), vec!["java/com/A.java"]);
        assert_eq!(
            routed_paths(&buckets, "java/com/google/nested"),
            vec!["java/com/google/nested/B.java"]
        );
    }

    #[test]
    fn test_drops_generated_excluded_and_outside() {
        let roots = ImportRoots::new()
            .with_root(wp(""))
            .with_excluded(wp("excluded"));
        let artifacts = vec![
            source("included/src/A.java"),
            source("excluded/src/B.java"),
            SourceArtifact::new(
                TargetKey::for_plain_target("//x"),
                ArtifactLocation::generated("bazel-out/bin", "included/Gen.java"),
            ),
        ];
        let buckets = route_artifacts(&roots, &artifacts);
        assert_eq!(routed_paths(&buckets, ""), vec!["included/src/A.java"]);

        let roots = ImportRoots::new().with_root(wp("java/com/google/my"));
        let artifacts = vec![source("java/com/facebook/Bla.java")];
        let buckets = route_artifacts(&roots, &artifacts);
        assert_eq!(buckets.len(), 1);
        assert!(buckets[&wp("java/com/google/my")].is_empty());
    }

    #[test]
    fn test_exclusion_above_root_is_ignored() {
        let roots = ImportRoots::new()
            .with_root(wp("third_party/lib/java"))
            .with_excluded(wp("third_party"));
        let artifacts = vec![source("third_party/lib/java/A.java")];
        let buckets = route_artifacts(&roots, &artifacts);
        assert_eq!(
            routed_paths(&buckets, "third_party/lib/java"),
            vec!["third_party/lib/java/A.java"]
        );
    }

    #[test]
    fn test_segment_prefix_is_not_a_match() {
        let roots = ImportRoots::new().with_root(wp("java/com"));
        let artifacts = vec![source("java/company/A.java")];
        let buckets = route_artifacts(&roots, &artifacts);
        assert!(buckets[&wp("java/com")].is_empty());
    }
}
