//! Per-file package resolution.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::core::{SourceArtifact, WorkspacePath};
use crate::reader::PackageReaderChain;
use crate::resolver::errors::CalculateError;
use crate::resolver::prefix::PrefixCalculator;
use crate::resolver::{most_common, SourceRoot};
use crate::util::cancel::CancellationToken;
use crate::util::diagnostic::Diagnostic;

struct FileOutcome {
    resolved: Option<(WorkspacePath, String)>,
    diagnostics: Vec<Diagnostic>,
}

fn is_source_like(path: &WorkspacePath, extensions: &[String]) -> bool {
    path.extension()
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

fn resolve_file(
    artifact: &SourceArtifact,
    chain: &PackageReaderChain<'_>,
    prefixes: &PrefixCalculator,
) -> FileOutcome {
    let mut diagnostics = Vec::new();
    let directory = match artifact.artifact_location.workspace_path() {
        Ok(path) => path.parent().unwrap_or_else(WorkspacePath::root),
        Err(e) => {
            diagnostics.push(Diagnostic::error(e.to_string()));
            return FileOutcome {
                resolved: None,
                diagnostics,
            };
        }
    };

    let resolved = match chain.resolve_declared_package(artifact, &mut diagnostics) {
        Ok(Some(package)) => Some((directory, package)),
        Ok(None) => {
            let package = prefixes.prefix_of(&directory);
            Some((directory, package))
        }
        Err(e) => {
            tracing::debug!("dropping {}: {}", artifact.relative_path(), e);
            diagnostics.push(e.to_diagnostic());
            None
        }
    };
    FileOutcome {
        resolved,
        diagnostics,
    }
}

/// Resolve the package of every source-like file in `artifacts` and collapse
/// the answers to one prefix per directory.
///
/// Files whose extension is not in `extensions` are ignored. A file that
/// cannot be read is left out with a diagnostic. Directories with competing
/// answers take the majority; ties prefer the directory's default prefix,
/// then the lexicographically smallest candidate.
///
/// Runs on the current rayon pool and returns [`CalculateError::Cancelled`]
/// once `cancel` is raised.
pub fn resolve_source_roots(
    artifacts: &[&SourceArtifact],
    chain: &PackageReaderChain<'_>,
    extensions: &[String],
    prefixes: &PrefixCalculator,
    cancel: &CancellationToken,
) -> Result<(Vec<SourceRoot>, Vec<Diagnostic>), CalculateError> {
    let sources: Vec<&SourceArtifact> = artifacts
        .iter()
        .copied()
        .filter(|artifact| {
            artifact
                .artifact_location
                .workspace_path()
                .map_or(true, |path| is_source_like(&path, extensions))
        })
        .collect();

    let outcomes: Vec<Option<FileOutcome>> = sources
        .par_iter()
        .map(|artifact| {
            if cancel.is_cancelled() {
                return None;
            }
            Some(resolve_file(artifact, chain, prefixes))
        })
        .collect();

    if cancel.is_cancelled() {
        return Err(CalculateError::Cancelled);
    }

    let mut diagnostics = Vec::new();
    let mut by_directory: BTreeMap<WorkspacePath, BTreeMap<String, usize>> = BTreeMap::new();
    for outcome in outcomes.into_iter().flatten() {
        diagnostics.extend(outcome.diagnostics);
        if let Some((directory, package)) = outcome.resolved {
            *by_directory
                .entry(directory)
                .or_default()
                .entry(package)
                .or_insert(0) += 1;
        }
    }

    let roots = by_directory
        .into_iter()
        .filter_map(|(directory, counts)| {
            let default = prefixes.prefix_of(&directory);
            let chosen = most_common(&counts, &default)?.to_string();
            if counts.len() > 1 {
                tracing::debug!(
                    "competing packages in {}: {:?}, using `{}`",
                    directory,
                    counts,
                    chosen
                );
            }
            Some(SourceRoot::new(directory, chosen))
        })
        .collect();
    Ok((roots, diagnostics))
}
