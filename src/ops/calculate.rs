//! Implementation of `sourceroots calculate`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::core::{ArtifactLocation, ContentEntry, ImportRoots, SourceArtifact, TargetKey};
use crate::reader::{read_package_manifests, PackageReaderChain, ReaderDeps, ReaderKind};
use crate::resolver::{
    assemble_content_entry, build_source_roots, resolve_source_roots, route_artifacts,
    sort_content_entries, CalculateError, PrefixCalculator,
};
use crate::util::cancel::CancellationToken;
use crate::util::config::Config;
use crate::util::diagnostic::Diagnostic;
use crate::util::fs::{ArtifactResolver, FileAccess, LocalFileSystem, WorkspaceLayout};

/// Options for a calculation.
#[derive(Debug, Clone)]
pub struct CalculatorOptions {
    /// Extensions (without dot) of files whose package is resolved
    pub extensions: Vec<String>,

    /// Default prefix rules
    pub prefixes: PrefixCalculator,

    /// Package reader order
    pub readers: Vec<ReaderKind>,

    /// Number of worker threads (None = rayon default)
    pub jobs: Option<usize>,

    /// Directory generated files and manifests live under (None = workspace root)
    pub execution_root: Option<PathBuf>,
}

impl Default for CalculatorOptions {
    fn default() -> Self {
        CalculatorOptions::from_config(&Config::default())
    }
}

impl CalculatorOptions {
    /// Options described by a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        CalculatorOptions {
            extensions: config.source_extensions(),
            prefixes: PrefixCalculator::new(config.conventional_roots()),
            readers: config.readers(),
            jobs: config.resolve.jobs,
            execution_root: None,
        }
    }
}

/// Result of a calculation.
#[derive(Debug, Clone, Default)]
pub struct Calculation {
    /// One entry per import root, sorted by root directory
    pub entries: Vec<ContentEntry>,
    /// Problems met along the way
    pub diagnostics: Vec<Diagnostic>,
}

impl Calculation {
    /// Whether any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Computes content entries with explicit collaborators.
pub struct SourceDirectoryCalculator<'a> {
    files: &'a dyn FileAccess,
    resolver: &'a dyn ArtifactResolver,
    options: CalculatorOptions,
}

impl<'a> SourceDirectoryCalculator<'a> {
    pub fn new(
        files: &'a dyn FileAccess,
        resolver: &'a dyn ArtifactResolver,
        options: CalculatorOptions,
    ) -> Self {
        SourceDirectoryCalculator {
            files,
            resolver,
            options,
        }
    }

    /// Compute one content entry per import root.
    ///
    /// `workspace_root` is only used to make the output paths absolute; file
    /// access goes through the collaborators. All work runs on a dedicated
    /// pool sized by [`CalculatorOptions::jobs`].
    pub fn calculate(
        &self,
        workspace_root: &Path,
        import_roots: &ImportRoots,
        artifacts: &[SourceArtifact],
        manifests: &BTreeMap<TargetKey, ArtifactLocation>,
        cancel: &CancellationToken,
    ) -> Result<Calculation, CalculateError> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(jobs) = self.options.jobs {
            builder = builder.num_threads(jobs);
        }
        let pool = builder.build()?;

        pool.install(|| self.run(workspace_root, import_roots, artifacts, manifests, cancel))
    }

    fn run(
        &self,
        workspace_root: &Path,
        import_roots: &ImportRoots,
        artifacts: &[SourceArtifact],
        manifests: &BTreeMap<TargetKey, ArtifactLocation>,
        cancel: &CancellationToken,
    ) -> Result<Calculation, CalculateError> {
        if cancel.is_cancelled() {
            return Err(CalculateError::Cancelled);
        }

        let (index, mut diagnostics) =
            read_package_manifests(manifests, self.files, self.resolver, cancel);
        if cancel.is_cancelled() {
            return Err(CalculateError::Cancelled);
        }

        let prefixes = &self.options.prefixes;
        let chain = PackageReaderChain::from_kinds(
            &self.options.readers,
            ReaderDeps {
                manifests: &index,
                files: self.files,
                resolver: self.resolver,
                prefixes,
            },
        );

        let routed = route_artifacts(import_roots, artifacts);
        tracing::debug!(
            "routed {} artifacts to {} import roots",
            routed.values().map(Vec::len).sum::<usize>(),
            routed.len()
        );

        let per_root = routed
            .par_iter()
            .map(|(root, bucket)| {
                if cancel.is_cancelled() {
                    return Err(CalculateError::Cancelled);
                }
                let (resolved, diags) = resolve_source_roots(
                    bucket,
                    &chain,
                    &self.options.extensions,
                    prefixes,
                    cancel,
                )?;
                let records = build_source_roots(root, &resolved, prefixes);
                tracing::debug!("{}: {} source directories", root, records.len());
                Ok((assemble_content_entry(workspace_root, root, &records), diags))
            })
            .collect::<Result<Vec<_>, CalculateError>>()?;

        let mut entries = Vec::with_capacity(per_root.len());
        for (entry, diags) in per_root {
            entries.push(entry);
            diagnostics.extend(diags);
        }
        sort_content_entries(&mut entries);

        tracing::info!(
            "calculated {} content entries ({} diagnostics)",
            entries.len(),
            diagnostics.len()
        );
        Ok(Calculation {
            entries,
            diagnostics,
        })
    }
}

/// Compute content entries for a workspace on the local filesystem.
///
/// Source files resolve under `workspace_root`; generated files and
/// manifests resolve under [`CalculatorOptions::execution_root`], or the
/// workspace root when none is set.
pub fn calculate_content_entries(
    workspace_root: &Path,
    import_roots: &ImportRoots,
    artifacts: &[SourceArtifact],
    manifests: &BTreeMap<TargetKey, ArtifactLocation>,
    options: &CalculatorOptions,
    cancel: &CancellationToken,
) -> Result<Calculation, CalculateError> {
    let mut layout = WorkspaceLayout::new(workspace_root);
    if let Some(execution_root) = &options.execution_root {
        layout = layout.with_execution_root(execution_root);
    }
    SourceDirectoryCalculator::new(&LocalFileSystem, &layout, options.clone()).calculate(
        layout.workspace_root(),
        import_roots,
        artifacts,
        manifests,
        cancel,
    )
}
