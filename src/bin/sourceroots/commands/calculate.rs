//! `sourceroots calculate` command

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::CalculateArgs;
use sourceroots::core::{ArtifactLocation, ContentEntry, ImportRoots, SourceArtifact, TargetKey};
use sourceroots::ops::{calculate_content_entries, CalculatorOptions};
use sourceroots::util::config::{global_config_path, load_config, project_config_path};
use sourceroots::util::diagnostic::emit;
use sourceroots::util::fs::{discover_artifacts, read_to_string, relative_path};
use sourceroots::{CancellationToken, WorkspacePath};

pub fn execute(args: CalculateArgs, color: bool) -> Result<()> {
    let workspace_root = args
        .workspace
        .canonicalize()
        .with_context(|| format!("workspace not found: {}", args.workspace.display()))?;

    let config = load_config(
        global_config_path().as_deref(),
        &project_config_path(&workspace_root),
    );
    let mut options = CalculatorOptions::from_config(&config);
    if args.jobs.is_some() {
        options.jobs = args.jobs;
    }
    if let Some(execution_root) = &args.execution_root {
        let execution_root = execution_root.canonicalize().with_context(|| {
            format!("execution root not found: {}", execution_root.display())
        })?;
        options.execution_root = Some(execution_root);
    }

    let import_roots = build_import_roots(&args.roots, &args.excludes)?;

    let artifacts: Vec<SourceArtifact> = match &args.artifacts {
        Some(path) => read_json(path)?,
        None => discover_artifacts(&workspace_root, &import_roots)?,
    };
    let manifests: BTreeMap<TargetKey, ArtifactLocation> = match &args.manifests {
        Some(path) => read_json(path)?,
        None => BTreeMap::new(),
    };
    tracing::debug!(
        "{} artifacts, {} manifests",
        artifacts.len(),
        manifests.len()
    );

    let calculation = match calculate_content_entries(
        &workspace_root,
        &import_roots,
        &artifacts,
        &manifests,
        &options,
        &CancellationToken::new(),
    ) {
        Ok(calculation) => calculation,
        Err(e) => {
            emit(&e.to_diagnostic(), color);
            anyhow::bail!("source directory calculation failed");
        }
    };

    for diagnostic in &calculation.diagnostics {
        emit(diagnostic, color);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&calculation.entries)?);
    } else {
        for entry in &calculation.entries {
            print_entry(&workspace_root, entry);
        }
    }

    Ok(())
}

fn build_import_roots(roots: &[String], excludes: &[String]) -> Result<ImportRoots> {
    let mut import_roots = ImportRoots::new();
    for root in roots {
        let path = WorkspacePath::new(root).with_context(|| format!("invalid import root `{}`", root))?;
        import_roots = import_roots.with_root(path);
    }
    for dir in excludes {
        let path = WorkspacePath::new(dir)
            .with_context(|| format!("invalid excluded directory `{}`", dir))?;
        import_roots = import_roots.with_excluded(path);
    }
    Ok(import_roots)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_to_string(path)?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn display_relative(workspace_root: &Path, path: &Path) -> String {
    let relative: PathBuf = relative_path(workspace_root, path);
    if relative.as_os_str().is_empty() {
        ".".to_string()
    } else {
        relative.display().to_string()
    }
}

fn print_entry(workspace_root: &Path, entry: &ContentEntry) {
    println!("{}", display_relative(workspace_root, &entry.content_root));
    for source in &entry.sources {
        let prefix = if source.package_prefix.is_empty() {
            "(default package)"
        } else {
            source.package_prefix.as_str()
        };
        println!(
            "    {} -> {}",
            display_relative(workspace_root, &source.directory),
            prefix
        );
    }
}
