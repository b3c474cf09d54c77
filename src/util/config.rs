//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.sourceroots/config.toml` - User-wide defaults
//! - Project: `<workspace>/.sourceroots/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.
//!
//! ```toml
//! [sources]
//! languages = ["java", "kotlin"]
//! extra_extensions = ["aidl"]
//!
//! [prefix]
//! conventional_roots = ["java", "javatests", "kotlin"]
//!
//! [resolve]
//! jobs = 8
//! readers = ["manifest", "source", "path"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::SourceLanguage;
use crate::reader::ReaderKind;

/// Tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which files carry package declarations
    pub sources: SourcesConfig,

    /// Default prefix derivation
    pub prefix: PrefixConfig,

    /// Resolution settings
    pub resolve: ResolveConfig,
}

/// Source file selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Languages to scan (None = all supported)
    pub languages: Option<Vec<SourceLanguage>>,

    /// Additional extensions treated as source-like
    pub extra_extensions: Vec<String>,
}

/// Default prefix derivation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixConfig {
    /// Directory names that start a source tree (None = language defaults)
    pub conventional_roots: Option<Vec<String>>,
}

/// Resolution settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Worker threads for file resolution (None = auto-detect)
    pub jobs: Option<usize>,

    /// Package reader order (None = manifest, source, path)
    pub readers: Option<Vec<ReaderKind>>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.sources.languages.is_some() {
            self.sources.languages = other.sources.languages;
        }
        if !other.sources.extra_extensions.is_empty() {
            self.sources.extra_extensions = other.sources.extra_extensions;
        }

        if other.prefix.conventional_roots.is_some() {
            self.prefix.conventional_roots = other.prefix.conventional_roots;
        }

        if other.resolve.jobs.is_some() {
            self.resolve.jobs = other.resolve.jobs;
        }
        if other.resolve.readers.is_some() {
            self.resolve.readers = other.resolve.readers;
        }
    }

    /// Languages to scan.
    pub fn languages(&self) -> Vec<SourceLanguage> {
        self.sources
            .languages
            .clone()
            .unwrap_or_else(|| SourceLanguage::ALL.to_vec())
    }

    /// Extensions (without dot) of source-like files.
    pub fn source_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self
            .languages()
            .iter()
            .flat_map(|lang| lang.extensions().iter().map(|e| e.to_string()))
            .chain(
                self.sources
                    .extra_extensions
                    .iter()
                    .map(|e| e.trim_start_matches('.').to_string()),
            )
            .collect();
        extensions.sort();
        extensions.dedup();
        extensions
    }

    /// Directory names that start a conventional source tree.
    pub fn conventional_roots(&self) -> Vec<String> {
        match &self.prefix.conventional_roots {
            Some(roots) => roots.clone(),
            None => {
                let mut roots: Vec<String> = self
                    .languages()
                    .iter()
                    .flat_map(|lang| lang.conventional_roots().iter().map(|r| r.to_string()))
                    .collect();
                roots.dedup();
                roots
            }
        }
    }

    /// Package reader order.
    pub fn readers(&self) -> Vec<ReaderKind> {
        self.resolve
            .readers
            .clone()
            .unwrap_or_else(|| ReaderKind::DEFAULT_ORDER.to_vec())
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.sourceroots/config.toml)
/// 2. Global config (~/.sourceroots/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config directory (~/.sourceroots).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".sourceroots"))
}

/// Get the global config path (~/.sourceroots/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.sourceroots/config.toml).
pub fn project_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".sourceroots").join("config.toml")
}
