//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// sourceroots - infer source directories and package prefixes
#[derive(Parser)]
#[command(name = "sourceroots")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Calculate source directories for a set of import roots
    Calculate(CalculateArgs),

    /// Print the default package prefix of a directory
    Prefix(PrefixArgs),
}

#[derive(Args)]
pub struct CalculateArgs {
    /// Workspace root directory
    #[arg(long, short = 'w', default_value = ".")]
    pub workspace: PathBuf,

    /// Import root, relative to the workspace (repeatable; "" or "." for the whole workspace)
    #[arg(long = "root", required = true)]
    pub roots: Vec<String>,

    /// Excluded directory, relative to the workspace (repeatable)
    #[arg(long = "exclude")]
    pub excludes: Vec<String>,

    /// JSON file listing source artifacts (default: walk the import roots)
    #[arg(long)]
    pub artifacts: Option<PathBuf>,

    /// JSON file mapping target labels to package manifest locations
    #[arg(long)]
    pub manifests: Option<PathBuf>,

    /// Directory generated files and manifests resolve under (default: the workspace)
    #[arg(long)]
    pub execution_root: Option<PathBuf>,

    /// Number of parallel jobs
    #[arg(short, long, env = "SOURCEROOTS_JOBS")]
    pub jobs: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PrefixArgs {
    /// Workspace-relative directory
    pub path: String,

    /// Conventional source root names (default: from configuration)
    #[arg(long = "conventional-root")]
    pub conventional_roots: Vec<String>,
}
