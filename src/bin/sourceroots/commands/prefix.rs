//! `sourceroots prefix` command

use anyhow::{Context, Result};

use crate::cli::PrefixArgs;
use sourceroots::ops::CalculatorOptions;
use sourceroots::util::config::{global_config_path, load_config, project_config_path};
use sourceroots::{PrefixCalculator, WorkspacePath};

pub fn execute(args: PrefixArgs) -> Result<()> {
    let path = WorkspacePath::new(&args.path)
        .with_context(|| format!("invalid workspace path `{}`", args.path))?;

    let calculator = if args.conventional_roots.is_empty() {
        let cwd = std::env::current_dir()?;
        let config = load_config(global_config_path().as_deref(), &project_config_path(&cwd));
        CalculatorOptions::from_config(&config).prefixes
    } else {
        PrefixCalculator::new(args.conventional_roots)
    };

    println!("{}", calculator.prefix_of(&path));
    Ok(())
}
