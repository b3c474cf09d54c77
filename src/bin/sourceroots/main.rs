//! sourceroots CLI - source directory and package prefix inference

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("sourceroots=debug")
    } else {
        EnvFilter::new("sourceroots=info")
    };

    let color = !cli.no_color && std::io::stderr().is_terminal();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Calculate(args) => commands::calculate::execute(args, color),
        Commands::Prefix(args) => commands::prefix::execute(args),
    }
}
