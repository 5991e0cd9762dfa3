// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            packages,
            repo_base,
            catalogs,
            config,
            requests,
            report,
            json,
        } => commands::cmd_resolve(
            &packages,
            &repo_base,
            &catalogs,
            config.as_deref(),
            &requests,
            report.as_deref(),
            json,
        ),
        Commands::Compare { a, b } => commands::cmd_compare(&a, &b),
        Commands::Parse { dependency } => commands::cmd_parse(&dependency),
    }
}
