// src/cli.rs
//! CLI definitions for debsolve
//!
//! The command implementations live in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "debsolve")]
#[command(version)]
#[command(about = "Resolve Debian package dependencies into an install order", long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve requested packages and print the install order
    Resolve {
        /// Packages index files (plain or .gz)
        #[arg(long = "packages", value_name = "FILE", num_args = 1..)]
        packages: Vec<PathBuf>,

        /// Repository URL the Packages files were fetched from
        #[arg(long, default_value = "http://localhost/debian")]
        repo_base: String,

        /// JSON catalogs (arrays of package records)
        #[arg(long = "catalog", value_name = "JSON", num_args = 1..)]
        catalogs: Vec<PathBuf>,

        /// Repository priority configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Requested packages as name=version
        #[arg(short, long = "request", value_name = "NAME=VERSION", num_args = 1.., required = true)]
        requests: Vec<String>,

        /// Write a dependency-chain report here when dependencies are missing
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two Debian version strings
    Compare {
        /// Left-hand version
        a: String,
        /// Right-hand version
        b: String,
    },

    /// Parse a dependency clause and show its parts
    Parse {
        /// Dependency clause, e.g. "libc6 (>= 2.34) | libc6.1"
        dependency: String,
    },
}
