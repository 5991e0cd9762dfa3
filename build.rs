// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("debsolve")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve Debian package dependencies into an install order")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging (RUST_LOG overrides)"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("resolve")
                .about("Resolve requested packages and print the install order")
                .arg(
                    Arg::new("packages")
                        .long("packages")
                        .value_name("FILE")
                        .num_args(1..)
                        .help("Packages index files (plain or .gz)"),
                )
                .arg(
                    Arg::new("repo_base")
                        .long("repo-base")
                        .default_value("http://localhost/debian")
                        .help("Repository URL the Packages files were fetched from"),
                )
                .arg(
                    Arg::new("catalog")
                        .long("catalog")
                        .value_name("JSON")
                        .num_args(1..)
                        .help("JSON catalogs (arrays of package records)"),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Repository priority configuration (TOML)"),
                )
                .arg(
                    Arg::new("request")
                        .short('r')
                        .long("request")
                        .value_name("NAME=VERSION")
                        .num_args(1..)
                        .required(true)
                        .help("Requested packages as name=version"),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .help("Write a dependency-chain report here when dependencies are missing"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the result as JSON"),
                ),
        )
        .subcommand(
            Command::new("compare")
                .about("Compare two Debian version strings")
                .arg(Arg::new("a").required(true).help("Left-hand version"))
                .arg(Arg::new("b").required(true).help("Right-hand version")),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a dependency clause and show its parts")
                .arg(Arg::new("dependency").required(true).help("Dependency clause")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=OUT_DIR not set: {}", e);
            return;
        }
    };

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = out_dir.join("debsolve.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
