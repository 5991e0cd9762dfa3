// src/commands.rs
//! Command handlers for the debsolve CLI

use anyhow::{Context, Result, bail};
use debsolve::catalog::{self, Catalog};
use debsolve::dependency::DependencyClause;
use debsolve::version::DebVersion;
use debsolve::{FileReportSink, PackageRecord, ReportSink, ResolverConfig};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::info;

/// Parse a `name=version` request
pub fn parse_request(request: &str) -> Result<PackageRecord> {
    match request.split_once('=') {
        Some((name, version)) if !name.trim().is_empty() && !version.trim().is_empty() => {
            Ok(PackageRecord::new(name.trim(), version.trim()))
        }
        _ => bail!("Invalid request '{}': expected name=version", request),
    }
}

/// Build a catalog from Packages indexes and JSON catalogs, in argument order
pub fn load_catalog(packages: &[PathBuf], repo_base: &str, catalogs: &[PathBuf]) -> Result<Catalog> {
    let mut records = Vec::new();

    for path in packages {
        let loaded = catalog::load_packages_file(path, repo_base)
            .with_context(|| format!("Failed to load Packages index {}", path.display()))?;
        records.extend(loaded);
    }
    for path in catalogs {
        let loaded = catalog::load_json(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?;
        records.extend(loaded);
    }

    if records.is_empty() {
        bail!("No packages loaded: pass --packages or --catalog");
    }

    info!("Catalog contains {} records", records.len());
    Ok(Catalog::new(records))
}

pub fn load_config(path: Option<&Path>) -> Result<ResolverConfig> {
    match path {
        Some(path) => ResolverConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => Ok(ResolverConfig::default()),
    }
}

pub fn cmd_resolve(
    packages: &[PathBuf],
    repo_base: &str,
    catalogs: &[PathBuf],
    config: Option<&Path>,
    requests: &[String],
    report: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = load_config(config)?;
    let catalog = load_catalog(packages, repo_base, catalogs)?;
    let requested = requests
        .iter()
        .map(|r| parse_request(r))
        .collect::<Result<Vec<_>>>()?;

    let sink = report.map(FileReportSink::new);
    let summary = debsolve::resolve_with_summary(
        &requested,
        &catalog,
        &config,
        sink.as_ref().map(|s| s as &dyn ReportSink),
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Install order ({} packages):", summary.len());
    for (idx, pkg) in summary.install_order.iter().enumerate() {
        println!("  {:>4}. {} {}", idx + 1, pkg.name, pkg.version);
    }
    for cycle in &summary.cycles {
        println!("  cycle: {}", cycle.join(", "));
    }
    if summary.evictions > 0 {
        println!("\n{} package(s) replaced during resolution", summary.evictions);
    }

    Ok(())
}

pub fn cmd_compare(a: &str, b: &str) -> Result<()> {
    let left = DebVersion::parse(a)?;
    let right = DebVersion::parse(b)?;
    let symbol = match left.cmp(&right) {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    };
    println!("{}", symbol);
    Ok(())
}

pub fn cmd_parse(raw: &str) -> Result<()> {
    let clause = DependencyClause::parse(raw);
    if clause.alternatives.is_empty() {
        bail!("No package name found in '{}'", raw);
    }

    println!("name: {}", clause.primary_name().unwrap_or_default());
    for atom in &clause.alternatives {
        let relations: Vec<String> = atom.relations.iter().map(|r| r.to_string()).collect();
        println!(
            "  alternative: {}{}{}",
            atom.name,
            atom.arch.as_deref().map(|a| format!(" [arch {}]", a)).unwrap_or_default(),
            if relations.is_empty() {
                String::new()
            } else {
                format!(" ({})", relations.join(", "))
            }
        );
    }
    Ok(())
}
