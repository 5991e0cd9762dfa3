// src/resolver/mod.rs

//! Dependency resolution and install ordering
//!
//! Resolution runs in two stages:
//!
//! 1. [`ClosureResolver`] expands the requested packages into the full set
//!    of packages needed, choosing one candidate per dependency through
//!    [`CandidateSelector`] and the repository pin priorities.
//! 2. [`InstallOrderSorter`] arranges that set so dependencies come before
//!    their dependents, collapsing dependency cycles into groups.
//!
//! [`resolve_install_order`] runs both.

mod closure;
mod order;
mod report;
mod selector;

pub use closure::{Closure, ClosureResolver};
pub use order::InstallOrderSorter;
pub use report::{
    ChainEdge, DependencyChainReport, FileReportSink, MissingDependency, ReportFormat, ReportSink,
};
pub use selector::CandidateSelector;

use crate::catalog::Catalog;
use crate::config::ResolverConfig;
use crate::error::Result;
use crate::package::PackageRecord;
use serde::Serialize;
use tracing::info;

/// Outcome of a full resolution run
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionSummary {
    /// Install order: dependencies first
    pub install_order: Vec<PackageRecord>,
    /// Groups of packages that depend on each other
    pub cycles: Vec<Vec<String>>,
    pub evictions: usize,
}

impl ResolutionSummary {
    pub fn len(&self) -> usize {
        self.install_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.install_order.is_empty()
    }

    /// `name=version` lines in install order
    pub fn pinned_list(&self) -> Vec<String> {
        self.install_order
            .iter()
            .map(|p| format!("{}={}", p.name, p.version))
            .collect()
    }
}

/// Resolve `requested` against `catalog` and return the install order
pub fn resolve_install_order(
    requested: &[PackageRecord],
    catalog: &Catalog,
    config: &ResolverConfig,
) -> Result<Vec<PackageRecord>> {
    let closure = ClosureResolver::new(catalog, config).resolve(requested)?;
    InstallOrderSorter::order(&closure)
}

/// Like [`resolve_install_order`], with cycle and eviction details
pub fn resolve_with_summary(
    requested: &[PackageRecord],
    catalog: &Catalog,
    config: &ResolverConfig,
    sink: Option<&dyn ReportSink>,
) -> Result<ResolutionSummary> {
    let mut resolver = ClosureResolver::new(catalog, config);
    if let Some(sink) = sink {
        resolver = resolver.with_report_sink(sink);
    }

    let closure = resolver.resolve_closure(requested)?;
    let install_order = InstallOrderSorter::order(&closure.packages)?;
    let cycles = InstallOrderSorter::cycles(&closure.packages)?;

    info!(
        "Install plan ready: {} packages, {} cycles",
        install_order.len(),
        cycles.len()
    );

    Ok(ResolutionSummary {
        install_order,
        cycles,
        evictions: closure.evictions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_install_order() {
        let catalog = Catalog::new(vec![
            PackageRecord::new("curl", "7.88").with_depends(&["libcurl4 (= 7.88)", "libc6"]),
            PackageRecord::new("libcurl4", "7.88").with_depends(&["libc6 (>= 2.34)"]),
            PackageRecord::new("libc6", "2.36"),
        ]);
        let cfg = ResolverConfig::default();

        let order =
            resolve_install_order(&[PackageRecord::new("curl", "7.88")], &catalog, &cfg).unwrap();
        let names: Vec<&str> = order.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["libc6", "libcurl4", "curl"]);
    }

    #[test]
    fn test_summary_reports_cycles() {
        let catalog = Catalog::new(vec![
            PackageRecord::new("a", "1").with_depends(&["b"]),
            PackageRecord::new("b", "1").with_depends(&["a"]),
        ]);
        let cfg = ResolverConfig::default();

        let summary =
            resolve_with_summary(&[PackageRecord::new("a", "1")], &catalog, &cfg, None).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary.cycles, vec![vec!["a".to_string(), "b".to_string()]]);
        assert_eq!(summary.pinned_list(), vec!["a=1", "b=1"]);
        assert_eq!(summary.evictions, 0);
    }
}
