// src/lib.rs

//! Debsolve: dependency resolution for Debian-style OS image builds
//!
//! Given a catalog of package records (parsed from repository `Packages`
//! indexes) and a set of exact-version requests, computes the transitive
//! closure of packages needed and a deterministic install order.
//!
//! # Architecture
//!
//! - Versions: Debian policy ordering (epoch, upstream, revision, `~`)
//! - Dependencies: `Depends` clauses with alternatives, arch qualifiers and relations
//! - Priorities: APT-style pins per repository, passed in as immutable config
//! - Closure: breadth-first walk with repair-by-eviction and missing-dep reports
//! - Ordering: strongly connected components plus topological sort

pub mod catalog;
pub mod config;
pub mod dependency;
mod error;
pub mod package;
pub mod priority;
pub mod resolver;
pub mod version;

pub use catalog::Catalog;
pub use config::{RepositoryPriorityEntry, ResolverConfig};
pub use dependency::{DependencyClause, VersionConstraint};
pub use error::{Error, Result};
pub use package::PackageRecord;
pub use priority::{PriorityPolicy, PriorityTier};
pub use resolver::{
    resolve_install_order, resolve_with_summary, CandidateSelector, ClosureResolver,
    DependencyChainReport, FileReportSink, InstallOrderSorter, ReportSink, ResolutionSummary,
};
pub use version::DebVersion;
