// src/error.rs

//! Error types for dependency resolution and install ordering

use crate::resolver::DependencyChainReport;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the resolver and its collaborators
#[derive(Error, Debug)]
pub enum Error {
    /// A requested package has no exact (name, version) match in the catalog
    #[error("Requested package {name} {version} not found in catalog")]
    NotRequested { name: String, version: String },

    /// A dependency resolved to one version is required at an incompatible one
    #[error(
        "Version conflict on {package}: {resolved_name} {resolved_version} is already selected, \
         but {required_by} needs {required_name} {required_version}"
    )]
    VersionConflict {
        package: String,
        resolved_name: String,
        resolved_version: String,
        required_name: String,
        required_version: String,
        required_by: String,
    },

    /// One or more dependencies could not be satisfied by any candidate
    #[error(
        "{} unresolved dependencies: {}",
        .report.missing.len(),
        .report.missing_summary()
    )]
    MissingDependencies { report: Box<DependencyChainReport> },

    /// Nothing in the catalog carries or provides this name
    #[error("No candidates for {0}")]
    NoCandidates(String),

    /// Every candidate comes from a repository with a negative pin priority
    #[error("All candidates for {0} are blocked")]
    AllCandidatesBlocked(String),

    /// Candidates exist but none satisfies the parent's version constraints
    #[error("No candidate for {dependency} satisfies {constraint} (required by {required_by})")]
    UnsatisfiedConstraint {
        dependency: String,
        constraint: String,
        required_by: String,
    },

    /// Two packages with the same name were handed to the install-order sorter
    #[error("Duplicate package in install set: {0}")]
    DuplicatePackage(String),

    /// Version string that cannot be parsed strictly
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Malformed dependency expression or index stanza
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid resolver configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O failure with context
    #[error("I/O error: {0}")]
    IoError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
