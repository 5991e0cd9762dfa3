// src/config.rs

//! Resolver configuration
//!
//! The configuration is read once, before resolution, and handed to the
//! resolver by reference. Nothing in the crate keeps it in global state.
//!
//! # Example resolver.toml
//!
//! ```toml
//! # First matching prefix wins
//! [[repository]]
//! url = "http://deb.debian.org/debian"
//! priority = 990
//!
//! [[repository]]
//! url = "http://mirror.example.com/experimental"
//! priority = -1
//!
//! [resolver]
//! pool_segment = "/pool/"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Path segment that separates a repository base URL from its package pool
pub const DEFAULT_POOL_SEGMENT: &str = "/pool/";

/// Pin priority for one repository base URL prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryPriorityEntry {
    #[serde(rename = "url")]
    pub repo_base_url_prefix: String,
    /// `<0` blocked, `0` unset (500), `990` preferred, `1000` install even if
    /// older, `>1000` force install
    #[serde(default)]
    pub priority: i32,
}

impl RepositoryPriorityEntry {
    pub fn new(prefix: impl Into<String>, priority: i32) -> Self {
        Self {
            repo_base_url_prefix: prefix.into(),
            priority,
        }
    }
}

/// Resolver tuning knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    #[serde(default = "default_pool_segment")]
    pub pool_segment: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            pool_segment: default_pool_segment(),
        }
    }
}

fn default_pool_segment() -> String {
    DEFAULT_POOL_SEGMENT.to_string()
}

/// Immutable configuration for one resolution call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Repository priorities in match order
    #[serde(default, rename = "repository")]
    pub repositories: Vec<RepositoryPriorityEntry>,

    #[serde(default)]
    pub resolver: ResolverOptions,
}

impl ResolverConfig {
    pub fn new(repositories: Vec<RepositoryPriorityEntry>) -> Self {
        Self {
            repositories,
            resolver: ResolverOptions::default(),
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ResolverConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading resolver configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            Error::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.resolver.pool_segment.is_empty() {
            return Err(Error::ConfigError("pool_segment must not be empty".to_string()));
        }

        for (idx, entry) in self.repositories.iter().enumerate() {
            if entry.repo_base_url_prefix.trim().is_empty() {
                return Err(Error::ConfigError(format!(
                    "repository entry {} has an empty url",
                    idx + 1
                )));
            }
        }

        Ok(())
    }
}
