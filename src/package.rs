// src/package.rs

//! Catalog entries as handed over by repository-metadata parsing

use crate::dependency;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A single package-index stanza, read-only once it is in a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    /// Debian version string; may be empty
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub architecture: String,
    /// Download URL, used to derive the originating repository base
    #[serde(default)]
    pub origin_url: String,
    /// Cleaned dependency names, the edges of the dependency graph
    #[serde(default)]
    pub requires: Vec<String>,
    /// Raw dependency clauses, source for version-constraint extraction
    #[serde(default)]
    pub requires_raw: Vec<String>,
    /// Virtual package names this record also satisfies
    #[serde(default)]
    pub provides: BTreeSet<String>,
    #[serde(default)]
    pub checksums: BTreeMap<String, String>,
    #[serde(default)]
    pub description: String,
}

impl PackageRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Set the dependency clauses, deriving `requires` from `requires_raw`
    pub fn with_depends<S: AsRef<str>>(mut self, clauses: &[S]) -> Self {
        self.requires_raw = clauses.iter().map(|c| c.as_ref().trim().to_string()).collect();
        self.requires = self
            .requires_raw
            .iter()
            .map(|c| dependency::clean_name(c))
            .filter(|n| !n.is_empty())
            .collect();
        self
    }

    pub fn with_origin(mut self, origin_url: impl Into<String>) -> Self {
        self.origin_url = origin_url.into();
        self
    }

    pub fn with_provides<S: AsRef<str>>(mut self, provides: &[S]) -> Self {
        self.provides = provides
            .iter()
            .map(|p| dependency::clean_name(p.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();
        self
    }

    pub fn with_architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = architecture.into();
        self
    }
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.name, self.version)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_depends_cleans_names() {
        let pkg = PackageRecord::new("curl", "7.88.1-10")
            .with_depends(&["libc6 (>= 2.34)", "libcurl4 (= 7.88.1-10) | libcurl3", "zlib1g:amd64"]);

        assert_eq!(pkg.requires, vec!["libc6", "libcurl4", "zlib1g"]);
        assert_eq!(pkg.requires_raw.len(), 3);
        assert_eq!(pkg.requires_raw[0], "libc6 (>= 2.34)");
    }

    #[test]
    fn test_provides_are_cleaned() {
        let pkg = PackageRecord::new("postfix", "3.7.6-1").with_provides(&["mail-transport-agent", "default-mta (= 1)"]);
        assert!(pkg.provides.contains("mail-transport-agent"));
        assert!(pkg.provides.contains("default-mta"));
    }

    #[test]
    fn test_display() {
        assert_eq!(PackageRecord::new("bash", "5.2-1").to_string(), "bash 5.2-1");
        assert_eq!(PackageRecord::new("bash", "").to_string(), "bash");
    }
}
