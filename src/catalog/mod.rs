// src/catalog/mod.rs

//! Read-only package catalog
//!
//! The catalog owns the records produced by repository-metadata parsing and
//! indexes them by name and by virtual `Provides` name. Indexes preserve
//! catalog order, which is what makes candidate discovery deterministic.

mod index;

pub use index::{load_json, load_packages_file, parse_packages_index};

use crate::package::PackageRecord;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Indexed, immutable collection of package records
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<PackageRecord>,
    by_name: HashMap<String, Vec<usize>>,
    by_provides: HashMap<String, Vec<usize>>,
}

impl Catalog {
    pub fn new(records: Vec<PackageRecord>) -> Self {
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_provides: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, record) in records.iter().enumerate() {
            if record.name.is_empty() {
                warn!("Ignoring catalog entry {} without a package name", idx);
                continue;
            }
            by_name.entry(record.name.clone()).or_default().push(idx);
            for virtual_name in &record.provides {
                by_provides.entry(virtual_name.clone()).or_default().push(idx);
            }
        }

        debug!(
            "Catalog indexed: {} records, {} names, {} virtual names",
            records.len(),
            by_name.len(),
            by_provides.len()
        );

        Self {
            records,
            by_name,
            by_provides,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PackageRecord] {
        &self.records
    }

    /// Records whose own name is `name`, in catalog order
    pub fn by_name(&self, name: &str) -> Vec<&PackageRecord> {
        self.lookup(&self.by_name, name)
    }

    /// Records that list `name` in their `Provides`, in catalog order
    pub fn providers(&self, name: &str) -> Vec<&PackageRecord> {
        self.lookup(&self.by_provides, name)
    }

    /// The first record matching both name and version exactly
    pub fn find_exact(&self, name: &str, version: &str) -> Option<&PackageRecord> {
        self.by_name(name).into_iter().find(|r| r.version == version)
    }

    fn lookup(&self, index: &HashMap<String, Vec<usize>>, name: &str) -> Vec<&PackageRecord> {
        index
            .get(name)
            .map(|ids| ids.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }
}

impl FromIterator<PackageRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = PackageRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
