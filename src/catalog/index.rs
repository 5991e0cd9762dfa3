// src/catalog/index.rs

//! Loading catalogs from Debian `Packages` indexes and JSON fixtures

use crate::error::{Error, Result};
use crate::package::PackageRecord;
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Fields of one `Packages` stanza that feed a catalog record
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStanza {
    #[serde(rename = "Package")]
    package: Option<String>,
    #[serde(rename = "Version")]
    version: Option<String>,
    #[serde(rename = "Architecture")]
    architecture: Option<String>,
    #[serde(rename = "Pre-Depends")]
    pre_depends: Option<String>,
    #[serde(rename = "Depends")]
    depends: Option<String>,
    #[serde(rename = "Provides")]
    provides: Option<String>,
    #[serde(rename = "Filename")]
    filename: Option<String>,
    #[serde(rename = "SHA256")]
    sha256: Option<String>,
    #[serde(rename = "SHA1")]
    sha1: Option<String>,
    #[serde(rename = "MD5sum")]
    md5sum: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(|item| item.split_whitespace().collect::<Vec<_>>().join(" "))
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn stanza_to_record(stanza: &RawStanza, repo_base: &str) -> Option<PackageRecord> {
    let name = stanza.package.as_deref().map(str::trim).filter(|n| !n.is_empty())?;

    // Pre-Depends first: they have to be unpacked before anything else
    let mut clauses = split_list(stanza.pre_depends.as_deref());
    clauses.extend(split_list(stanza.depends.as_deref()));

    let base = repo_base.trim_end_matches('/');
    let origin_url = match stanza.filename.as_deref().map(str::trim) {
        Some(filename) => format!("{}/{}", base, filename.trim_start_matches('/')),
        None => base.to_string(),
    };

    let mut record = PackageRecord::new(name, stanza.version.as_deref().unwrap_or_default().trim())
        .with_architecture(stanza.architecture.as_deref().unwrap_or_default().trim())
        .with_origin(origin_url)
        .with_depends(&clauses)
        .with_provides(&split_list(stanza.provides.as_deref()));

    for (sum, key) in [
        (&stanza.sha256, "sha256"),
        (&stanza.sha1, "sha1"),
        (&stanza.md5sum, "md5"),
    ] {
        if let Some(sum) = sum {
            record.checksums.insert(key.to_string(), sum.trim().to_string());
        }
    }

    record.description = stanza
        .description
        .as_deref()
        .and_then(|d| d.lines().next())
        .unwrap_or_default()
        .trim()
        .to_string();

    Some(record)
}

/// Parse the text of a `Packages` index into catalog records
///
/// `repo_base` is the repository URL the index was fetched from; each
/// record's `Filename` is joined onto it to form the origin URL.
pub fn parse_packages_index(text: &str, repo_base: &str) -> Result<Vec<PackageRecord>> {
    let stanzas: Vec<RawStanza> = rfc822_like::from_str(text).map_err(|e| {
        Error::ParseError(format!("Malformed Packages index for {}: {}", repo_base, e))
    })?;

    let mut records = Vec::with_capacity(stanzas.len());
    for (idx, stanza) in stanzas.iter().enumerate() {
        match stanza_to_record(stanza, repo_base) {
            Some(record) => records.push(record),
            None => warn!("Skipping stanza {} without a Package field", idx + 1),
        }
    }

    debug!("Parsed {} records from index for {}", records.len(), repo_base);
    Ok(records)
}

/// Read a plain or gzip-compressed `Packages` file
pub fn load_packages_file(path: &Path, repo_base: &str) -> Result<Vec<PackageRecord>> {
    let mut file = File::open(path)
        .map_err(|e| Error::IoError(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut text = String::new();
    if path.extension().is_some_and(|ext| ext == "gz") {
        GzDecoder::new(file).read_to_string(&mut text).map_err(|e| {
            Error::ParseError(format!("Failed to decompress {}: {}", path.display(), e))
        })?;
    } else {
        file.read_to_string(&mut text)?;
    }

    let records = parse_packages_index(&text, repo_base)?;
    info!("Loaded {} packages from {}", records.len(), path.display());
    Ok(records)
}

/// Read a JSON array of package records
pub fn load_json(path: &Path) -> Result<Vec<PackageRecord>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
    let records: Vec<PackageRecord> = serde_json::from_str::<Vec<PackageRecord>>(&content)?
        .into_iter()
        .map(|record| {
            // Fixtures may carry only the raw clauses
            if record.requires.is_empty() && !record.requires_raw.is_empty() {
                let raw = record.requires_raw.clone();
                record.with_depends(&raw)
            } else {
                record
            }
        })
        .collect();
    info!("Loaded {} packages from {}", records.len(), path.display());
    Ok(records)
}
