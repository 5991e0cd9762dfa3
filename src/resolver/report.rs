// src/resolver/report.rs

//! Dependency-chain diagnostics
//!
//! Produced only when resolution ends with missing dependencies. The report
//! travels inside the error and can additionally be handed to a
//! [`ReportSink`] so callers decide where (or whether) it is written.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A parent -> child edge recorded while walking the closure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEdge {
    pub parent: String,
    pub child: String,
}

/// A dependency no candidate could satisfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDependency {
    pub required_by: String,
    pub dependency: String,
    pub reason: String,
}

/// Everything the resolver knew when it gave up
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyChainReport {
    pub edges: Vec<ChainEdge>,
    pub missing: Vec<MissingDependency>,
}

impl DependencyChainReport {
    pub fn new(edges: Vec<ChainEdge>, missing: Vec<MissingDependency>) -> Self {
        Self { edges, missing }
    }

    /// One-line list of the missing dependencies
    pub fn missing_summary(&self) -> String {
        self.missing
            .iter()
            .map(|m| format!("{} (required by {})", m.dependency, m.required_by))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Names of all missing dependencies, sorted and deduplicated
    pub fn missing_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.missing.iter().map(|m| m.dependency.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for DependencyChainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# dependency chain")?;
        for edge in &self.edges {
            writeln!(f, "{} -> {}", edge.parent, edge.child)?;
        }
        for missing in &self.missing {
            writeln!(f, "{} -> {} (missing)", missing.required_by, missing.dependency)?;
        }
        writeln!(f, "# {} missing", self.missing.len())?;
        for missing in &self.missing {
            writeln!(f, "#   {}: {}", missing.dependency, missing.reason)?;
        }
        Ok(())
    }
}

/// Destination for dependency-chain reports
pub trait ReportSink {
    fn write_report(&self, report: &DependencyChainReport) -> Result<()>;
}

/// Output format for [`FileReportSink`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Writes reports to a file, replacing earlier content
#[derive(Debug, Clone)]
pub struct FileReportSink {
    path: PathBuf,
    format: ReportFormat,
}

impl FileReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = if path.extension().is_some_and(|ext| ext == "json") {
            ReportFormat::Json
        } else {
            ReportFormat::Text
        };
        Self { path, format }
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileReportSink {
    fn write_report(&self, report: &DependencyChainReport) -> Result<()> {
        let content = match self.format {
            ReportFormat::Text => report.to_string(),
            ReportFormat::Json => report.to_json()?,
        };
        fs::write(&self.path, content).map_err(|e| {
            Error::IoError(format!("Failed to write report {}: {}", self.path.display(), e))
        })?;
        info!("Dependency chain report written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DependencyChainReport {
        DependencyChainReport::new(
            vec![ChainEdge {
                parent: "app 1.0".to_string(),
                child: "lib-a 1.0".to_string(),
            }],
            vec![
                MissingDependency {
                    required_by: "lib-a 1.0".to_string(),
                    dependency: "lib-z".to_string(),
                    reason: "No candidates for lib-z".to_string(),
                },
                MissingDependency {
                    required_by: "app 1.0".to_string(),
                    dependency: "lib-z".to_string(),
                    reason: "No candidates for lib-z".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_render_text() {
        let text = sample().to_string();
        assert!(text.contains("app 1.0 -> lib-a 1.0\n"));
        assert!(text.contains("lib-a 1.0 -> lib-z (missing)\n"));
        assert!(text.contains("# 2 missing"));
    }

    #[test]
    fn test_missing_names_deduplicated() {
        assert_eq!(sample().missing_names(), vec!["lib-z"]);
        assert!(sample().missing_summary().starts_with("lib-z (required by lib-a 1.0)"));
    }

    #[test]
    fn test_file_sink_formats() {
        let dir = tempfile::tempdir().unwrap();

        let text_sink = FileReportSink::new(dir.path().join("chain.txt"));
        text_sink.write_report(&sample()).unwrap();
        let text = fs::read_to_string(text_sink.path()).unwrap();
        assert!(text.starts_with("# dependency chain"));

        let json_sink = FileReportSink::new(dir.path().join("chain.json"));
        json_sink.write_report(&sample()).unwrap();
        let parsed: DependencyChainReport =
            serde_json::from_str(&fs::read_to_string(json_sink.path()).unwrap()).unwrap();
        assert_eq!(parsed, sample());
    }
}
