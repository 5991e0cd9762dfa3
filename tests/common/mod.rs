// tests/common/mod.rs

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use debsolve::{Catalog, PackageRecord, RepositoryPriorityEntry, ResolverConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const DEBIAN: &str = "http://deb.debian.org/debian";
pub const BACKPORTS: &str = "http://deb.debian.org/debian-backports";
pub const VENDOR: &str = "http://apt.vendor.example.com/debian";
pub const UNTRUSTED: &str = "http://mirror.untrusted.example.com/debian";

/// Package record served from `repo`, with a pool-style download URL
pub fn pkg(repo: &str, name: &str, version: &str, depends: &[&str]) -> PackageRecord {
    PackageRecord::new(name, version)
        .with_origin(format!(
            "{}/pool/main/{}/{}/{}_{}_amd64.deb",
            repo,
            &name[..1],
            name,
            name,
            version
        ))
        .with_architecture("amd64")
        .with_depends(depends)
}

/// Exact-version request
pub fn request(name: &str, version: &str) -> PackageRecord {
    PackageRecord::new(name, version)
}

pub fn config(entries: &[(&str, i32)]) -> ResolverConfig {
    ResolverConfig::new(
        entries
            .iter()
            .map(|(url, priority)| RepositoryPriorityEntry::new(*url, *priority))
            .collect(),
    )
}

pub fn names(packages: &[PackageRecord]) -> Vec<String> {
    packages.iter().map(|p| p.name.clone()).collect()
}

pub fn pinned(packages: &[PackageRecord]) -> Vec<String> {
    packages
        .iter()
        .map(|p| format!("{}={}", p.name, p.version))
        .collect()
}

/// A small slice of a Debian base system.
///
/// - libc6 and libgcc-s1 depend on each other
/// - curl pulls libcurl4 at an exact version
/// - mail-transport-agent is virtual (postfix, exim4)
/// - backports carries a newer libcurl4 and openssl
/// - the untrusted mirror carries a tempting libssl3
pub fn base_system() -> Catalog {
    Catalog::new(vec![
        pkg(DEBIAN, "libc6", "2.36-9+deb12u4", &["libgcc-s1"]),
        pkg(DEBIAN, "libgcc-s1", "12.2.0-14", &["gcc-12-base (= 12.2.0-14)", "libc6 (>= 2.35)"]),
        pkg(DEBIAN, "gcc-12-base", "12.2.0-14", &[]),
        pkg(DEBIAN, "zlib1g", "1:1.2.13.dfsg-1", &["libc6 (>= 2.14)"]),
        pkg(DEBIAN, "libssl3", "3.0.11-1~deb12u2", &["libc6 (>= 2.34)"]),
        pkg(UNTRUSTED, "libssl3", "9.9.9-1", &[]),
        pkg(
            DEBIAN,
            "libcurl4",
            "7.88.1-10+deb12u5",
            &["libc6 (>= 2.34)", "libssl3 (>= 3.0.0)", "zlib1g (>= 1:1.1.4)"],
        ),
        pkg(BACKPORTS, "libcurl4", "8.5.0-2~bpo12+1", &["libc6 (>= 2.34)", "libssl3"]),
        pkg(
            DEBIAN,
            "curl",
            "7.88.1-10+deb12u5",
            &["libc6 (>= 2.34)", "libcurl4 (= 7.88.1-10+deb12u5)", "zlib1g (>= 1:1.1.4)"],
        ),
        pkg(DEBIAN, "postfix", "3.7.10-0+deb12u1", &["libc6 (>= 2.34)", "libssl3 (>= 3.0.0)"])
            .with_provides(&["mail-transport-agent"]),
        pkg(DEBIAN, "exim4-daemon-light", "4.96-15+deb12u4", &["libc6 (>= 2.34)"])
            .with_provides(&["mail-transport-agent"]),
        pkg(
            DEBIAN,
            "mailutils",
            "1:3.15-4",
            &["libc6 (>= 2.34)", "default-mta | mail-transport-agent"],
        ),
    ])
}

/// Write `content` to a file inside a fresh temp dir
///
/// Returns (TempDir, path) - keep the TempDir alive to prevent cleanup.
pub fn write_temp(file_name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join(file_name);
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}
