// src/version/mod.rs

//! Version handling for Debian package versions
//!
//! Versions follow the `[epoch:]upstream_version[-debian_revision]` format and
//! compare according to Debian Policy §5.6.12:
//!
//! - epochs compare numerically first (default 0)
//! - upstream version, then revision, compare by alternating non-digit and
//!   digit runs
//! - in non-digit runs `~` sorts before everything, even the end of the
//!   string, then letters, then every other character
//! - digit runs compare numerically, ignoring leading zeros
//!
//! An empty version string sorts below every non-empty one.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;

/// A parsed Debian version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DebVersion {
    pub epoch: u64,
    pub upstream: String,
    pub revision: String,
}

impl DebVersion {
    /// Parse a version string strictly
    ///
    /// Examples:
    /// - "1.2.3" → epoch=0, upstream="1.2.3", revision=""
    /// - "2:1.2.3" → epoch=2, upstream="1.2.3", revision=""
    /// - "1.2-3-4ubuntu1" → epoch=0, upstream="1.2-3", revision="4ubuntu1"
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidVersion {
                version: s.to_string(),
                reason: "empty version".to_string(),
            });
        }

        let (epoch, rest) = match s.split_once(':') {
            Some((e, rest)) => {
                let epoch = e.parse::<u64>().map_err(|err| Error::InvalidVersion {
                    version: s.to_string(),
                    reason: format!("bad epoch '{}': {}", e, err),
                })?;
                (epoch, rest)
            }
            None => (0, s),
        };

        let (upstream, revision) = split_revision(rest);
        if upstream.is_empty() {
            return Err(Error::InvalidVersion {
                version: s.to_string(),
                reason: "empty upstream version".to_string(),
            });
        }
        if !upstream.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(Error::InvalidVersion {
                version: s.to_string(),
                reason: "upstream version must start with a digit".to_string(),
            });
        }

        Ok(Self {
            epoch,
            upstream: upstream.to_string(),
            revision: revision.to_string(),
        })
    }

    /// Split a version string without validation
    ///
    /// An epoch prefix that is not a number is kept as part of the upstream
    /// version rather than rejected, so any string can be ordered.
    pub fn lenient(s: &str) -> Self {
        let (epoch, rest) = match s.split_once(':') {
            Some((e, rest)) if !e.is_empty() && e.bytes().all(|b| b.is_ascii_digit()) => {
                (e.parse::<u64>().unwrap_or(u64::MAX), rest)
            }
            _ => (0, s),
        };
        let (upstream, revision) = split_revision(rest);
        Self {
            epoch,
            upstream: upstream.to_string(),
            revision: revision.to_string(),
        }
    }

    /// Compare two Debian versions
    pub fn compare(&self, other: &DebVersion) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| compare_fragment(&self.upstream, &other.upstream))
            .then_with(|| compare_fragment(&self.revision, &other.revision))
    }
}

impl fmt::Display for DebVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch > 0 {
            write!(f, "{}:", self.epoch)?;
        }
        write!(f, "{}", self.upstream)?;
        if !self.revision.is_empty() {
            write!(f, "-{}", self.revision)?;
        }
        Ok(())
    }
}

impl Ord for DebVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for DebVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two raw version strings under Debian ordering
///
/// Total order over all strings; an empty string sorts below any
/// non-empty one and two empty strings are equal.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => DebVersion::lenient(a).compare(&DebVersion::lenient(b)),
    }
}

/// Split on the last `-` into upstream version and revision
fn split_revision(s: &str) -> (&str, &str) {
    match s.rfind('-') {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    }
}

/// Sort weight of a byte inside a non-digit run; `None` is end of string
fn order(c: Option<u8>) -> i32 {
    match c {
        None => 0,
        Some(b'~') => -1,
        Some(c) if c.is_ascii_digit() => 0,
        Some(c) if c.is_ascii_alphabetic() => i32::from(c),
        Some(c) => i32::from(c) + 256,
    }
}

/// Compare an upstream version or revision fragment
fn compare_fragment(a: &str, b: &str) -> Ordering {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let (mut i, mut j) = (0, 0);

    while i < a.len() || j < b.len() {
        // Non-digit run
        while (i < a.len() && !a[i].is_ascii_digit()) || (j < b.len() && !b[j].is_ascii_digit()) {
            let ac = order(a.get(i).copied());
            let bc = order(b.get(j).copied());
            if ac != bc {
                return ac.cmp(&bc);
            }
            i += 1;
            j += 1;
        }

        // Digit run: skip leading zeros, then longer run wins, then first difference
        while i < a.len() && a[i] == b'0' {
            i += 1;
        }
        while j < b.len() && b[j] == b'0' {
            j += 1;
        }
        let mut first_diff = Ordering::Equal;
        while i < a.len() && a[i].is_ascii_digit() && j < b.len() && b[j].is_ascii_digit() {
            if first_diff == Ordering::Equal {
                first_diff = a[i].cmp(&b[j]);
            }
            i += 1;
            j += 1;
        }
        if i < a.len() && a[i].is_ascii_digit() {
            return Ordering::Greater;
        }
        if j < b.len() && b[j].is_ascii_digit() {
            return Ordering::Less;
        }
        if first_diff != Ordering::Equal {
            return first_diff;
        }
    }

    Ordering::Equal
}
