// src/dependency/mod.rs

//! Dependency expression parsing
//!
//! Raw dependency clauses come straight from `Depends`/`Pre-Depends` fields:
//!
//! ```text
//! libc6 (>= 2.34)
//! python3 | python3-dev
//! gcc:amd64
//! libfoo (>= 1.0, << 2.0) [amd64] <!nocheck>
//! ```
//!
//! A clause is tokenized into alternatives (split on `|`), and each
//! alternative into a name, an optional architecture qualifier and an
//! optional parenthesized relation group. Bare trailing tokens after the
//! name (e.g. `foo >= 1.0`) are dropped from the name but carry no
//! relation.

use crate::version;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Version relation operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintOp {
    /// `=`
    Equal,
    /// `<<` (or legacy `<`)
    Less,
    /// `<=`
    LessOrEqual,
    /// `>>` (or legacy `>`)
    Greater,
    /// `>=`
    GreaterOrEqual,
}

impl ConstraintOp {
    /// Split a leading operator off `s`, returning the operator and the rest
    pub fn split_prefix(s: &str) -> Option<(Self, &str)> {
        const OPS: [(&str, ConstraintOp); 7] = [
            ("<<", ConstraintOp::Less),
            ("<=", ConstraintOp::LessOrEqual),
            (">>", ConstraintOp::Greater),
            (">=", ConstraintOp::GreaterOrEqual),
            ("=", ConstraintOp::Equal),
            ("<", ConstraintOp::Less),
            (">", ConstraintOp::Greater),
        ];

        OPS.iter()
            .find_map(|&(token, op)| s.strip_prefix(token).map(|rest| (op, rest)))
    }

    /// Whether a comparison result of candidate-vs-required is acceptable
    pub fn accepts(self, ord: Ordering) -> bool {
        match self {
            ConstraintOp::Equal => ord == Ordering::Equal,
            ConstraintOp::Less => ord == Ordering::Less,
            ConstraintOp::LessOrEqual => ord != Ordering::Greater,
            ConstraintOp::Greater => ord == Ordering::Greater,
            ConstraintOp::GreaterOrEqual => ord != Ordering::Less,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintOp::Equal => "=",
            ConstraintOp::Less => "<<",
            ConstraintOp::LessOrEqual => "<=",
            ConstraintOp::Greater => ">>",
            ConstraintOp::GreaterOrEqual => ">=",
        }
    }
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operator and the version it relates to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub op: ConstraintOp,
    pub version: String,
}

impl Relation {
    pub fn satisfied_by(&self, candidate_version: &str) -> bool {
        self.op
            .accepts(version::compare(candidate_version, &self.version))
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.version)
    }
}

/// One alternative of a dependency clause
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DependencyAtom {
    pub name: String,
    pub arch: Option<String>,
    pub relations: Vec<Relation>,
}

/// A full clause: one or more `|`-separated alternatives
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DependencyClause {
    pub alternatives: Vec<DependencyAtom>,
}

impl DependencyClause {
    /// Parse a raw clause; never fails, empty alternatives are dropped
    pub fn parse(raw: &str) -> Self {
        let alternatives = raw
            .split('|')
            .map(parse_atom)
            .filter(|atom| !atom.name.is_empty())
            .collect();
        Self { alternatives }
    }

    /// Name of the first alternative
    pub fn primary_name(&self) -> Option<&str> {
        self.alternatives.first().map(|a| a.name.as_str())
    }
}

/// A version constraint derived from a parent's raw clauses for one dependency
///
/// `relation` is `None` when the clause names the dependency without a
/// version but offers alternatives; such constraints only carry
/// `alternative_names`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    pub relation: Option<Relation>,
    /// Other alternatives from the same clause, excluding the dependency itself
    pub alternative_names: Vec<String>,
}

impl VersionConstraint {
    pub fn has_relation(&self) -> bool {
        self.relation.is_some()
    }

    /// A versioned constraint that does not come from an alternative clause
    pub fn is_direct(&self) -> bool {
        self.relation.is_some() && self.alternative_names.is_empty()
    }

    pub fn satisfied_by(&self, candidate_version: &str) -> bool {
        self.relation
            .as_ref()
            .is_none_or(|r| r.satisfied_by(candidate_version))
    }

    /// Alternatives joined with `|`
    pub fn alternatives_joined(&self) -> String {
        self.alternative_names.join("|")
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.relation {
            Some(r) => write!(f, "({})", r)?,
            None => f.write_str("(any)")?,
        }
        if !self.alternative_names.is_empty() {
            write!(f, " | {}", self.alternative_names.join(" | "))?;
        }
        Ok(())
    }
}

/// Strip alternatives, architecture qualifiers and version relations
///
/// - "libc6 (>= 2.34)" → "libc6"
/// - "python3 | python3-dev" → "python3"
/// - "gcc:amd64" → "gcc"
pub fn clean_name(dep: &str) -> String {
    let first = dep.split('|').next().unwrap_or_default();
    parse_atom(first).name
}

/// Collect the constraints `raw_clauses` place on `dep_name`
///
/// Returns the constraints and whether `dep_name` appears in any clause at
/// all. An alternative carrying `(op ver, ...)` yields one constraint per
/// relation; an unversioned alternative yields a relation-less constraint
/// only when the clause has other alternatives to remember.
pub fn extract_constraints<S: AsRef<str>>(
    raw_clauses: &[S],
    dep_name: &str,
) -> (Vec<VersionConstraint>, bool) {
    let mut constraints = Vec::new();
    let mut found = false;

    for raw in raw_clauses {
        let clause = DependencyClause::parse(raw.as_ref());

        for (idx, atom) in clause.alternatives.iter().enumerate() {
            if atom.name != dep_name {
                continue;
            }
            found = true;

            let alternative_names: Vec<String> = clause
                .alternatives
                .iter()
                .enumerate()
                .filter(|(other, alt)| *other != idx && alt.name != dep_name)
                .map(|(_, alt)| alt.name.clone())
                .collect();

            if atom.relations.is_empty() {
                if !alternative_names.is_empty() {
                    constraints.push(VersionConstraint {
                        relation: None,
                        alternative_names,
                    });
                }
                continue;
            }

            for relation in &atom.relations {
                constraints.push(VersionConstraint {
                    relation: Some(relation.clone()),
                    alternative_names: alternative_names.clone(),
                });
            }
        }
    }

    (constraints, found)
}

/// Whether `candidate_version` satisfies every versioned constraint
pub fn satisfies_all(candidate_version: &str, constraints: &[VersionConstraint]) -> bool {
    constraints.iter().all(|c| c.satisfied_by(candidate_version))
}

/// Render the versioned constraints for error messages
pub fn describe(constraints: &[VersionConstraint]) -> String {
    let parts: Vec<String> = constraints
        .iter()
        .filter_map(|c| c.relation.as_ref().map(|r| r.to_string()))
        .collect();
    if parts.is_empty() {
        "any version".to_string()
    } else {
        parts.join(", ")
    }
}

fn is_name_terminator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ':' | '[' | '<' | '>' | '=')
}

fn parse_atom(raw: &str) -> DependencyAtom {
    let s = raw.trim();
    let name_end = s.find(is_name_terminator).unwrap_or(s.len());
    let name = s[..name_end].to_string();
    let mut rest = &s[name_end..];

    let mut arch = None;
    if let Some(after_colon) = rest.strip_prefix(':') {
        let arch_end = after_colon
            .find(|c: char| c.is_whitespace() || matches!(c, '(' | '[' | '<'))
            .unwrap_or(after_colon.len());
        let qualifier = &after_colon[..arch_end];
        if !qualifier.is_empty() {
            arch = Some(qualifier.to_string());
        }
        rest = &after_colon[arch_end..];
    }

    let relations = rest
        .trim_start()
        .strip_prefix('(')
        .and_then(|group| group.find(')').map(|end| &group[..end]))
        .map(parse_relations)
        .unwrap_or_default();

    DependencyAtom {
        name,
        arch,
        relations,
    }
}

fn parse_relations(group: &str) -> Vec<Relation> {
    group
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let (op, version) = match ConstraintOp::split_prefix(part) {
                Some((op, version)) => (op, version.trim()),
                None => (ConstraintOp::Equal, part),
            };
            if version.is_empty() {
                None
            } else {
                Some(Relation {
                    op,
                    version: version.to_string(),
                })
            }
        })
        .collect()
}
