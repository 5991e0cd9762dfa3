// src/resolver/selector.rs

//! Candidate discovery and selection
//!
//! Finds every package that can satisfy a dependency name (exact name
//! first, `Provides` only when no package carries the name), drops blocked
//! candidates and picks one for a given parent.

use crate::catalog::Catalog;
use crate::dependency::{self, VersionConstraint};
use crate::error::{Error, Result};
use crate::package::PackageRecord;
use crate::priority::{PriorityPolicy, RepoContext};
use tracing::debug;

/// Picks the package that satisfies a dependency for a given parent
#[derive(Debug, Clone, Copy)]
pub struct CandidateSelector<'a> {
    catalog: &'a Catalog,
    policy: PriorityPolicy<'a>,
}

impl<'a> CandidateSelector<'a> {
    pub fn new(catalog: &'a Catalog, policy: PriorityPolicy<'a>) -> Self {
        Self { catalog, policy }
    }

    /// All selectable candidates for `dependency_name`, best first
    ///
    /// Candidates are ordered by priority tier, pin priority, then version
    /// (newest first); catalog order breaks remaining ties.
    pub fn select(&self, dependency_name: &str) -> Result<Vec<&'a PackageRecord>> {
        let mut candidates = self.catalog.by_name(dependency_name);
        if candidates.is_empty() {
            candidates = self.catalog.providers(dependency_name);
            if !candidates.is_empty() {
                debug!(
                    "{} is virtual, provided by {} packages",
                    dependency_name,
                    candidates.len()
                );
            }
        }

        if candidates.is_empty() {
            return Err(Error::NoCandidates(dependency_name.to_string()));
        }

        let total = candidates.len();
        candidates.retain(|c| !self.policy.is_blocked(c));
        if candidates.is_empty() {
            debug!("All {} candidates for {} are blocked", total, dependency_name);
            return Err(Error::AllCandidatesBlocked(dependency_name.to_string()));
        }
        if candidates.len() < total {
            debug!(
                "Dropped {} blocked candidates for {}",
                total - candidates.len(),
                dependency_name
            );
        }

        candidates.sort_by(|a, b| self.policy.candidate_order(a, b));
        Ok(candidates)
    }

    /// Choose one of `candidates` for `parent`'s dependency on `dependency_name`
    ///
    /// `candidates` must be ordered best first, as returned by [`select`].
    ///
    /// [`select`]: CandidateSelector::select
    pub fn resolve_one(
        &self,
        parent: &PackageRecord,
        dependency_name: &str,
        candidates: &[&'a PackageRecord],
    ) -> Result<&'a PackageRecord> {
        if candidates.is_empty() {
            return Err(Error::NoCandidates(dependency_name.to_string()));
        }

        let (constraints, _) = dependency::extract_constraints(&parent.requires_raw, dependency_name);
        let versioned: Vec<VersionConstraint> =
            constraints.into_iter().filter(|c| c.has_relation()).collect();

        if versioned.is_empty() && candidates.len() == 1 {
            return Ok(candidates[0]);
        }

        let ctx = self.policy.context_of(parent);
        let (mut same_repo, mut other_repo): (Vec<&'a PackageRecord>, Vec<&'a PackageRecord>) =
            candidates
                .iter()
                .copied()
                .partition(|c| self.policy.matches_context(&ctx, c));

        if !versioned.is_empty() {
            same_repo.retain(|c| dependency::satisfies_all(&c.version, &versioned));
            other_repo.retain(|c| dependency::satisfies_all(&c.version, &versioned));

            if same_repo.is_empty() && other_repo.is_empty() {
                return Err(Error::UnsatisfiedConstraint {
                    dependency: dependency_name.to_string(),
                    constraint: dependency::describe(&versioned),
                    required_by: parent.to_string(),
                });
            }
        }

        let chosen = self.pick(&same_repo, &other_repo, &ctx, dependency_name)?;
        debug!("{} -> {} selected for {}", parent, chosen, dependency_name);
        Ok(chosen)
    }

    /// Convenience: [`select`](Self::select) followed by [`resolve_one`](Self::resolve_one)
    pub fn find(&self, parent: &PackageRecord, dependency_name: &str) -> Result<&'a PackageRecord> {
        let candidates = self.select(dependency_name)?;
        self.resolve_one(parent, dependency_name, &candidates)
    }

    fn pick(
        &self,
        same_repo: &[&'a PackageRecord],
        other_repo: &[&'a PackageRecord],
        ctx: &RepoContext,
        dependency_name: &str,
    ) -> Result<&'a PackageRecord> {
        match (same_repo.first(), other_repo.first()) {
            (Some(&same), Some(&other)) => Ok(self.policy.prefer(same, other, ctx)),
            (Some(&only), None) | (None, Some(&only)) => Ok(only),
            (None, None) => Err(Error::NoCandidates(dependency_name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RepositoryPriorityEntry, ResolverConfig};

    const MAIN: &str = "http://deb.debian.org/debian";
    const EXTRA: &str = "http://extra.example.com/debian";
    const BAD: &str = "http://bad.example.com/debian";

    fn pkg(name: &str, version: &str, repo: &str) -> PackageRecord {
        PackageRecord::new(name, version).with_origin(format!("{}/pool/main/{}_{}.deb", repo, name, version))
    }

    fn config() -> ResolverConfig {
        ResolverConfig::new(vec![RepositoryPriorityEntry::new(BAD, -1)])
    }

    #[test]
    fn test_select_exact_name_before_provides() {
        let catalog = Catalog::new(vec![
            pkg("mta", "1.0", EXTRA),
            pkg("postfix", "3.7", MAIN).with_provides(&["mta"]),
        ]);
        let cfg = config();
        let selector = CandidateSelector::new(&catalog, PriorityPolicy::new(&cfg));

        let found = selector.select("mta").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "mta");
    }

    #[test]
    fn test_select_falls_back_to_provides() {
        let catalog = Catalog::new(vec![
            pkg("postfix", "3.7", MAIN).with_provides(&["mail-transport-agent"]),
            pkg("exim4", "4.96", MAIN).with_provides(&["mail-transport-agent"]),
        ]);
        let cfg = config();
        let selector = CandidateSelector::new(&catalog, PriorityPolicy::new(&cfg));

        let names: Vec<&str> = selector
            .select("mail-transport-agent")
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["exim4", "postfix"]);
    }

    #[test]
    fn test_blocked_candidate_never_selected() {
        let catalog = Catalog::new(vec![pkg("evil", "9.9", BAD)]);
        let cfg = config();
        let selector = CandidateSelector::new(&catalog, PriorityPolicy::new(&cfg));

        assert!(matches!(selector.select("evil"), Err(Error::AllCandidatesBlocked(_))));
        assert!(matches!(selector.select("nothing"), Err(Error::NoCandidates(_))));
    }

    #[test]
    fn test_select_drops_blocked_among_others() {
        let catalog = Catalog::new(vec![pkg("libfoo", "9.0", BAD), pkg("libfoo", "1.0", MAIN)]);
        let cfg = config();
        let selector = CandidateSelector::new(&catalog, PriorityPolicy::new(&cfg));

        let found = selector.select("libfoo").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].version, "1.0");
    }

    #[test]
    fn test_resolve_one_prefers_parent_repository() {
        let catalog = Catalog::new(vec![pkg("libfoo", "2.0", EXTRA), pkg("libfoo", "1.0", MAIN)]);
        let cfg = config();
        let selector = CandidateSelector::new(&catalog, PriorityPolicy::new(&cfg));
        let parent = pkg("app", "1.0", MAIN).with_depends(&["libfoo"]);

        let chosen = selector.find(&parent, "libfoo").unwrap();
        assert_eq!(chosen.version, "1.0");
    }

    #[test]
    fn test_resolve_one_honours_constraints_across_repositories() {
        let catalog = Catalog::new(vec![pkg("libfoo", "2.0", EXTRA), pkg("libfoo", "1.0", MAIN)]);
        let cfg = config();
        let selector = CandidateSelector::new(&catalog, PriorityPolicy::new(&cfg));
        let parent = pkg("app", "1.0", MAIN).with_depends(&["libfoo (>= 1.5)"]);

        let chosen = selector.find(&parent, "libfoo").unwrap();
        assert_eq!(chosen.version, "2.0");
    }

    #[test]
    fn test_resolve_one_unsatisfiable() {
        let catalog = Catalog::new(vec![pkg("libfoo", "1.0", MAIN)]);
        let cfg = config();
        let selector = CandidateSelector::new(&catalog, PriorityPolicy::new(&cfg));
        let parent = pkg("app", "1.0", MAIN).with_depends(&["libfoo (>= 2.0)"]);

        match selector.find(&parent, "libfoo") {
            Err(Error::UnsatisfiedConstraint {
                dependency,
                constraint,
                required_by,
            }) => {
                assert_eq!(dependency, "libfoo");
                assert_eq!(constraint, ">= 2.0");
                assert_eq!(required_by, "app 1.0");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_one_single_candidate_without_constraints() {
        let catalog = Catalog::new(vec![pkg("libfoo", "1.0", EXTRA)]);
        let cfg = config();
        let selector = CandidateSelector::new(&catalog, PriorityPolicy::new(&cfg));
        let parent = pkg("app", "1.0", MAIN).with_depends(&["libfoo"]);

        assert_eq!(selector.find(&parent, "libfoo").unwrap().version, "1.0");
    }
}
