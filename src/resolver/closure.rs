// src/resolver/closure.rs

//! Transitive dependency closure
//!
//! Breadth-first expansion from the requested packages. Every package that
//! enters the closure gets a slot in an arena; evicting a package (to make
//! room for a version that satisfies a later constraint) clears its live
//! flag instead of shifting the arena, so slots stay stable while the walk
//! continues. A replacement never brings back a record that was already
//! replaced once; constraints that would need that end in a version
//! conflict.
//!
//! The closure is keyed by package name: at most one live record per name.
//! Missing dependencies are collected rather than failing fast, so a single
//! run reports everything that could not be found.

use super::report::{ChainEdge, DependencyChainReport, MissingDependency, ReportSink};
use super::selector::CandidateSelector;
use crate::catalog::Catalog;
use crate::config::ResolverConfig;
use crate::dependency::{self, VersionConstraint};
use crate::error::{Error, Result};
use crate::package::PackageRecord;
use crate::priority::PriorityPolicy;
use std::collections::{HashMap, VecDeque};
use std::ptr;
use tracing::{debug, info, warn};

/// Result of a successful closure computation
#[derive(Debug, Clone, Default)]
pub struct Closure {
    /// Live packages, sorted by name
    pub packages: Vec<PackageRecord>,
    /// Number of packages replaced by a version satisfying a later constraint
    pub evictions: usize,
}

/// Mutable bookkeeping for one resolution run
struct WalkState<'a> {
    arena: Vec<&'a PackageRecord>,
    live: Vec<bool>,
    /// Package name -> arena slot of the live record with that name
    needed: HashMap<&'a str, usize>,
    /// Dependency name -> chosen record
    resolved: HashMap<String, &'a PackageRecord>,
    /// Arena slots waiting to have their dependencies walked
    queue: VecDeque<usize>,
    edges: Vec<ChainEdge>,
    missing: Vec<MissingDependency>,
    evictions: usize,
}

impl<'a> WalkState<'a> {
    fn new() -> Self {
        Self {
            arena: Vec::new(),
            live: Vec::new(),
            needed: HashMap::new(),
            resolved: HashMap::new(),
            queue: VecDeque::new(),
            edges: Vec::new(),
            missing: Vec::new(),
            evictions: 0,
        }
    }

    fn record_edge(&mut self, parent: &PackageRecord, child: &PackageRecord) {
        self.edges.push(ChainEdge {
            parent: parent.to_string(),
            child: child.to_string(),
        });
    }

    fn live_record(&self, name: &str) -> Option<&'a PackageRecord> {
        self.needed.get(name).map(|&slot| self.arena[slot])
    }

    /// Record already standing in for `name`, by dependency alias or package name
    fn chosen_for(&self, name: &str) -> Option<&'a PackageRecord> {
        self.resolved
            .get(name)
            .copied()
            .or_else(|| self.live_record(name))
    }

    /// Take `pkg` into the closure and schedule it, unless its name is already live
    fn admit(&mut self, pkg: &'a PackageRecord) -> bool {
        if self.needed.contains_key(pkg.name.as_str()) {
            return false;
        }
        let slot = self.arena.len();
        self.arena.push(pkg);
        self.live.push(true);
        self.needed.insert(pkg.name.as_str(), slot);
        self.queue.push_back(slot);
        true
    }

    /// Drop `pkg` from the closure if it is the live record for its name
    fn evict(&mut self, pkg: &'a PackageRecord) {
        if let Some(&slot) = self.needed.get(pkg.name.as_str()) {
            if ptr::eq(self.arena[slot], pkg) {
                self.live[slot] = false;
                self.needed.remove(pkg.name.as_str());
            }
        }
    }

    /// Whether `pkg` was part of the closure once and has been replaced since
    fn was_evicted(&self, pkg: &PackageRecord) -> bool {
        self.arena
            .iter()
            .zip(&self.live)
            .any(|(record, live)| !*live && ptr::eq(*record, pkg))
    }

    fn into_packages(self) -> Vec<PackageRecord> {
        let mut packages: Vec<PackageRecord> = self
            .arena
            .iter()
            .zip(&self.live)
            .filter(|(_, live)| **live)
            .map(|(pkg, _)| (*pkg).clone())
            .collect();
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        packages
    }
}

/// Computes the transitive closure of a set of requested packages
pub struct ClosureResolver<'a> {
    catalog: &'a Catalog,
    selector: CandidateSelector<'a>,
    policy: PriorityPolicy<'a>,
    sink: Option<&'a dyn ReportSink>,
}

impl<'a> ClosureResolver<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a ResolverConfig) -> Self {
        let policy = PriorityPolicy::new(config);
        Self {
            catalog,
            selector: CandidateSelector::new(catalog, policy),
            policy,
            sink: None,
        }
    }

    /// Hand dependency-chain reports to `sink` when resolution fails
    pub fn with_report_sink(mut self, sink: &'a dyn ReportSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Resolve the closure and return its packages sorted by name
    pub fn resolve(&self, requested: &[PackageRecord]) -> Result<Vec<PackageRecord>> {
        self.resolve_closure(requested).map(|closure| closure.packages)
    }

    /// Resolve the closure, keeping the eviction count
    pub fn resolve_closure(&self, requested: &[PackageRecord]) -> Result<Closure> {
        let mut state = WalkState::new();

        for pkg in self.locate_requested(requested)? {
            if !state.admit(pkg) {
                debug!("Skipping request {}: {} is already requested", pkg, pkg.name);
            }
        }

        while let Some(slot) = state.queue.pop_front() {
            let current = state.arena[slot];
            if !state.live[slot] {
                debug!("Skipping {}: replaced before it was processed", current);
                continue;
            }

            debug!("Processing {} ({} dependencies)", current, current.requires.len());
            for dep_name in &current.requires {
                self.process_dependency(&mut state, current, dep_name)?;
            }
        }

        if !state.missing.is_empty() {
            let report = DependencyChainReport::new(state.edges, state.missing);
            warn!(
                "{} dependencies could not be resolved: {}",
                report.missing.len(),
                report.missing_summary()
            );
            if let Some(sink) = self.sink {
                if let Err(e) = sink.write_report(&report) {
                    warn!("Failed to write dependency chain report: {}", e);
                }
            }
            return Err(Error::MissingDependencies {
                report: Box::new(report),
            });
        }

        let evictions = state.evictions;
        let packages = state.into_packages();
        info!(
            "Resolved {} packages from {} requested ({} evictions)",
            packages.len(),
            requested.len(),
            evictions
        );

        Ok(Closure {
            packages,
            evictions,
        })
    }

    /// Map the caller's requested records onto catalog entries
    fn locate_requested(&self, requested: &[PackageRecord]) -> Result<Vec<&'a PackageRecord>> {
        requested
            .iter()
            .map(|req| {
                if req.version.is_empty() {
                    return Err(Error::NotRequested {
                        name: req.name.clone(),
                        version: String::new(),
                    });
                }
                self.catalog
                    .find_exact(&req.name, &req.version)
                    .ok_or_else(|| Error::NotRequested {
                        name: req.name.clone(),
                        version: req.version.clone(),
                    })
            })
            .collect()
    }

    fn process_dependency(
        &self,
        state: &mut WalkState<'a>,
        current: &'a PackageRecord,
        dep_name: &str,
    ) -> Result<()> {
        if let Some(existing) = state.chosen_for(dep_name) {
            state.resolved.insert(dep_name.to_string(), existing);
            state.record_edge(current, existing);
            return self.verify_resolved(state, current, dep_name, existing);
        }

        let failure = match self.selector.find(current, dep_name) {
            Ok(chosen) => return self.adopt(state, current, dep_name, chosen),
            Err(e) => e,
        };
        debug!("{} -> {}: {}", current, dep_name, failure);

        if self.try_alternatives(state, current, dep_name)? {
            return Ok(());
        }

        warn!("Missing dependency {} required by {}", dep_name, current);
        state.missing.push(MissingDependency {
            required_by: current.to_string(),
            dependency: dep_name.to_string(),
            reason: failure.to_string(),
        });
        Ok(())
    }

    /// Record `chosen` as the provider of `dep_name` and schedule it
    fn adopt(
        &self,
        state: &mut WalkState<'a>,
        current: &'a PackageRecord,
        dep_name: &str,
        chosen: &'a PackageRecord,
    ) -> Result<()> {
        if let Some(existing) = state.live_record(&chosen.name) {
            if !ptr::eq(existing, chosen) {
                // Another version of this package is already in the closure
                state.resolved.insert(dep_name.to_string(), existing);
                state.record_edge(current, existing);
                return self.verify_resolved(state, current, dep_name, existing);
            }
        }

        state.resolved.insert(dep_name.to_string(), chosen);
        state.record_edge(current, chosen);
        state.admit(chosen);
        Ok(())
    }

    /// Check an earlier choice against `current`'s constraints, replacing it if needed
    fn verify_resolved(
        &self,
        state: &mut WalkState<'a>,
        current: &'a PackageRecord,
        dep_name: &str,
        existing: &'a PackageRecord,
    ) -> Result<()> {
        let (constraints, _) = dependency::extract_constraints(&current.requires_raw, dep_name);
        let direct: Vec<VersionConstraint> =
            constraints.into_iter().filter(|c| c.is_direct()).collect();

        if dependency::satisfies_all(&existing.version, &direct) {
            return Ok(());
        }

        debug!(
            "{} does not satisfy {} {} required by {}",
            existing,
            dep_name,
            dependency::describe(&direct),
            current
        );

        let replacement = self.find_replacement(current, dep_name, &direct);
        let ctx = self.policy.context_of(current);

        match replacement {
            Some(candidate)
                if !state.was_evicted(candidate)
                    && self.replacement_fits(state, existing, candidate)
                    && ptr::eq(self.policy.prefer(candidate, existing, &ctx), candidate) =>
            {
                self.replace(state, dep_name, existing, candidate);
                Ok(())
            }
            other => Err(Error::VersionConflict {
                package: dep_name.to_string(),
                resolved_name: existing.name.clone(),
                resolved_version: existing.version.clone(),
                required_name: other
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| dep_name.to_string()),
                required_version: other
                    .map(|c| c.version.clone())
                    .unwrap_or_else(|| dependency::describe(&direct)),
                required_by: current.to_string(),
            }),
        }
    }

    fn find_replacement(
        &self,
        current: &PackageRecord,
        dep_name: &str,
        direct: &[VersionConstraint],
    ) -> Option<&'a PackageRecord> {
        let candidates: Vec<&'a PackageRecord> = self
            .selector
            .select(dep_name)
            .ok()?
            .into_iter()
            .filter(|c| dependency::satisfies_all(&c.version, direct))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        self.selector.resolve_one(current, dep_name, &candidates).ok()
    }

    /// A replacement must not collide with a different live package of its name
    fn replacement_fits(
        &self,
        state: &WalkState<'a>,
        existing: &'a PackageRecord,
        candidate: &'a PackageRecord,
    ) -> bool {
        candidate.name == existing.name
            || state
                .live_record(&candidate.name)
                .is_none_or(|bound| ptr::eq(bound, candidate))
    }

    fn replace(
        &self,
        state: &mut WalkState<'a>,
        dep_name: &str,
        old: &'a PackageRecord,
        new: &'a PackageRecord,
    ) {
        warn!("Replacing {} with {} to satisfy {}", old, new, dep_name);

        state.evict(old);
        if old.name != new.name {
            state.resolved.remove(old.name.as_str());
        }
        for chosen in state.resolved.values_mut() {
            if ptr::eq(*chosen, old) {
                *chosen = new;
            }
        }
        state.resolved.insert(dep_name.to_string(), new);
        state.admit(new);
        state.evictions += 1;
    }

    /// Fall back to the other alternatives of the clause naming `dep_name`
    fn try_alternatives(
        &self,
        state: &mut WalkState<'a>,
        current: &'a PackageRecord,
        dep_name: &str,
    ) -> Result<bool> {
        let (constraints, _) = dependency::extract_constraints(&current.requires_raw, dep_name);
        let mut alternatives: Vec<String> = Vec::new();
        for constraint in constraints {
            for alt in constraint.alternative_names {
                if alt != dep_name && !alternatives.contains(&alt) {
                    alternatives.push(alt);
                }
            }
        }

        for alt in &alternatives {
            if let Some(existing) = state.chosen_for(alt) {
                let (alt_constraints, _) =
                    dependency::extract_constraints(&current.requires_raw, alt);
                if dependency::satisfies_all(&existing.version, &alt_constraints) {
                    debug!("{} satisfied by already selected alternative {}", dep_name, existing);
                    state.record_edge(current, existing);
                    return Ok(true);
                }
                continue;
            }

            match self.selector.find(current, alt) {
                Ok(chosen) => {
                    info!("Using alternative {} for {} (required by {})", chosen, dep_name, current);
                    self.adopt(state, current, alt, chosen)?;
                    return Ok(true);
                }
                Err(e) => debug!("Alternative {} for {} unavailable: {}", alt, dep_name, e),
            }
        }

        Ok(false)
    }
}
