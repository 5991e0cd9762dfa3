// src/priority/mod.rs

//! Repository pin priorities
//!
//! Maps a package's originating repository to an APT-style pin priority and
//! classifies it into an installation-preference tier. Tiers are checked in
//! this order when two candidates are compared:
//!
//! 1. blocked (`< 0`): never selected
//! 2. force install (`> 1000`)
//! 3. install even if lower (`== 1000`)
//! 4. preferred (`== 990`)
//! 5. default (everything else; `0` means unset and counts as 500)

use crate::config::ResolverConfig;
use crate::package::PackageRecord;
use crate::version;
use std::cmp::Ordering;
use tracing::debug;

pub const DEFAULT_PRIORITY: i32 = 500;
pub const PREFERRED_PRIORITY: i32 = 990;
pub const INSTALL_EVEN_IF_LOWER_PRIORITY: i32 = 1000;

/// Installation-preference tier of a pin priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityTier {
    Blocked,
    ForceInstall,
    InstallEvenIfLower,
    Preferred,
    Default,
}

impl PriorityTier {
    pub fn from_priority(priority: i32) -> Self {
        match priority {
            p if p < 0 => PriorityTier::Blocked,
            p if p > INSTALL_EVEN_IF_LOWER_PRIORITY => PriorityTier::ForceInstall,
            INSTALL_EVEN_IF_LOWER_PRIORITY => PriorityTier::InstallEvenIfLower,
            PREFERRED_PRIORITY => PriorityTier::Preferred,
            _ => PriorityTier::Default,
        }
    }

    /// Preference rank among selectable tiers; higher wins
    fn rank(self) -> u8 {
        match self {
            PriorityTier::Blocked => 0,
            PriorityTier::Default => 1,
            PriorityTier::Preferred => 2,
            PriorityTier::InstallEvenIfLower => 3,
            PriorityTier::ForceInstall => 4,
        }
    }
}

/// Repository context of a parent package, used for same-origin preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    pub base: String,
    /// The parent's repository is itself listed in the configuration
    pub configured: bool,
}

/// Priority lookups over an immutable configuration
#[derive(Debug, Clone, Copy)]
pub struct PriorityPolicy<'a> {
    config: &'a ResolverConfig,
}

impl<'a> PriorityPolicy<'a> {
    pub fn new(config: &'a ResolverConfig) -> Self {
        Self { config }
    }

    /// Repository base of a download URL: everything before the pool segment
    pub fn repo_base<'u>(&self, origin_url: &'u str) -> &'u str {
        match origin_url.find(&self.config.resolver.pool_segment) {
            Some(pos) => &origin_url[..pos],
            None => origin_url.trim_end_matches('/'),
        }
    }

    fn matching_entry(&self, repo_base: &str) -> Option<i32> {
        let base = repo_base.trim_end_matches('/');
        self.config
            .repositories
            .iter()
            .find(|entry| {
                let prefix = entry.repo_base_url_prefix.trim_end_matches('/');
                !prefix.is_empty() && base.starts_with(prefix)
            })
            .map(|entry| entry.priority)
    }

    /// Configured pin priority for an origin URL; `0` when unmatched
    pub fn priority_for(&self, origin_url: &str) -> i32 {
        self.matching_entry(self.repo_base(origin_url)).unwrap_or(0)
    }

    /// Pin priority with the unset value mapped to the default
    pub fn effective_priority(&self, pkg: &PackageRecord) -> i32 {
        match self.priority_for(&pkg.origin_url) {
            0 => DEFAULT_PRIORITY,
            p => p,
        }
    }

    pub fn tier(&self, pkg: &PackageRecord) -> PriorityTier {
        PriorityTier::from_priority(self.effective_priority(pkg))
    }

    pub fn is_blocked(&self, pkg: &PackageRecord) -> bool {
        self.tier(pkg) == PriorityTier::Blocked
    }

    /// Whether a repository base is covered by the configured priority list
    pub fn is_configured(&self, repo_base: &str) -> bool {
        self.matching_entry(repo_base).is_some()
    }

    pub fn context_of(&self, parent: &PackageRecord) -> RepoContext {
        let base = self.repo_base(&parent.origin_url).to_string();
        let configured = self.is_configured(&base);
        RepoContext { base, configured }
    }

    /// Whether a candidate comes from the parent's repository context
    pub fn matches_context(&self, ctx: &RepoContext, candidate: &PackageRecord) -> bool {
        let base = self.repo_base(&candidate.origin_url);
        base == ctx.base || (ctx.configured && self.is_configured(base))
    }

    /// Pick between two candidates for the same dependency
    ///
    /// Ties go to `first`. At priority exactly 1000 the versions are not
    /// compared at all, so `first` is kept even when it is older.
    pub fn prefer<'p>(
        &self,
        first: &'p PackageRecord,
        second: &'p PackageRecord,
        ctx: &RepoContext,
    ) -> &'p PackageRecord {
        let winner = self.compare_for_parent(first, second, ctx);
        let chosen = if winner == Ordering::Less { second } else { first };
        debug!(
            "Tie-break {} vs {} ({}): chose {}",
            first, second, ctx.base, chosen
        );
        chosen
    }

    /// `Greater`/`Equal` keeps `first`, `Less` switches to `second`
    fn compare_for_parent(
        &self,
        first: &PackageRecord,
        second: &PackageRecord,
        ctx: &RepoContext,
    ) -> Ordering {
        let (tier_a, tier_b) = (self.tier(first), self.tier(second));
        match (tier_a == PriorityTier::Blocked, tier_b == PriorityTier::Blocked) {
            (false, true) => return Ordering::Greater,
            (true, false) => return Ordering::Less,
            _ => {}
        }

        match tier_a.rank().cmp(&tier_b.rank()) {
            Ordering::Equal => {}
            ord => return ord,
        }

        let same_a = self.matches_context(ctx, first);
        let same_b = self.matches_context(ctx, second);
        if same_a != same_b {
            return same_a.cmp(&same_b);
        }

        let (prio_a, prio_b) = (self.effective_priority(first), self.effective_priority(second));
        match prio_a.cmp(&prio_b) {
            Ordering::Equal => {}
            ord => return ord,
        }

        if prio_a == INSTALL_EVEN_IF_LOWER_PRIORITY {
            return Ordering::Equal;
        }

        version::compare(&first.version, &second.version)
    }

    /// Ordering for candidate lists, best first: tier, priority, then version
    pub fn candidate_order(&self, a: &PackageRecord, b: &PackageRecord) -> Ordering {
        self.tier(b)
            .rank()
            .cmp(&self.tier(a).rank())
            .then_with(|| self.effective_priority(b).cmp(&self.effective_priority(a)))
            .then_with(|| version::compare(&b.version, &a.version))
    }
}
