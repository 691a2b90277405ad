//! Resolution tiers, results, policy and diagnostics.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crudmap_core::config::ResolutionConfig;
use crudmap_core::constants::{IN_CLASS_AMBIGUOUS_SAMPLE, IN_CLASS_SAMPLE, RELAXED_SAMPLE};
use crudmap_core::types::MethodId;

/// Lookup strategy that produced a call's candidates. Tiers are tried in
/// declaration order; later tiers only run when earlier ones found nothing
/// (the first two may both contribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    /// Unqualified, `this` or `super`: overloads in the caller's own class.
    SameClass,
    /// Receiver is a known short class name: overloads in every class so named.
    NamedClass,
    /// Overloads in the types the caller's class declares references to.
    TypeReference,
    /// Any method with that name, arity-filtered.
    GlobalName,
    /// Any method with that name, arity ignored.
    RelaxedGlobal,
}

impl ResolutionTier {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SameClass => "same_class",
            Self::NamedClass => "named_class",
            Self::TypeReference => "type_reference",
            Self::GlobalName => "global_name",
            Self::RelaxedGlobal => "relaxed_global",
        }
    }

    /// All tiers in fallback order.
    pub fn all_ordered() -> &'static [ResolutionTier] {
        &[
            Self::SameClass,
            Self::NamedClass,
            Self::TypeReference,
            Self::GlobalName,
            Self::RelaxedGlobal,
        ]
    }
}

impl std::fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Candidates for one call, deduplicated, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResolution {
    pub candidates: Arc<[MethodId]>,
    /// First tier that produced a candidate; `None` when unresolved.
    pub tier: Option<ResolutionTier>,
}

impl CallResolution {
    pub fn unresolved() -> Self {
        Self {
            candidates: Arc::from(Vec::new()),
            tier: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.candidates.is_empty()
    }

    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

/// Caps and switches the resolver applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverPolicy {
    /// Final cap on candidates per call; also caps the global-name tier.
    pub max_candidates: usize,
    /// Enables `RelaxedGlobal`.
    pub relax_arity_fallback: bool,
    /// Overloads kept from one class after arity filtering (or when arity is unknown).
    pub in_class_sample: usize,
    /// Overloads kept from one class when none match the arity.
    pub ambiguous_sample: usize,
    /// Same-name methods taken by `RelaxedGlobal`.
    pub relaxed_sample: usize,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self::from_config(&ResolutionConfig::default())
    }
}

impl ResolverPolicy {
    pub fn from_config(config: &ResolutionConfig) -> Self {
        Self {
            max_candidates: config.effective_max_candidates().max(1),
            relax_arity_fallback: config.effective_relax_arity_fallback(),
            in_class_sample: IN_CLASS_SAMPLE,
            ambiguous_sample: IN_CLASS_AMBIGUOUS_SAMPLE,
            relaxed_sample: RELAXED_SAMPLE,
        }
    }
}

/// Call resolution counts for one traversal or a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionDiagnostics {
    pub total_calls: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub ambiguous: usize,
    /// Calls to names such as `toString` or `add` that are never followed.
    pub ignored: usize,
    pub by_tier: BTreeMap<&'static str, usize>,
}

impl ResolutionDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, resolution: &CallResolution) {
        self.total_calls += 1;
        match resolution.tier {
            Some(tier) if resolution.is_resolved() => {
                self.resolved += 1;
                *self.by_tier.entry(tier.name()).or_default() += 1;
                if resolution.is_ambiguous() {
                    self.ambiguous += 1;
                }
            }
            _ => self.unresolved += 1,
        }
    }

    pub fn record_ignored(&mut self) {
        self.total_calls += 1;
        self.ignored += 1;
    }

    pub fn merge(&mut self, other: &ResolutionDiagnostics) {
        self.total_calls += other.total_calls;
        self.resolved += other.resolved;
        self.unresolved += other.unresolved;
        self.ambiguous += other.ambiguous;
        self.ignored += other.ignored;
        for (tier, count) in &other.by_tier {
            *self.by_tier.entry(*tier).or_default() += count;
        }
    }

    /// Share of followed (non-ignored) calls that resolved.
    pub fn resolution_rate(&self) -> f64 {
        let followed = self.total_calls - self.ignored;
        if followed == 0 {
            0.0
        } else {
            self.resolved as f64 / followed as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution(ids: &[u32], tier: Option<ResolutionTier>) -> CallResolution {
        CallResolution {
            candidates: ids.iter().map(|&i| MethodId(i)).collect(),
            tier,
        }
    }

    #[test]
    fn diagnostics_count_by_outcome() {
        let mut diag = ResolutionDiagnostics::new();
        diag.record(&resolution(&[1], Some(ResolutionTier::SameClass)));
        diag.record(&resolution(&[2, 3], Some(ResolutionTier::GlobalName)));
        diag.record(&CallResolution::unresolved());
        diag.record_ignored();

        assert_eq!(diag.total_calls, 4);
        assert_eq!(diag.resolved, 2);
        assert_eq!(diag.ambiguous, 1);
        assert_eq!(diag.unresolved, 1);
        assert_eq!(diag.ignored, 1);
        assert_eq!(diag.by_tier["global_name"], 1);
        assert!((diag.resolution_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn merge_adds_up() {
        let mut a = ResolutionDiagnostics::new();
        a.record(&resolution(&[1], Some(ResolutionTier::SameClass)));
        let mut b = ResolutionDiagnostics::new();
        b.record(&resolution(&[4], Some(ResolutionTier::SameClass)));
        b.record_ignored();
        a.merge(&b);
        assert_eq!(a.total_calls, 3);
        assert_eq!(a.by_tier["same_class"], 2);
    }

    #[test]
    fn tiers_are_ordered() {
        let tiers = ResolutionTier::all_ordered();
        assert!(tiers.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(tiers[4].to_string(), "relaxed_global");
    }
}
