//! Call resolution configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_CANDIDATES;

/// Configuration for the call resolver.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Cap on candidates returned for one call. Default: 20.
    pub max_candidates: Option<usize>,
    /// When every other lookup fails for a call with a known argument count,
    /// fall back to same-name methods of any arity. Default: true.
    pub relax_arity_fallback: Option<bool>,
}

impl ResolutionConfig {
    /// Returns the effective candidate cap, defaulting to 20.
    pub fn effective_max_candidates(&self) -> usize {
        self.max_candidates.unwrap_or(DEFAULT_MAX_CANDIDATES)
    }

    /// Returns whether the relaxed-arity fallback runs, defaulting to true.
    pub fn effective_relax_arity_fallback(&self) -> bool {
        self.relax_arity_fallback.unwrap_or(true)
    }
}
