//! Traversal configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_CALL_NODES};

/// Bounds and switches for the per-entry-class call graph walk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TraversalConfig {
    /// Maximum call depth below an entry method. Default: 8.
    pub max_call_depth: Option<u32>,
    /// Maximum methods visited per entry class. Default: 800.
    pub max_call_nodes: Option<usize>,
    /// Skip resolved callees with no calls, no SQL literals and no DB hints. Default: true.
    pub skip_leaf_methods: Option<bool>,
    /// Analyze entry classes on the rayon pool. Default: true.
    pub parallel: Option<bool>,
    /// Unresolved/ambiguous call samples and unmapped DB methods kept per
    /// entry class for debugging. Default: 0 (off).
    pub debug_samples: Option<usize>,
}

impl TraversalConfig {
    pub fn effective_max_call_depth(&self) -> u32 {
        self.max_call_depth.unwrap_or(DEFAULT_MAX_CALL_DEPTH)
    }

    pub fn effective_max_call_nodes(&self) -> usize {
        self.max_call_nodes.unwrap_or(DEFAULT_MAX_CALL_NODES)
    }

    pub fn effective_skip_leaf_methods(&self) -> bool {
        self.skip_leaf_methods.unwrap_or(true)
    }

    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    pub fn effective_debug_samples(&self) -> usize {
        self.debug_samples.unwrap_or(0)
    }
}
