//! Reachability types: limits, per-traversal state, outcome and diagnostics.

use std::collections::VecDeque;

use serde::Serialize;

use crudmap_core::config::TraversalConfig;
use crudmap_core::types::{ClassId, FxHashMap, FxHashSet, MethodId};

use crate::boundaries::{ColumnUsage, DbHint, ExtractedFacts, TableReference};
use crate::call_graph::ResolutionDiagnostics;

/// Bounds for one traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalLimits {
    /// Calls of a method at this depth are not followed.
    pub max_depth: u32,
    /// Visiting stops once this many methods have been visited.
    pub max_nodes: usize,
    pub skip_leaf_methods: bool,
    pub debug_samples: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self::from_config(&TraversalConfig::default())
    }
}

impl TraversalLimits {
    pub fn from_config(config: &TraversalConfig) -> Self {
        Self {
            max_depth: config.effective_max_call_depth(),
            max_nodes: config.effective_max_call_nodes().max(1),
            skip_leaf_methods: config.effective_skip_leaf_methods(),
            debug_samples: config.effective_debug_samples(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes.max(1);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallSampleKind {
    Unresolved,
    Ambiguous,
}

/// A call the resolver could not pin down, kept for debugging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSample {
    pub kind: CallSampleKind,
    pub depth: u32,
    pub caller: String,
    pub name: String,
    pub qualifier: Option<String>,
    pub arg_count: Option<usize>,
    pub resolved_count: usize,
    /// First few candidate method keys.
    pub resolved_sample: Vec<String>,
}

/// A visited method that looks database-bound but yielded no reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmappedDbMethod {
    pub method: String,
    pub hints: Vec<DbHint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraversalDiagnostics {
    pub entry_methods: usize,
    pub visited: usize,
    pub max_depth_seen: u32,
    pub references: usize,
    pub skipped_calls_by_depth: usize,
    pub skipped_leaf_candidates: usize,
    /// Node budget hit with work still queued.
    pub truncated: bool,
    pub queue_remaining: usize,
    pub cancelled: bool,
    pub extraction_cache_hits: usize,
    pub rejected_candidates: usize,
    pub resolution: ResolutionDiagnostics,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub call_samples: Vec<CallSample>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmapped_db_methods: Vec<UnmappedDbMethod>,
}

impl TraversalDiagnostics {
    pub fn unresolved_calls(&self) -> usize {
        self.resolution.unresolved
    }

    pub fn ambiguous_calls(&self) -> usize {
        self.resolution.ambiguous
    }
}

/// What one traversal found.
#[derive(Debug, Clone, Default)]
pub struct TraversalOutcome {
    /// Methods in visit order.
    pub visited: Vec<MethodId>,
    /// References in visit order, each method's in extraction order.
    pub references: Vec<TableReference>,
    /// Heuristic column hits merged per table.
    pub columns_used: Vec<ColumnUsage>,
    /// Classes other than the entry class that owned a visited method, in first-visit order.
    pub related_classes: Vec<ClassId>,
    pub diagnostics: TraversalDiagnostics,
}

/// Mutable state of one traversal. Never shared between traversals.
#[derive(Debug, Default)]
pub struct TraversalState {
    pub queue: VecDeque<(MethodId, u32)>,
    pub enqueued: FxHashSet<MethodId>,
    pub visited: FxHashSet<MethodId>,
    pub outcome: TraversalOutcome,
    related: FxHashSet<ClassId>,
    column_slots: FxHashMap<String, usize>,
}

impl TraversalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a method unless it was already queued. Returns whether it was added.
    pub fn enqueue(&mut self, method: MethodId, depth: u32) -> bool {
        if self.visited.contains(&method) || !self.enqueued.insert(method) {
            return false;
        }
        self.queue.push_back((method, depth));
        true
    }

    pub fn is_known(&self, method: MethodId) -> bool {
        self.visited.contains(&method) || self.enqueued.contains(&method)
    }

    pub fn add_related(&mut self, class: ClassId) {
        if self.related.insert(class) {
            self.outcome.related_classes.push(class);
        }
    }

    /// Append a method's references and merge its column hits, deduplicating columns by name.
    pub fn absorb(&mut self, facts: &ExtractedFacts) {
        self.outcome.references.extend(facts.references.iter().cloned());
        for usage in &facts.columns_used {
            let key = usage.table.to_uppercase();
            let slot = match self.column_slots.get(&key) {
                Some(&slot) => slot,
                None => {
                    let slot = self.outcome.columns_used.len();
                    self.column_slots.insert(key, slot);
                    self.outcome.columns_used.push(ColumnUsage {
                        table: usage.table.clone(),
                        columns: Vec::new(),
                    });
                    slot
                }
            };
            let merged = &mut self.outcome.columns_used[slot].columns;
            for hit in &usage.columns {
                if !merged.iter().any(|c| c.name == hit.name) {
                    merged.push(hit.clone());
                }
            }
        }
    }

    pub fn into_outcome(self) -> TraversalOutcome {
        self.outcome
    }
}
