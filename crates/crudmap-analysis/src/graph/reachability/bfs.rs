//! Bounded breadth-first traversal from an entry class.
//!
//! Entry methods sit at depth 0. A method is extracted when visited; its
//! calls are resolved and followed only while its depth is below
//! `max_depth`. Visiting stops when `max_nodes` methods have been visited,
//! the queue drains, or the cancellation token fires.

use crudmap_core::traits::Cancellable;
use crudmap_core::types::{ClassId, MethodId};

use super::types::{
    CallSample, CallSampleKind, TraversalLimits, TraversalOutcome, TraversalState,
    UnmappedDbMethod,
};
use crate::boundaries::{hints, ExtractionCache, ReferenceExtractor};
use crate::call_graph::{is_noise_call, CallResolution, CallResolver};
use crate::index::ProgramModelIndex;
use crate::model::{CallDescriptor, MethodRecord};

/// Candidate keys kept in an ambiguous-call sample.
const SAMPLE_CANDIDATES: usize = 5;

/// Hint hits kept per unmapped DB method.
const SAMPLE_HINTS: usize = 12;

/// Walks the call graph of one entry class at a time.
///
/// The resolver and extraction cache are shared and may be used from
/// several traversals at once; each traversal owns its own state.
pub struct ReachabilityTraverser<'a> {
    index: &'a ProgramModelIndex,
    resolver: &'a CallResolver<'a>,
    extractor: &'a ReferenceExtractor<'a>,
    extraction_cache: &'a ExtractionCache,
    limits: TraversalLimits,
    cancel: Option<&'a dyn Cancellable>,
}

impl<'a> ReachabilityTraverser<'a> {
    pub fn new(
        resolver: &'a CallResolver<'a>,
        extractor: &'a ReferenceExtractor<'a>,
        extraction_cache: &'a ExtractionCache,
        limits: TraversalLimits,
    ) -> Self {
        Self {
            index: resolver.index(),
            resolver,
            extractor,
            extraction_cache,
            limits,
            cancel: None,
        }
    }

    /// Check `token` before every dequeue.
    pub fn with_cancellation(mut self, token: &'a dyn Cancellable) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn limits(&self) -> &TraversalLimits {
        &self.limits
    }

    /// Traverse from every method the entry class declares.
    pub fn traverse(&self, entry_class: ClassId) -> TraversalOutcome {
        let index = self.index;
        self.traverse_from(entry_class, &index.class(entry_class).methods)
    }

    /// Traverse from the given entry methods. Methods reached outside
    /// `entry_class` mark their owning class as related.
    pub fn traverse_from(&self, entry_class: ClassId, entry_methods: &[MethodId]) -> TraversalOutcome {
        let entry = self.index.class(entry_class);
        let span = tracing::debug_span!("traverse", entry = %entry.short_name);
        let _guard = span.enter();

        let mut state = TraversalState::new();
        for &method in entry_methods {
            state.enqueue(method, 0);
        }
        state.outcome.diagnostics.entry_methods = state.queue.len();

        while state.visited.len() < self.limits.max_nodes {
            if self.cancel.is_some_and(|c| c.is_cancelled()) {
                state.outcome.diagnostics.cancelled = true;
                break;
            }
            let Some((method_id, depth)) = state.queue.pop_front() else {
                break;
            };
            if !state.visited.insert(method_id) {
                continue;
            }
            self.visit(&mut state, entry_class, method_id, depth);
        }

        let diag = &mut state.outcome.diagnostics;
        diag.visited = state.visited.len();
        diag.references = state.outcome.references.len();
        if !diag.cancelled && !state.queue.is_empty() {
            diag.truncated = true;
            diag.queue_remaining = state.queue.len();
        }
        tracing::debug!(
            visited = diag.visited,
            references = diag.references,
            truncated = diag.truncated,
            queue_remaining = diag.queue_remaining,
            max_depth_seen = diag.max_depth_seen,
            unresolved = diag.resolution.unresolved,
            ambiguous = diag.resolution.ambiguous,
            "traversal finished"
        );
        state.into_outcome()
    }

    fn visit(&self, state: &mut TraversalState, entry_class: ClassId, method_id: MethodId, depth: u32) {
        let method = self.index.method(method_id);
        let owner = self.index.class(method.class);

        state.outcome.visited.push(method_id);
        let diag = &mut state.outcome.diagnostics;
        diag.max_depth_seen = diag.max_depth_seen.max(depth);
        if method.class != entry_class {
            state.add_related(method.class);
        }

        let (facts, cache_hit) = self.extraction_cache.get_or_extract(method_id, || {
            self.extractor.extract(&method.text, &owner.short_name, &method.name)
        });
        let diag = &mut state.outcome.diagnostics;
        if cache_hit {
            diag.extraction_cache_hits += 1;
        }
        diag.rejected_candidates += facts.rejected_candidates;
        if facts.is_empty() && method.has_db_hints && diag.unmapped_db_methods.len() < self.limits.debug_samples {
            diag.unmapped_db_methods.push(UnmappedDbMethod {
                method: self.index.method_key(method_id),
                hints: hints::scan(&method.text, SAMPLE_HINTS),
            });
        }
        state.absorb(&facts);

        if depth >= self.limits.max_depth {
            state.outcome.diagnostics.skipped_calls_by_depth += method.calls.len();
            return;
        }

        for call in &method.calls {
            if is_noise_call(call.name.trim()) {
                state.outcome.diagnostics.resolution.record_ignored();
                continue;
            }
            let resolution = self.resolver.resolve(method.class, call);
            state.outcome.diagnostics.resolution.record(&resolution);
            self.sample_call(state, method, call, &resolution, depth);

            for &candidate in resolution.candidates.iter() {
                if state.is_known(candidate) {
                    continue;
                }
                if self.limits.skip_leaf_methods && self.index.method(candidate).is_inert_leaf() {
                    state.outcome.diagnostics.skipped_leaf_candidates += 1;
                    continue;
                }
                state.enqueue(candidate, depth + 1);
            }
        }
    }

    fn sample_call(
        &self,
        state: &mut TraversalState,
        caller: &MethodRecord,
        call: &CallDescriptor,
        resolution: &CallResolution,
        depth: u32,
    ) {
        let samples = &mut state.outcome.diagnostics.call_samples;
        if samples.len() >= self.limits.debug_samples {
            return;
        }
        let kind = match resolution.candidates.len() {
            0 => CallSampleKind::Unresolved,
            1 => return,
            _ => CallSampleKind::Ambiguous,
        };
        samples.push(CallSample {
            kind,
            depth,
            caller: self.index.method_key(caller.id),
            name: call.name.clone(),
            qualifier: call.qualifier.clone(),
            arg_count: call.arg_count,
            resolved_count: resolution.candidates.len(),
            resolved_sample: resolution
                .candidates
                .iter()
                .take(SAMPLE_CANDIDATES)
                .map(|&m| self.index.method_key(m))
                .collect(),
        });
    }
}
