//! Tiered call resolution.
//!
//! 1. SameClass: unqualified, `this` or `super` calls look in the caller's class.
//! 2. NamedClass: a receiver that is a known short class name looks in each class so named.
//! 3. TypeReference: otherwise, the classes the caller's class declares references to.
//! 4. GlobalName: otherwise, any method with the name, arity-filtered.
//! 5. RelaxedGlobal: otherwise, with a known arity, any method with the name.
//!
//! Results are deduplicated in discovery order and capped.

use std::sync::Arc;

use crudmap_core::types::{ClassId, FxHashSet, MethodId, NameId};

use super::cache::{ResolveKey, ResolverCache};
use super::qualifier::{is_self_reference, simplify_qualifier};
use super::types::{CallResolution, ResolutionTier, ResolverPolicy};
use crate::index::ProgramModelIndex;
use crate::model::CallDescriptor;

/// Method names too generic to follow: object plumbing, collections, fluent helpers.
const NOISE_METHOD_NAMES: &[&str] = &[
    "toString", "equals", "hashCode", "getClass", "clone", "finalize",
    "size", "isEmpty", "add", "put", "remove", "contains", "containsKey",
    "append", "format", "valueOf",
];

pub fn is_noise_call(name: &str) -> bool {
    NOISE_METHOD_NAMES.contains(&name)
}

/// A call site after name interning and qualifier simplification.
#[derive(Debug, Clone, Copy)]
pub struct CallQuery<'q> {
    pub caller: ClassId,
    pub name: NameId,
    pub arg_count: Option<usize>,
    pub qualifier: Option<&'q str>,
}

/// Overloads of the queried name in `class`.
///
/// With an unknown arity the first few overloads are taken as-is. With a
/// known arity, overloads whose parameter count matches (or is unknown) are
/// kept; if none match, a lone overload is still accepted, since generated
/// code often calls through wrappers, and otherwise a small sample is taken.
pub fn pick_in_class(
    index: &ProgramModelIndex,
    class: ClassId,
    query: &CallQuery<'_>,
    policy: &ResolverPolicy,
) -> Vec<MethodId> {
    let overloads = index.methods_in_class(class, query.name);
    if overloads.is_empty() {
        return Vec::new();
    }
    let Some(arg_count) = query.arg_count else {
        return overloads.iter().take(policy.in_class_sample).copied().collect();
    };

    let matching: Vec<MethodId> = overloads
        .iter()
        .copied()
        .filter(|&m| index.method(m).accepts_arity(arg_count))
        .take(policy.in_class_sample)
        .collect();
    if !matching.is_empty() {
        return matching;
    }
    if overloads.len() == 1 {
        return vec![overloads[0]];
    }
    overloads.iter().take(policy.ambiguous_sample).copied().collect()
}

pub fn resolve_same_class(
    index: &ProgramModelIndex,
    query: &CallQuery<'_>,
    policy: &ResolverPolicy,
) -> Vec<MethodId> {
    if !is_self_reference(query.qualifier) {
        return Vec::new();
    }
    pick_in_class(index, query.caller, query, policy)
}

pub fn resolve_named_class(
    index: &ProgramModelIndex,
    query: &CallQuery<'_>,
    policy: &ResolverPolicy,
) -> Vec<MethodId> {
    let Some(qualifier) = query.qualifier else {
        return Vec::new();
    };
    index
        .classes_named(qualifier)
        .iter()
        .flat_map(|&class| pick_in_class(index, class, query, policy))
        .collect()
}

/// Short name of a declared type: `java.util.List<Order>` gives `List`.
fn type_short_name(type_ref: &str) -> &str {
    let base = type_ref.split(['<', '[']).next().unwrap_or(type_ref).trim();
    base.rsplit('.').next().unwrap_or(base)
}

pub fn resolve_type_references(
    index: &ProgramModelIndex,
    query: &CallQuery<'_>,
    policy: &ResolverPolicy,
) -> Vec<MethodId> {
    let mut seen = FxHashSet::default();
    index
        .class(query.caller)
        .type_references
        .iter()
        .map(|t| type_short_name(t))
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .flat_map(|name| index.classes_named(name))
        .flat_map(|&class| pick_in_class(index, class, query, policy))
        .collect()
}

pub fn resolve_global_name(
    index: &ProgramModelIndex,
    query: &CallQuery<'_>,
    policy: &ResolverPolicy,
) -> Vec<MethodId> {
    index
        .methods_named(query.name)
        .iter()
        .copied()
        .filter(|&m| query.arg_count.map_or(true, |n| index.method(m).accepts_arity(n)))
        .take(policy.max_candidates)
        .collect()
}

pub fn resolve_relaxed_global(
    index: &ProgramModelIndex,
    query: &CallQuery<'_>,
    policy: &ResolverPolicy,
) -> Vec<MethodId> {
    if !policy.relax_arity_fallback || query.arg_count.is_none() {
        return Vec::new();
    }
    index
        .methods_named(query.name)
        .iter()
        .take(policy.relaxed_sample)
        .copied()
        .collect()
}

type TierFn = fn(&ProgramModelIndex, &CallQuery<'_>, &ResolverPolicy) -> Vec<MethodId>;

const TIERS: [(ResolutionTier, TierFn); 5] = [
    (ResolutionTier::SameClass, resolve_same_class),
    (ResolutionTier::NamedClass, resolve_named_class),
    (ResolutionTier::TypeReference, resolve_type_references),
    (ResolutionTier::GlobalName, resolve_global_name),
    (ResolutionTier::RelaxedGlobal, resolve_relaxed_global),
];

/// Number of leading tiers that always run; the rest are fallbacks.
const ALWAYS_RUN: usize = 2;

/// Run the tiers for one query without touching any cache.
pub fn resolve_uncached(
    index: &ProgramModelIndex,
    query: &CallQuery<'_>,
    policy: &ResolverPolicy,
) -> CallResolution {
    let mut found: Vec<MethodId> = Vec::new();
    let mut first_tier = None;
    for (i, (tier, resolve)) in TIERS.iter().enumerate() {
        if i >= ALWAYS_RUN && !found.is_empty() {
            break;
        }
        let hits = resolve(index, query, policy);
        if first_tier.is_none() && !hits.is_empty() {
            first_tier = Some(*tier);
        }
        found.extend(hits);
    }

    let mut seen = FxHashSet::default();
    let candidates: Arc<[MethodId]> = found
        .into_iter()
        .filter(|m| seen.insert(*m))
        .take(policy.max_candidates)
        .collect();
    CallResolution {
        candidates,
        tier: first_tier,
    }
}

/// Resolves call sites against one program index, memoizing by
/// (caller class, name, arity, simplified qualifier).
pub struct CallResolver<'i> {
    index: &'i ProgramModelIndex,
    policy: ResolverPolicy,
    cache: ResolverCache,
}

impl<'i> CallResolver<'i> {
    pub fn new(index: &'i ProgramModelIndex, policy: ResolverPolicy) -> Self {
        let capacity = index.stats().calls.max(index.method_count()) as u64;
        Self {
            index,
            policy,
            cache: ResolverCache::new(capacity),
        }
    }

    pub fn index(&self) -> &'i ProgramModelIndex {
        self.index
    }

    pub fn policy(&self) -> &ResolverPolicy {
        &self.policy
    }

    pub fn cache(&self) -> &ResolverCache {
        &self.cache
    }

    /// Candidate methods for `call` made from a method of `caller`.
    /// Noise names and names no method carries resolve to nothing.
    pub fn resolve(&self, caller: ClassId, call: &CallDescriptor) -> CallResolution {
        let name = call.name.trim();
        if name.is_empty() || is_noise_call(name) {
            return CallResolution::unresolved();
        }
        let Some(name_id) = self.index.name_id(name) else {
            return CallResolution::unresolved();
        };
        let qualifier = simplify_qualifier(call.qualifier.as_deref());
        let key = ResolveKey {
            caller,
            name: name_id,
            arg_count: call.arg_count,
            qualifier: qualifier.clone(),
        };
        self.cache.get_or_resolve(key, || {
            let query = CallQuery {
                caller,
                name: name_id,
                arg_count: call.arg_count,
                qualifier: qualifier.as_deref(),
            };
            resolve_uncached(self.index, &query, &self.policy)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProgramModel;

    fn index(json: &str) -> ProgramModelIndex {
        ProgramModelIndex::build(&ProgramModel::from_json_str(json).unwrap())
    }

    fn query<'q>(idx: &ProgramModelIndex, caller: &str, name: &str, args: Option<usize>, q: Option<&'q str>) -> CallQuery<'q> {
        CallQuery {
            caller: idx.class_by_full_name(caller).unwrap(),
            name: idx.name_id(name).unwrap(),
            arg_count: args,
            qualifier: q,
        }
    }

    const OVERLOADS: &str = r#"{"files": [{"classes": [
        {"name": "A", "methods": [
            {"name": "run", "param_count": 0, "start_line": 1},
            {"name": "run", "param_count": 1, "start_line": 2},
            {"name": "run", "param_count": 2, "start_line": 3},
            {"name": "run", "param_count": 3, "start_line": 4},
            {"name": "solo", "param_count": 4, "start_line": 5},
            {"name": "any", "start_line": 6}
        ]}
    ]}]}"#;

    #[test]
    fn pick_in_class_filters_by_arity() {
        let idx = index(OVERLOADS);
        let policy = ResolverPolicy::default();
        let a = idx.class_by_full_name("A").unwrap();

        let q = query(&idx, "A", "run", Some(1), None);
        let picked = pick_in_class(&idx, a, &q, &policy);
        assert_eq!(picked.len(), 1);
        assert_eq!(idx.method(picked[0]).param_count, Some(1));

        let q = query(&idx, "A", "run", None, None);
        assert_eq!(pick_in_class(&idx, a, &q, &policy).len(), 4);
    }

    #[test]
    fn pick_in_class_arity_mismatch_fallbacks() {
        let idx = index(OVERLOADS);
        let policy = ResolverPolicy::default();
        let a = idx.class_by_full_name("A").unwrap();

        // No overload takes 7 arguments: a small sample of the four.
        let q = query(&idx, "A", "run", Some(7), None);
        assert_eq!(pick_in_class(&idx, a, &q, &policy).len(), 3);

        // A single overload is accepted whatever the arity.
        let q = query(&idx, "A", "solo", Some(0), None);
        assert_eq!(pick_in_class(&idx, a, &q, &policy).len(), 1);

        // Unknown parameter count matches any arity.
        let q = query(&idx, "A", "any", Some(2), None);
        assert_eq!(pick_in_class(&idx, a, &q, &policy).len(), 1);
    }

    #[test]
    fn named_class_needs_known_class() {
        let idx = index(OVERLOADS);
        let policy = ResolverPolicy::default();
        let q = query(&idx, "A", "run", Some(0), Some("A"));
        assert_eq!(resolve_named_class(&idx, &q, &policy).len(), 1);
        let q = query(&idx, "A", "run", Some(0), Some("nobody"));
        assert!(resolve_named_class(&idx, &q, &policy).is_empty());
    }

    #[test]
    fn type_short_names() {
        assert_eq!(type_short_name("java.util.List<Order>"), "List");
        assert_eq!(type_short_name("OrderDao"), "OrderDao");
        assert_eq!(type_short_name("Item[]"), "Item");
    }

    #[test]
    fn noise_names_never_resolve() {
        let idx = index(
            r#"{"files": [{"classes": [{"name": "A", "methods": [
                {"name": "toString", "param_count": 0},
                {"name": "show", "param_count": 0}
            ]}]}]}"#,
        );
        let resolver = CallResolver::new(&idx, ResolverPolicy::default());
        let a = idx.class_by_full_name("A").unwrap();
        assert!(!resolver.resolve(a, &CallDescriptor::new("toString", None, Some(0))).is_resolved());
        assert!(resolver.resolve(a, &CallDescriptor::new("show", Some("this"), Some(0))).is_resolved());
        assert!(!resolver.resolve(a, &CallDescriptor::new("missing", None, Some(0))).is_resolved());
    }
}
