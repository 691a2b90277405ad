use crudmap_analysis::boundaries::detector::is_reserved_word;
use crudmap_analysis::boundaries::{ExtractionCache, ReferenceExtractor};
use crudmap_analysis::call_graph::resolution::{resolve_uncached, CallQuery};
use crudmap_analysis::call_graph::{simplify_qualifier, CallResolver, ResolverPolicy};
use crudmap_analysis::catalog::{Catalog, TableCatalogEntry};
use crudmap_analysis::graph::reachability::{ReachabilityTraverser, TraversalLimits};
use crudmap_analysis::index::ProgramModelIndex;
use crudmap_analysis::model::{CallDescriptor, ProgramModel};
use crudmap_core::config::ExtractionConfig;
use crudmap_core::types::FxHashSet;
use proptest::prelude::*;
use serde_json::json;

const FRAGMENTS: &[&str] = &[
    "SELECT * FROM ORDERS",
    "select id from customer c join orders o on o.cid = c.id",
    "INSERT INTO \"APP\".\"ORDERS\" VALUES (?)",
    "UPDATE customer SET name = ?",
    "DELETE FROM [dbo].[Orders]",
    "customer_bc.Save()",
    "for each Customer",
    "SELECT 1 FROM WHERE",
    "FROM unknown_table",
    "sdt_orders",
    "取得",
    "\n",
];

fn catalog() -> Catalog {
    Catalog::from_entries([
        TableCatalogEntry::new("ORDERS").with_columns(&["CID", "TOTAL"]),
        TableCatalogEntry::new("CUSTOMER").with_columns(&["NAME"]),
    ])
}

fn sql_text() -> impl Strategy<Value = String> {
    (prop::collection::vec(prop::sample::select(FRAGMENTS), 0..8), ".{0,40}")
        .prop_map(|(parts, noise)| format!("{} {}", parts.join(" "), noise))
}

/// Six classes, each with a `run` method, wired by the given edges.
fn graph_model(edges: &[(usize, usize)], entry_arity: usize) -> serde_json::Value {
    let classes: Vec<serde_json::Value> = (0..6)
        .map(|i| {
            let calls: Vec<serde_json::Value> = edges
                .iter()
                .filter(|(from, _)| *from == i)
                .map(|(_, to)| json!({ "name": format!("run{to}"), "qualifier": format!("C{to}"), "arg_count": 0 }))
                .collect();
            json!({
                "name": format!("C{i}"),
                "package": "p",
                "function_type": if i == 0 { "batch" } else { "other" },
                "methods": [
                    { "name": format!("run{i}"), "param_count": 0, "start_line": 1,
                      "code": "", "sql_strings": ["SELECT * FROM ORDERS"], "calls": calls },
                    { "name": "run", "param_count": entry_arity, "start_line": 2, "code": "" }
                ]
            })
        })
        .collect();
    json!({ "files": [{ "classes": classes }] })
}

fn index_of(model: serde_json::Value) -> ProgramModelIndex {
    ProgramModelIndex::build(&ProgramModel::from_json_str(&model.to_string()).unwrap())
}

proptest! {
    #[test]
    fn extraction_is_deterministic(text in sql_text()) {
        let catalog = catalog();
        let extractor = ReferenceExtractor::new(&catalog, &ExtractionConfig::default());
        let first = extractor.extract(&text, "C", "m");
        let second = extractor.extract(&text, "C", "m");
        prop_assert_eq!(&first, &second);
        for reference in &first.references {
            prop_assert!(catalog.contains(&reference.table), "not in catalog: {}", reference.table);
            prop_assert!(!is_reserved_word(&reference.table));
        }
    }

    #[test]
    fn cached_resolution_equals_uncached(
        name in prop::sample::select(vec!["run", "run0", "run3", "missing", "toString"]),
        qualifier in prop::option::of(prop::sample::select(vec!["this", "C2", "new C4()", "x.y.C1", "other"])),
        arg_count in prop::option::of(0usize..3),
        caller in 0usize..6,
    ) {
        let index = index_of(graph_model(&[(0, 1), (1, 2)], 1));
        let resolver = CallResolver::new(&index, ResolverPolicy::default());
        let caller = index.class_by_full_name(&format!("p.C{caller}")).unwrap();
        let call = CallDescriptor::new(name, qualifier, arg_count);

        let first = resolver.resolve(caller, &call);
        let cached = resolver.resolve(caller, &call);
        prop_assert_eq!(&first, &cached);

        if let Some(name_id) = index.name_id(name).filter(|_| name != "toString") {
            let simplified = simplify_qualifier(qualifier);
            let query = CallQuery {
                caller,
                name: name_id,
                arg_count,
                qualifier: simplified.as_deref(),
            };
            let uncached = resolve_uncached(&index, &query, resolver.policy());
            prop_assert_eq!(&first, &uncached);
        }

        let unique: FxHashSet<_> = first.candidates.iter().collect();
        prop_assert_eq!(unique.len(), first.candidates.len());
        prop_assert!(first.candidates.len() <= resolver.policy().max_candidates);
    }

    #[test]
    fn traversal_respects_node_budget(
        edges in prop::collection::vec((0usize..6, 0usize..6), 0..20),
        max_nodes in 1usize..12,
        max_depth in 0u32..5,
    ) {
        let index = index_of(graph_model(&edges, 0));
        let catalog = catalog();
        let resolver = CallResolver::new(&index, ResolverPolicy::default());
        let extractor = ReferenceExtractor::new(&catalog, &ExtractionConfig::default());
        let cache = ExtractionCache::new(index.method_count());
        let limits = TraversalLimits::default().with_max_nodes(max_nodes).with_max_depth(max_depth);
        let outcome = ReachabilityTraverser::new(&resolver, &extractor, &cache, limits)
            .traverse(index.class_by_full_name("p.C0").unwrap());

        prop_assert!(outcome.visited.len() <= max_nodes);
        let unique: FxHashSet<_> = outcome.visited.iter().collect();
        prop_assert_eq!(unique.len(), outcome.visited.len());
        prop_assert!(outcome.diagnostics.max_depth_seen <= max_depth);
        if outcome.diagnostics.truncated {
            prop_assert_eq!(outcome.visited.len(), max_nodes);
        }
    }
}
