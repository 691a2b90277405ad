//! Table-usage analysis for entry classes.
//!
//! Given a parsed program model and a table catalog, the analyzer walks each
//! entry class's call graph, extracts the table references found in the
//! methods it reaches, and aggregates them into a per-class CRUD summary.

pub mod aggregation;
pub mod boundaries;
pub mod call_graph;
pub mod catalog;
pub mod graph;
pub mod index;
pub mod model;
pub mod pipeline;

pub use aggregation::{CrudMatrix, TableUsage, UsageAggregator};
pub use boundaries::{ExtractedFacts, OperationKind, ReferenceExtractor, TableReference};
pub use call_graph::{CallResolution, CallResolver, ResolutionTier};
pub use catalog::Catalog;
pub use graph::reachability::{ReachabilityTraverser, TraversalLimits, TraversalOutcome};
pub use index::ProgramModelIndex;
pub use model::ProgramModel;
pub use pipeline::{analyze_model, run, FunctionUsage, RunSummary, UsageAnalyzer, UsageReport};
