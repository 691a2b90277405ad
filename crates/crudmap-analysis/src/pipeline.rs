//! Run orchestration: one traversal per entry class, then cross-function links.
//!
//! `UsageAnalyzer` owns the shared resolver, extractor and caches for a
//! single index/catalog pair. Entry classes are analyzed independently (on
//! the rayon pool when `parallel` is on) and results keep input order.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crudmap_core::config::CrudmapConfig;
use crudmap_core::constants::VERSION;
use crudmap_core::errors::PipelineError;
use crudmap_core::traits::Cancellable;
use crudmap_core::types::{ClassId, FxHashSet};

use crate::aggregation::{CrudMatrix, TableUsage, UsageAggregator};
use crate::boundaries::{ExtractionCache, ReferenceExtractor};
use crate::call_graph::{CallResolver, ResolutionDiagnostics, ResolverPolicy};
use crate::catalog::Catalog;
use crate::graph::reachability::{ReachabilityTraverser, TraversalDiagnostics, TraversalLimits};
use crate::index::ProgramModelIndex;
use crate::model::{FunctionType, ProgramModel};

/// Table usage of one entry class.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionUsage {
    /// Short name of the entry class.
    pub function_id: String,
    /// Fully qualified name of the entry class.
    pub entry_class: String,
    pub function_type: FunctionType,
    pub genexus_type: Option<String>,
    pub source_file: Option<String>,
    pub tables_used: Vec<TableUsage>,
    pub crud_matrix: CrudMatrix,
    /// Short names of other classes whose methods were visited, sorted.
    pub related_class_names: Vec<String>,
    pub related_functions_callgraph: Vec<String>,
    pub related_functions_prefix: Vec<String>,
    pub related_functions: Vec<String>,
    pub diagnostics: TraversalDiagnostics,
}

impl FunctionUsage {
    /// True when the traversal found no table reference at all.
    pub fn is_empty(&self) -> bool {
        self.tables_used.is_empty()
    }
}

/// Run-level counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub entry_classes: usize,
    pub functions: usize,
    pub empty_functions: usize,
    pub methods_visited: usize,
    pub references: usize,
    pub unique_tables: usize,
    pub truncated_traversals: usize,
    pub extraction_cache_hits: usize,
    pub resolver_cache_hits: u64,
    pub resolution: ResolutionDiagnostics,
    pub duration_ms: u64,
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub project_name: String,
    /// Entry classes with at least one table reference, in index order.
    pub functions: Vec<FunctionUsage>,
    /// Function ids of entry classes that reached no table.
    pub empty_entry_classes: Vec<String>,
    /// Table name to the function ids that use it.
    pub table_function_matrix: BTreeMap<String, Vec<String>>,
    pub summary: RunSummary,
}

impl UsageReport {
    pub fn function(&self, function_id: &str) -> Option<&FunctionUsage> {
        self.functions.iter().find(|f| f.function_id == function_id)
    }
}

pub struct UsageAnalyzer<'a> {
    index: &'a ProgramModelIndex,
    resolver: CallResolver<'a>,
    extractor: ReferenceExtractor<'a>,
    extraction_cache: ExtractionCache,
    aggregator: UsageAggregator<'a>,
    limits: TraversalLimits,
    parallel: bool,
}

impl<'a> UsageAnalyzer<'a> {
    pub fn new(index: &'a ProgramModelIndex, catalog: &'a Catalog, config: &CrudmapConfig) -> Self {
        Self {
            index,
            resolver: CallResolver::new(index, ResolverPolicy::from_config(&config.resolution)),
            extractor: ReferenceExtractor::new(catalog, &config.extraction),
            extraction_cache: ExtractionCache::new(index.method_count()),
            aggregator: UsageAggregator::new(catalog, &config.extraction),
            limits: TraversalLimits::from_config(&config.traversal),
            parallel: config.traversal.effective_parallel(),
        }
    }

    pub fn index(&self) -> &'a ProgramModelIndex {
        self.index
    }

    pub fn limits(&self) -> &TraversalLimits {
        &self.limits
    }

    pub fn resolver(&self) -> &CallResolver<'a> {
        &self.resolver
    }

    pub fn analyze_class(&self, class: ClassId) -> FunctionUsage {
        self.analyze_class_with(class, None)
    }

    /// Traverse and aggregate one class. The related-function fields are
    /// left empty; they only make sense across a whole run.
    pub fn analyze_class_with(&self, class: ClassId, cancel: Option<&dyn Cancellable>) -> FunctionUsage {
        let record = self.index.class(class);
        let span = tracing::debug_span!("analyze_class", class = %record.full_name);
        let _guard = span.enter();

        let mut traverser = ReachabilityTraverser::new(
            &self.resolver,
            &self.extractor,
            &self.extraction_cache,
            self.limits.clone(),
        );
        if let Some(token) = cancel {
            traverser = traverser.with_cancellation(token);
        }
        let outcome = traverser.traverse(class);
        let (tables_used, crud_matrix) = self.aggregator.aggregate(&outcome.references, &outcome.columns_used);

        let related_class_names: BTreeSet<&str> = outcome
            .related_classes
            .iter()
            .map(|&id| self.index.class(id).short_name.as_str())
            .collect();

        FunctionUsage {
            function_id: record.short_name.clone(),
            entry_class: record.full_name.clone(),
            function_type: record.function_type.clone(),
            genexus_type: record.genexus_type.clone(),
            source_file: record.file.clone(),
            tables_used,
            crud_matrix,
            related_class_names: related_class_names.into_iter().map(str::to_string).collect(),
            related_functions_callgraph: Vec::new(),
            related_functions_prefix: Vec::new(),
            related_functions: Vec::new(),
            diagnostics: outcome.diagnostics,
        }
    }

    /// Analyze every entry class of the index.
    pub fn analyze(&self, project_name: &str, cancel: Option<&dyn Cancellable>) -> Result<UsageReport, PipelineError> {
        let started = Instant::now();
        let entries: Vec<ClassId> = self.index.entry_classes().map(|c| c.id).collect();
        tracing::info!(
            version = VERSION,
            entry_classes = entries.len(),
            parallel = self.parallel,
            "analysis started"
        );

        let results: Vec<FunctionUsage> = if self.parallel {
            entries.par_iter().map(|&class| self.analyze_class_with(class, cancel)).collect()
        } else {
            let mut results = Vec::with_capacity(entries.len());
            for &class in &entries {
                if is_cancelled(cancel) {
                    break;
                }
                results.push(self.analyze_class_with(class, cancel));
            }
            results
        };
        if is_cancelled(cancel) || results.iter().any(|f| f.diagnostics.cancelled) {
            return Err(PipelineError::Cancelled);
        }

        let mut summary = RunSummary {
            entry_classes: entries.len(),
            ..RunSummary::default()
        };
        for usage in &results {
            let diag = &usage.diagnostics;
            summary.methods_visited += diag.visited;
            summary.references += diag.references;
            summary.extraction_cache_hits += diag.extraction_cache_hits;
            summary.truncated_traversals += usize::from(diag.truncated);
            summary.resolution.merge(&diag.resolution);
        }

        let (mut functions, empty): (Vec<_>, Vec<_>) = results.into_iter().partition(|f| !f.is_empty());
        let empty_entry_classes: Vec<String> = empty.into_iter().map(|f| f.function_id).collect();

        let mut table_function_matrix: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for usage in &functions {
            for table in &usage.tables_used {
                table_function_matrix
                    .entry(table.table_name.clone())
                    .or_default()
                    .push(usage.function_id.clone());
            }
        }
        link_related_functions(&mut functions);

        summary.functions = functions.len();
        summary.empty_functions = empty_entry_classes.len();
        summary.unique_tables = table_function_matrix.len();
        summary.resolver_cache_hits = self.resolver.cache().hits();
        summary.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::info!(
            entry_classes = summary.entry_classes,
            functions = summary.functions,
            empty = summary.empty_functions,
            methods_visited = summary.methods_visited,
            unique_tables = summary.unique_tables,
            truncated = summary.truncated_traversals,
            resolution_rate = summary.resolution.resolution_rate(),
            duration_ms = summary.duration_ms,
            "analysis finished"
        );

        Ok(UsageReport {
            project_name: project_name.to_string(),
            functions,
            empty_entry_classes,
            table_function_matrix,
            summary,
        })
    }
}

fn is_cancelled(cancel: Option<&dyn Cancellable>) -> bool {
    cancel.is_some_and(|c| c.is_cancelled())
}

/// Fill the callgraph, prefix and merged related-function lists.
pub fn link_related_functions(functions: &mut [FunctionUsage]) {
    let ids: FxHashSet<String> = functions.iter().map(|f| f.function_id.clone()).collect();

    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for f in functions.iter() {
        groups.entry(function_prefix(&f.function_id)).or_default().push(f.function_id.clone());
    }

    for f in functions.iter_mut() {
        let callgraph: BTreeSet<String> = f
            .related_class_names
            .iter()
            .filter(|name| ids.contains(*name) && **name != f.function_id)
            .cloned()
            .collect();
        f.related_functions_callgraph = callgraph.into_iter().collect();

        f.related_functions_prefix = groups
            .get(&function_prefix(&f.function_id))
            .map(|group| group.iter().filter(|id| **id != f.function_id).cloned().collect())
            .unwrap_or_default();

        let merged: BTreeSet<&String> = f
            .related_functions_callgraph
            .iter()
            .chain(&f.related_functions_prefix)
            .collect();
        f.related_functions = merged.into_iter().cloned().collect();
    }
}

/// Lower-cased grouping prefix of a function id: the text before the first
/// `_`, else a leading `[A-Z]?[a-z]+` run, else the first three characters.
pub fn function_prefix(function_id: &str) -> String {
    if let Some((head, _)) = function_id.split_once('_') {
        return head.to_lowercase();
    }

    let mut chars = function_id.char_indices().peekable();
    if chars.peek().is_some_and(|(_, c)| c.is_ascii_uppercase()) {
        chars.next();
    }
    let mut end = None;
    while let Some(&(i, c)) = chars.peek() {
        if !c.is_ascii_lowercase() {
            break;
        }
        end = Some(i + c.len_utf8());
        chars.next();
    }
    if let Some(end) = end {
        return function_id[..end].to_lowercase();
    }

    function_id.chars().take(3).collect::<String>().to_lowercase()
}

/// Index the model and analyze it against the catalog.
pub fn analyze_model(
    model: &ProgramModel,
    catalog: &Catalog,
    config: &CrudmapConfig,
    cancel: Option<&dyn Cancellable>,
) -> Result<UsageReport, PipelineError> {
    CrudmapConfig::validate(config)?;
    let index = ProgramModelIndex::build(model);
    let project_name = model
        .project_name
        .as_deref()
        .or(model.project_root.as_deref())
        .unwrap_or("Unknown");
    UsageAnalyzer::new(&index, catalog, config).analyze(project_name, cancel)
}

/// Load both input documents from disk and analyze them.
pub fn run(model_path: &Path, catalog_path: &Path, config: &CrudmapConfig) -> Result<UsageReport, PipelineError> {
    let model = ProgramModel::load(model_path)?;
    let catalog = Catalog::load(catalog_path)?;
    analyze_model(&model, &catalog, config, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(id: &str, related: &[&str]) -> FunctionUsage {
        FunctionUsage {
            function_id: id.to_string(),
            entry_class: format!("app.{id}"),
            function_type: FunctionType::Screen,
            genexus_type: None,
            source_file: None,
            tables_used: Vec::new(),
            crud_matrix: CrudMatrix::default(),
            related_class_names: related.iter().map(|s| s.to_string()).collect(),
            related_functions_callgraph: Vec::new(),
            related_functions_prefix: Vec::new(),
            related_functions: Vec::new(),
            diagnostics: TraversalDiagnostics::default(),
        }
    }

    #[test]
    fn test_prefix_underscore() {
        assert_eq!(function_prefix("ORDER_Entry"), "order");
        assert_eq!(function_prefix("_hidden"), "");
    }

    #[test]
    fn test_prefix_camel_case() {
        assert_eq!(function_prefix("OrderEntryScreen"), "order");
        assert_eq!(function_prefix("wwcustomer"), "wwcustomer");
    }

    #[test]
    fn test_prefix_fallback() {
        assert_eq!(function_prefix("ABCScreen"), "abc");
        assert_eq!(function_prefix("X1"), "x1");
    }

    #[test]
    fn test_link_related_functions() {
        let mut functions = vec![
            usage("OrderEntry", &["OrderService", "InvoiceBatch"]),
            usage("OrderList", &[]),
            usage("InvoiceBatch", &[]),
        ];
        link_related_functions(&mut functions);

        assert_eq!(functions[0].related_functions_callgraph, vec!["InvoiceBatch"]);
        assert_eq!(functions[0].related_functions_prefix, vec!["OrderList"]);
        assert_eq!(functions[0].related_functions, vec!["InvoiceBatch", "OrderList"]);
        assert_eq!(functions[1].related_functions, vec!["OrderEntry"]);
        assert!(functions[2].related_functions.is_empty());
    }

    #[test]
    fn test_callgraph_excludes_self() {
        let mut functions = vec![usage("Solo", &["Solo"])];
        link_related_functions(&mut functions);
        assert!(functions[0].related_functions_callgraph.is_empty());
    }
}
