//! Reference extractor: SQL DML and GeneXus idioms, validated against the catalog.

use crudmap_core::config::ExtractionConfig;
use crudmap_core::types::FxHashSet;

use super::columns;
use super::patterns::{GENEXUS_PATTERNS, SQL_PATTERNS};
use super::types::{ExtractedFacts, OperationKind, TableReference};
use crate::catalog::{Catalog, TableCatalogEntry};

/// Words the SQL patterns can capture that are never table names.
const RESERVED_WORDS: [&str; 21] = [
    "SELECT", "FROM", "WHERE", "AND", "OR", "SET", "INTO", "VALUES", "ORDER", "GROUP", "HAVING",
    "LIMIT", "OFFSET", "NULL", "TRUE", "FALSE", "AS", "ON", "IN", "NOT", "LIKE",
];

/// Prefixes stripped from a GeneXus entity name when it does not name a table directly.
const ENTITY_PREFIXES: [&str; 4] = ["sdt_", "type_", "bc_", "trn_"];

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.iter().any(|w| w.eq_ignore_ascii_case(name))
}

/// Reduce a captured table token to a bare identifier: last dotted segment,
/// quoting removed. Returns `None` when nothing identifier-like remains.
pub fn normalize_table_name(raw: &str) -> Option<String> {
    let last = raw.rsplit('.').next().unwrap_or(raw);
    let name: String = last
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    (!name.is_empty()).then_some(name)
}

/// `width` characters of `text` centred on byte offset `pos`, newlines flattened, trimmed.
pub fn context_snippet(text: &str, pos: usize, width: usize) -> String {
    let half = width / 2;
    let mut start = pos.saturating_sub(half);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (pos + half).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    text[start..end].replace(['\r', '\n'], " ").trim().to_string()
}

/// Extracts table references from method text.
///
/// Results depend only on the text and the catalog, so they can be cached
/// per method and shared by every entry class that reaches it.
pub struct ReferenceExtractor<'c> {
    catalog: &'c Catalog,
    context_window: usize,
    max_columns_used: usize,
}

impl<'c> ReferenceExtractor<'c> {
    pub fn new(catalog: &'c Catalog, config: &ExtractionConfig) -> Self {
        Self {
            catalog,
            context_window: config.effective_context_window(),
            max_columns_used: config.effective_max_columns_used(),
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Extract every table reference in `text`, attributing it to the given method.
    pub fn extract(&self, text: &str, source_class: &str, source_method: &str) -> ExtractedFacts {
        let mut facts = ExtractedFacts::default();
        if text.is_empty() {
            return facts;
        }

        for pattern in SQL_PATTERNS.iter() {
            for caps in pattern.regex.captures_iter(text) {
                let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                match self.accept_table(token.as_str()) {
                    Some(entry) => facts.references.push(self.reference(
                        entry,
                        pattern.op,
                        text,
                        whole.start(),
                        source_class,
                        source_method,
                    )),
                    None => facts.rejected_candidates += 1,
                }
            }
        }

        for (idiom, regex) in GENEXUS_PATTERNS.iter() {
            for caps in regex.captures_iter(text) {
                let (Some(whole), Some(entity)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                if let Some(entry) = self.table_for_entity(entity.as_str()) {
                    facts.references.push(self.reference(
                        entry,
                        idiom.operation(),
                        text,
                        whole.start(),
                        source_class,
                        source_method,
                    ));
                }
            }
        }

        if !facts.references.is_empty() {
            let mut seen = FxHashSet::default();
            let tables = facts
                .references
                .iter()
                .filter(|r| seen.insert(r.table.to_uppercase()))
                .filter_map(|r| self.catalog.lookup(&r.table));
            facts.columns_used = columns::columns_used(text, tables, self.max_columns_used);
        }

        facts
    }

    /// Catalog entry for a captured SQL table token, if it names a real table.
    pub fn accept_table(&self, raw: &str) -> Option<&'c TableCatalogEntry> {
        let name = normalize_table_name(raw)?;
        if is_reserved_word(&name) {
            return None;
        }
        self.catalog.lookup(&name)
    }

    /// Catalog entry for a GeneXus entity name: the name itself, or the name
    /// with one of the `sdt_`/`type_`/`bc_`/`trn_` prefixes removed.
    pub fn table_for_entity(&self, entity: &str) -> Option<&'c TableCatalogEntry> {
        if is_reserved_word(entity) {
            return None;
        }
        if let Some(entry) = self.catalog.lookup(entity) {
            return Some(entry);
        }
        let lower = entity.to_lowercase();
        ENTITY_PREFIXES
            .iter()
            .find_map(|prefix| lower.strip_prefix(prefix))
            .filter(|base| !base.is_empty() && !is_reserved_word(base))
            .and_then(|base| self.catalog.lookup(base))
    }

    fn reference(
        &self,
        entry: &TableCatalogEntry,
        operation: OperationKind,
        text: &str,
        pos: usize,
        source_class: &str,
        source_method: &str,
    ) -> TableReference {
        TableReference {
            table: entry.table_name.clone(),
            operation,
            source_class: source_class.to_string(),
            source_method: source_method.to_string(),
            context: context_snippet(text, pos, self.context_window),
        }
    }
}
