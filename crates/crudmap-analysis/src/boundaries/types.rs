//! Types produced by reference extraction.

use serde::Serialize;

use crudmap_core::types::collections::SmallVec2;

/// What a reference does to its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OperationKind {
    #[serde(rename = "SELECT")]
    Select,
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
    /// A business-component save: insert or update, undecidable statically.
    #[serde(rename = "INSERT/UPDATE")]
    InsertUpdate,
    /// A structured data type named after the table.
    #[serde(rename = "REFERENCE")]
    Reference,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::InsertUpdate => "INSERT/UPDATE",
            Self::Reference => "REFERENCE",
        }
    }

    /// CRUD buckets this operation falls into. `REFERENCE` falls into none.
    pub fn crud_ops(self) -> SmallVec2<CrudOp> {
        let label = self.as_str();
        let mut ops = SmallVec2::new();
        if label.contains("INSERT") {
            ops.push(CrudOp::Create);
        }
        if label.contains("SELECT") || label.contains("READ") {
            ops.push(CrudOp::Read);
        }
        if label.contains("UPDATE") {
            ops.push(CrudOp::Update);
        }
        if label.contains("DELETE") {
            ops.push(CrudOp::Delete);
        }
        ops
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOp {
    Create,
    Read,
    Update,
    Delete,
}

/// One table access found in one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReference {
    /// Physical name as spelled in the catalog.
    pub table: String,
    pub operation: OperationKind,
    pub source_class: String,
    pub source_method: String,
    /// Up to `context_window` characters around the match, newlines flattened.
    pub context: String,
}

/// A catalog column whose name appears as an identifier in a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnHit {
    pub name: String,
    pub logical_name: Option<String>,
}

/// Heuristic column hits for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnUsage {
    pub table: String,
    pub columns: Vec<ColumnHit>,
}

/// Everything extraction learns from one method's text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedFacts {
    pub references: Vec<TableReference>,
    pub columns_used: Vec<ColumnUsage>,
    /// SQL candidates dropped as reserved words or catalog misses.
    pub rejected_candidates: usize,
}

impl ExtractedFacts {
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}
