//! Aggregated usage types.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::boundaries::{ColumnHit, CrudOp, OperationKind};
use crate::catalog::ColumnInfo;

/// How one entry class uses one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableUsage {
    pub table_name: String,
    pub logical_name: String,
    pub operations: BTreeSet<OperationKind>,
    /// Leading catalog columns, for orientation.
    pub columns: Vec<ColumnInfo>,
    pub column_count: usize,
    /// Columns the code appears to mention.
    pub columns_used: Vec<ColumnHit>,
}

/// Table names per CRUD bucket, each in first-seen order without repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrudMatrix {
    #[serde(rename = "CREATE")]
    pub create: Vec<String>,
    #[serde(rename = "READ")]
    pub read: Vec<String>,
    #[serde(rename = "UPDATE")]
    pub update: Vec<String>,
    #[serde(rename = "DELETE")]
    pub delete: Vec<String>,
}

impl CrudMatrix {
    pub fn bucket(&self, op: CrudOp) -> &[String] {
        match op {
            CrudOp::Create => &self.create,
            CrudOp::Read => &self.read,
            CrudOp::Update => &self.update,
            CrudOp::Delete => &self.delete,
        }
    }

    /// File `table` under every bucket `operation` maps to.
    pub fn record(&mut self, table: &str, operation: OperationKind) {
        for op in operation.crud_ops() {
            let bucket = match op {
                CrudOp::Create => &mut self.create,
                CrudOp::Read => &mut self.read,
                CrudOp::Update => &mut self.update,
                CrudOp::Delete => &mut self.delete,
            };
            if !bucket.iter().any(|t| t == table) {
                bucket.push(table.to_string());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.read.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_dedupes_per_bucket() {
        let mut crud = CrudMatrix::default();
        crud.record("CUSTOMER", OperationKind::InsertUpdate);
        crud.record("CUSTOMER", OperationKind::Update);
        crud.record("ORDERS", OperationKind::Select);
        crud.record("ORDERS", OperationKind::Reference);
        assert_eq!(crud.bucket(CrudOp::Create), ["CUSTOMER"]);
        assert_eq!(crud.bucket(CrudOp::Update), ["CUSTOMER"]);
        assert_eq!(crud.bucket(CrudOp::Read), ["ORDERS"]);
        assert!(crud.bucket(CrudOp::Delete).is_empty());
    }

    #[test]
    fn serializes_uppercase_keys() {
        let json = serde_json::to_value(CrudMatrix::default()).unwrap();
        assert!(json.get("CREATE").is_some());
        assert!(json.get("DELETE").is_some());
    }
}
