//! The table catalog: the physical tables that references are validated against.
//!
//! Lookups are case-insensitive. A catalog without a `tables` list, or with a
//! table that has no physical name, is rejected outright.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crudmap_core::errors::ModelError;
use crudmap_core::types::FxHashMap;

use crate::model::{lenient, read_input};

/// One column of a catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub logical_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub data_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_primary_key: bool,
}

impl ColumnInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            logical_name: None,
            data_type: None,
            is_primary_key: false,
        }
    }
}

/// One catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCatalogEntry {
    pub table_name: String,
    /// Human-readable name; the physical name when the catalog gives none.
    pub logical_name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableCatalogEntry {
    pub fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            logical_name: table_name.to_string(),
            columns: Vec::new(),
        }
    }

    pub fn with_logical_name(mut self, logical_name: &str) -> Self {
        self.logical_name = logical_name.to_string();
        self
    }

    pub fn with_columns(mut self, names: &[&str]) -> Self {
        self.columns.extend(names.iter().map(|n| ColumnInfo::new(n)));
        self
    }
}

#[derive(Deserialize)]
struct RawTable {
    table_name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    logical_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::seq")]
    columns: Vec<ColumnInfo>,
}

/// Case-insensitive set of known tables.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: Vec<TableCatalogEntry>,
    by_upper: FxHashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from entries. When two entries differ only in case,
    /// the first one wins.
    pub fn from_entries(entries: impl IntoIterator<Item = TableCatalogEntry>) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            let key = entry.table_name.to_uppercase();
            if catalog.by_upper.contains_key(&key) {
                tracing::debug!(table = %entry.table_name, "duplicate catalog table ignored");
                continue;
            }
            catalog.by_upper.insert(key, catalog.tables.len());
            catalog.tables.push(entry);
        }
        catalog
    }

    /// Parse a catalog document of the form `{"tables": [{"table_name": ..}, ..]}`.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(json).map_err(|e| ModelError::InvalidJson {
            source_name: "<catalog>".to_string(),
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = read_input(path)?;
        let value: Value = serde_json::from_str(&text).map_err(|e| ModelError::InvalidJson {
            source_name: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Self, ModelError> {
        let tables = match value {
            Value::Object(mut map) => map.remove("tables"),
            _ => None,
        };
        let Some(Value::Array(items)) = tables else {
            return Err(ModelError::CatalogContract {
                message: "`tables` must be a list of tables".to_string(),
            });
        };

        let mut entries = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            let raw: RawTable =
                serde_json::from_value(item).map_err(|e| ModelError::CatalogContract {
                    message: format!("table #{i}: {e}"),
                })?;
            let table_name = raw.table_name.trim().to_string();
            if table_name.is_empty() {
                return Err(ModelError::CatalogContract {
                    message: format!("table #{i}: empty table_name"),
                });
            }
            entries.push(TableCatalogEntry {
                logical_name: raw.logical_name.unwrap_or_else(|| table_name.clone()),
                table_name,
                columns: raw.columns,
            });
        }
        Ok(Self::from_entries(entries))
    }

    /// Case-insensitive lookup by physical name.
    pub fn lookup(&self, name: &str) -> Option<&TableCatalogEntry> {
        self.by_upper
            .get(&name.to_uppercase())
            .map(|&i| &self.tables[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn tables(&self) -> &[TableCatalogEntry] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let catalog = Catalog::from_entries([TableCatalogEntry::new("Customers")]);
        assert_eq!(catalog.lookup("CUSTOMERS").unwrap().table_name, "Customers");
        assert!(catalog.contains("customers"));
        assert!(!catalog.contains("ORDERS"));
    }

    #[test]
    fn parses_columns_leniently() {
        let catalog = Catalog::from_json_str(
            r#"{"tables": [{
                "table_name": "ORDERS",
                "logical_name": "Orders",
                "columns": [
                    {"name": "ORDER_ID", "is_primary_key": 1, "data_type": "INT"},
                    {"logical_name": "nameless"},
                    {"name": "TOTAL", "is_primary_key": "no"}
                ]
            }]}"#,
        )
        .unwrap();
        let orders = catalog.lookup("orders").unwrap();
        assert_eq!(orders.logical_name, "Orders");
        assert_eq!(orders.columns.len(), 2);
        assert!(orders.columns[0].is_primary_key);
        assert!(!orders.columns[1].is_primary_key);
    }

    #[test]
    fn logical_name_defaults_to_physical() {
        let catalog = Catalog::from_json_str(r#"{"tables": [{"table_name": "ITEMS"}]}"#).unwrap();
        assert_eq!(catalog.lookup("items").unwrap().logical_name, "ITEMS");
    }

    #[test]
    fn structural_violations_fail_fast() {
        for bad in [
            r#"{"tables": {"ORDERS": {}}}"#,
            r#"{"schemas": []}"#,
            r#"{"tables": [{"logical_name": "no physical name"}]}"#,
            r#"{"tables": [{"table_name": "  "}]}"#,
        ] {
            assert!(
                matches!(Catalog::from_json_str(bad), Err(ModelError::CatalogContract { .. })),
                "accepted: {bad}"
            );
        }
    }
}
