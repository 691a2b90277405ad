//! UsageAggregator: references in, table usage and CRUD matrix out.

use crudmap_core::config::ExtractionConfig;
use crudmap_core::types::FxHashMap;

use super::types::{CrudMatrix, TableUsage};
use crate::boundaries::{ColumnUsage, TableReference};
use crate::catalog::Catalog;

pub struct UsageAggregator<'c> {
    catalog: &'c Catalog,
    max_listed_columns: usize,
}

impl<'c> UsageAggregator<'c> {
    pub fn new(catalog: &'c Catalog, config: &ExtractionConfig) -> Self {
        Self {
            catalog,
            max_listed_columns: config.effective_max_listed_columns(),
        }
    }

    /// Group references by table (case-insensitive), in first-seen order,
    /// and derive the CRUD matrix from the same references.
    pub fn aggregate(
        &self,
        references: &[TableReference],
        columns_used: &[ColumnUsage],
    ) -> (Vec<TableUsage>, CrudMatrix) {
        let mut tables: Vec<TableUsage> = Vec::new();
        let mut slots: FxHashMap<String, usize> = FxHashMap::default();
        let mut crud = CrudMatrix::default();

        for reference in references {
            let key = reference.table.to_uppercase();
            let slot = *slots.entry(key).or_insert_with(|| {
                tables.push(self.table_usage(&reference.table));
                tables.len() - 1
            });
            let usage = &mut tables[slot];
            usage.operations.insert(reference.operation);
            crud.record(&usage.table_name, reference.operation);
        }

        for used in columns_used {
            let Some(&slot) = slots.get(&used.table.to_uppercase()) else {
                continue;
            };
            let merged = &mut tables[slot].columns_used;
            for hit in &used.columns {
                if !merged.iter().any(|c| c.name == hit.name) {
                    merged.push(hit.clone());
                }
            }
        }

        (tables, crud)
    }

    fn table_usage(&self, table: &str) -> TableUsage {
        match self.catalog.lookup(table) {
            Some(entry) => TableUsage {
                table_name: entry.table_name.clone(),
                logical_name: entry.logical_name.clone(),
                operations: Default::default(),
                columns: entry.columns.iter().take(self.max_listed_columns).cloned().collect(),
                column_count: entry.columns.len(),
                columns_used: Vec::new(),
            },
            None => TableUsage {
                table_name: table.to_string(),
                logical_name: table.to_string(),
                operations: Default::default(),
                columns: Vec::new(),
                column_count: 0,
                columns_used: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundaries::{ColumnHit, OperationKind};
    use crate::catalog::TableCatalogEntry;

    fn reference(table: &str, operation: OperationKind) -> TableReference {
        TableReference {
            table: table.to_string(),
            operation,
            source_class: "C".into(),
            source_method: "m".into(),
            context: String::new(),
        }
    }

    #[test]
    fn groups_case_insensitively_and_unions_operations() {
        let catalog = Catalog::from_entries([TableCatalogEntry::new("ORDERS")
            .with_logical_name("Orders")
            .with_columns(&["C1", "C2", "C3"])]);
        let config = ExtractionConfig {
            max_listed_columns: Some(2),
            ..Default::default()
        };
        let aggregator = UsageAggregator::new(&catalog, &config);
        let refs = [
            reference("ORDERS", OperationKind::Select),
            reference("orders", OperationKind::Insert),
            reference("ORDERS", OperationKind::Select),
        ];
        let used = [ColumnUsage {
            table: "Orders".into(),
            columns: vec![ColumnHit {
                name: "C2".into(),
                logical_name: None,
            }],
        }];

        let (tables, crud) = aggregator.aggregate(&refs, &used);
        assert_eq!(tables.len(), 1);
        let orders = &tables[0];
        assert_eq!(orders.table_name, "ORDERS");
        assert_eq!(orders.logical_name, "Orders");
        assert_eq!(orders.operations.len(), 2);
        assert_eq!(orders.columns.len(), 2);
        assert_eq!(orders.column_count, 3);
        assert_eq!(orders.columns_used.len(), 1);
        assert_eq!(crud.read, ["ORDERS"]);
        assert_eq!(crud.create, ["ORDERS"]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let catalog = Catalog::default();
        let aggregator = UsageAggregator::new(&catalog, &ExtractionConfig::default());
        let (tables, crud) = aggregator.aggregate(&[], &[]);
        assert!(tables.is_empty());
        assert!(crud.is_empty());
    }
}
