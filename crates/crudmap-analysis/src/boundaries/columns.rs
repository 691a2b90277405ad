//! Column usage heuristic: a catalog column counts as used when its name
//! occurs as an identifier token anywhere in the method text.

use crudmap_core::constants::MIN_COLUMN_NAME_LEN;
use crudmap_core::types::FxHashSet;

use super::patterns::IDENT_TOKEN;
use super::types::{ColumnHit, ColumnUsage};
use crate::catalog::TableCatalogEntry;

/// Lower-cased identifier tokens of `text`.
pub fn identifier_tokens(text: &str) -> FxHashSet<String> {
    IDENT_TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Columns of `table` whose names appear in `tokens`, in catalog order.
pub fn columns_hit(
    table: &TableCatalogEntry,
    tokens: &FxHashSet<String>,
    max_columns: usize,
) -> Vec<ColumnHit> {
    table
        .columns
        .iter()
        .filter(|c| c.name.chars().count() > MIN_COLUMN_NAME_LEN)
        .filter(|c| tokens.contains(&c.name.to_lowercase()))
        .take(max_columns)
        .map(|c| ColumnHit {
            name: c.name.clone(),
            logical_name: c.logical_name.clone(),
        })
        .collect()
}

/// Column usage for each table, skipping tables with no hits.
pub fn columns_used<'a>(
    text: &str,
    tables: impl IntoIterator<Item = &'a TableCatalogEntry>,
    max_columns: usize,
) -> Vec<ColumnUsage> {
    let tokens = identifier_tokens(text);
    tables
        .into_iter()
        .filter_map(|table| {
            let columns = columns_hit(table, &tokens, max_columns);
            (!columns.is_empty()).then(|| ColumnUsage {
                table: table.table_name.clone(),
                columns,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_whole_identifiers_only() {
        let table = TableCatalogEntry::new("ORDERS").with_columns(&["ORDER_ID", "TOTAL", "ID", "STATUS"]);
        let tokens = identifier_tokens("o.setTotal(x); o.order_id = 5; status2 = id;");
        let hits: Vec<_> = columns_hit(&table, &tokens, 25).into_iter().map(|c| c.name).collect();
        // ID is too short, STATUS only appears inside status2, TOTAL only inside setTotal.
        assert_eq!(hits, vec!["ORDER_ID".to_string()]);
    }

    #[test]
    fn respects_cap() {
        let table = TableCatalogEntry::new("T").with_columns(&["AAA", "BBB", "CCC"]);
        let tokens = identifier_tokens("aaa bbb ccc");
        assert_eq!(columns_hit(&table, &tokens, 2).len(), 2);
    }
}
