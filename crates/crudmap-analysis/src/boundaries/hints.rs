//! DB hint scanning.
//!
//! Hints over-approximate: they say "this method probably talks
//! to the database" without naming a table. The traverser uses them to keep
//! leaves that might matter, and `scan` explains why a method that looks
//! database-bound produced no references.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::patterns::{GenexusIdiom, GENEXUS_PATTERNS};

/// Longest matched text kept in a `DbHint`.
const MAX_HINT_MATCH_LEN: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbHintKind {
    Genexus(GenexusIdiom),
    BcCall,
    PrDefault,
    Cursor,
    DataStore,
    Execute,
    Jdbc,
    SqlKeyword,
}

impl DbHintKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Genexus(GenexusIdiom::BcLoad) => "GENEXUS:BC_LOAD",
            Self::Genexus(GenexusIdiom::BcSave) => "GENEXUS:BC_SAVE",
            Self::Genexus(GenexusIdiom::BcDelete) => "GENEXUS:BC_DELETE",
            Self::Genexus(GenexusIdiom::ForEach) => "GENEXUS:FOR_EACH",
            Self::Genexus(GenexusIdiom::SdtRef) => "GENEXUS:SDT_REF",
            Self::BcCall => "GX_BC_CALL",
            Self::PrDefault => "GX_PR_DEFAULT",
            Self::Cursor => "GX_CURSOR",
            Self::DataStore => "GX_DATASTORE",
            Self::Execute => "GX_EXECUTE",
            Self::Jdbc => "JDBC",
            Self::SqlKeyword => "SQL_KEYWORD",
        }
    }
}

impl Serialize for DbHintKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One hint hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbHint {
    pub kind: DbHintKind,
    #[serde(rename = "match")]
    pub matched: String,
}

static HINT_PATTERNS: LazyLock<Vec<(DbHintKind, Regex)>> = LazyLock::new(|| {
    [
        (
            DbHintKind::BcCall,
            r"(?i)\b\w+_bc\s*\.\s*(?:load|save|insert|update|delete)\b",
        ),
        (DbHintKind::PrDefault, r"(?i)\bpr_default\b"),
        (
            DbHintKind::Cursor,
            r"(?i)\b(?:cursor\b|open\s*\(|close\s*\(|fetch\s*\()",
        ),
        (
            DbHintKind::DataStore,
            r"(?i)\b(?:DataStoreProvider|IDataStoreProvider|DataStoreHelper|GxDataStore|GxContext)\b",
        ),
        (
            DbHintKind::Execute,
            r"(?i)\b(?:execute\s*\(|executeStmt\b|executeDirectSQL\b|executeQuery\b|executeUpdate\b)",
        ),
        (
            DbHintKind::Jdbc,
            r"(?i)\b(?:prepareStatement|createStatement|PreparedStatement|CallableStatement|ResultSet)\b",
        ),
        (
            DbHintKind::SqlKeyword,
            r"(?i)\b(?:select|insert\s+into|update|delete\s+from)\b",
        ),
    ]
    .into_iter()
    .map(|(kind, p)| (kind, Regex::new(p).expect("hint pattern compiles")))
    .collect()
});

fn all_patterns() -> impl Iterator<Item = (DbHintKind, &'static Regex)> {
    GENEXUS_PATTERNS
        .iter()
        .map(|(idiom, re)| (DbHintKind::Genexus(*idiom), re))
        .chain(HINT_PATTERNS.iter().map(|(kind, re)| (*kind, re)))
}

/// Whether any GeneXus idiom or generic DB hint occurs in `text`.
pub fn has_db_hints(text: &str) -> bool {
    !text.is_empty() && all_patterns().any(|(_, re)| re.is_match(text))
}

/// Up to `max_items` hint hits, GeneXus idioms first.
pub fn scan(text: &str, max_items: usize) -> Vec<DbHint> {
    let mut out = Vec::new();
    if text.is_empty() || max_items == 0 {
        return out;
    }
    for (kind, re) in all_patterns() {
        for m in re.find_iter(text) {
            out.push(DbHint {
                kind,
                matched: m.as_str().chars().take(MAX_HINT_MATCH_LEN).collect(),
            });
            if out.len() >= max_items {
                return out;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_common_idioms() {
        assert!(has_db_hints("Customer_BC.Load(id)"));
        assert!(has_db_hints("pr_default.execute(3)"));
        assert!(has_db_hints("PreparedStatement ps = conn.prepareStatement(sql);"));
        assert!(has_db_hints("String q = \"select 1\";"));
        assert!(has_db_hints("for each Invoice"));
    }

    #[test]
    fn plain_code_has_no_hints() {
        assert!(!has_db_hints("int total = a + b; return total;"));
        assert!(!has_db_hints(""));
    }

    #[test]
    fn scan_lists_genexus_first_and_respects_cap() {
        let hits = scan("order_bc.save(); pr_default.close(1); select x", 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].kind, DbHintKind::Genexus(GenexusIdiom::BcSave));
        assert_eq!(hits[1].kind, DbHintKind::BcCall);
    }
}
