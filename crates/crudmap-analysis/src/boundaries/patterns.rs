//! Compiled regular expressions shared by the extractor and the hint scanner.

use std::sync::LazyLock;

use regex::Regex;

use super::types::OperationKind;

/// One identifier segment, optionally wrapped in `"`, `` ` `` or `[ ]`.
const IDENT_PART: &str = r#"[`"\[]?[A-Za-z_][A-Za-z0-9_]*[`"\]]?"#;

fn table_pattern(prefix: &str) -> Regex {
    let pattern = format!(r"(?i){prefix}({IDENT_PART}(?:\s*\.\s*{IDENT_PART})*)");
    Regex::new(&pattern).expect("table pattern compiles")
}

pub(crate) struct SqlPattern {
    pub op: OperationKind,
    pub regex: Regex,
}

pub(crate) static SQL_PATTERNS: LazyLock<Vec<SqlPattern>> = LazyLock::new(|| {
    vec![
        SqlPattern {
            op: OperationKind::Select,
            regex: table_pattern(r"\bFROM\s+"),
        },
        SqlPattern {
            op: OperationKind::Select,
            regex: table_pattern(r"\bJOIN\s+"),
        },
        SqlPattern {
            op: OperationKind::Insert,
            regex: table_pattern(r"\bINSERT\s+INTO\s+"),
        },
        SqlPattern {
            op: OperationKind::Update,
            regex: table_pattern(r"\bUPDATE\s+"),
        },
        SqlPattern {
            op: OperationKind::Delete,
            regex: table_pattern(r"\bDELETE\s+FROM\s+"),
        },
    ]
});

/// GeneXus data-access idioms. Group 1 is always the entity name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenexusIdiom {
    BcLoad,
    BcSave,
    BcDelete,
    ForEach,
    SdtRef,
}

impl GenexusIdiom {
    pub fn operation(self) -> OperationKind {
        match self {
            Self::BcLoad | Self::ForEach => OperationKind::Select,
            Self::BcSave => OperationKind::InsertUpdate,
            Self::BcDelete => OperationKind::Delete,
            Self::SdtRef => OperationKind::Reference,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::BcLoad => "BC_LOAD",
            Self::BcSave => "BC_SAVE",
            Self::BcDelete => "BC_DELETE",
            Self::ForEach => "FOR_EACH",
            Self::SdtRef => "SDT_REF",
        }
    }
}

pub(crate) static GENEXUS_PATTERNS: LazyLock<Vec<(GenexusIdiom, Regex)>> = LazyLock::new(|| {
    [
        (GenexusIdiom::BcLoad, r"(?i)(\w+)_bc\s*\.\s*load"),
        (GenexusIdiom::BcSave, r"(?i)(\w+)_bc\s*\.\s*save"),
        (GenexusIdiom::BcDelete, r"(?i)(\w+)_bc\s*\.\s*delete"),
        (GenexusIdiom::ForEach, r"(?i)for\s+each\s+(\w+)"),
        (GenexusIdiom::SdtRef, r"(?i)sdt_(\w+)"),
    ]
    .into_iter()
    .map(|(idiom, p)| (idiom, Regex::new(p).expect("genexus pattern compiles")))
    .collect()
});

pub(crate) static IDENT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("identifier pattern compiles"));
