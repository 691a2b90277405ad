//! Errors raised while loading the program model or the table catalog.

use super::error_code::{self, CrudmapErrorCode};

/// Input loading errors.
///
/// Field-level problems in the program model are tolerated and never reach
/// this type. Unreadable input, a model whose top level is not an object
/// and a structurally broken catalog do.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid JSON in {source_name}: {message}")]
    InvalidJson { source_name: String, message: String },

    #[error("Table catalog is malformed: {message}")]
    CatalogContract { message: String },
}

impl CrudmapErrorCode for ModelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::CatalogContract { .. } => error_code::CATALOG_CONTRACT,
            _ => error_code::MODEL_ERROR,
        }
    }
}
