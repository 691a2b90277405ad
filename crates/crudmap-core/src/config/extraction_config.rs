//! Reference extraction configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONTEXT_WINDOW, DEFAULT_MAX_COLUMNS_USED, DEFAULT_MAX_LISTED_COLUMNS,
};

/// Configuration for table reference extraction and table usage output.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Characters of source kept around each reference. Default: 100.
    pub context_window: Option<usize>,
    /// Heuristic column hits kept per table per method. Default: 25.
    pub max_columns_used: Option<usize>,
    /// Catalog columns attached to each used table. Default: 10.
    pub max_listed_columns: Option<usize>,
}

impl ExtractionConfig {
    pub fn effective_context_window(&self) -> usize {
        self.context_window.unwrap_or(DEFAULT_CONTEXT_WINDOW)
    }

    pub fn effective_max_columns_used(&self) -> usize {
        self.max_columns_used.unwrap_or(DEFAULT_MAX_COLUMNS_USED)
    }

    pub fn effective_max_listed_columns(&self) -> usize {
        self.max_listed_columns.unwrap_or(DEFAULT_MAX_LISTED_COLUMNS)
    }
}
