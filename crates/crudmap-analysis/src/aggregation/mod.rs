//! Folding a traversal's references into per-table usage and a CRUD matrix.

pub mod aggregator;
pub mod types;

pub use aggregator::UsageAggregator;
pub use types::{CrudMatrix, TableUsage};
