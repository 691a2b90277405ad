//! Table reference extraction.
//!
//! Finds the tables a method's text touches, through embedded SQL and
//! through GeneXus data-access idioms, validating every candidate against
//! the table catalog. Also hosts the catalog-independent DB hint scanner
//! used to decide whether an unresolvable-looking leaf is worth visiting.

pub mod cache;
pub mod columns;
pub mod detector;
pub mod hints;
pub mod patterns;
pub mod types;

pub use cache::ExtractionCache;
pub use detector::ReferenceExtractor;
pub use hints::{has_db_hints, DbHint, DbHintKind};
pub use patterns::GenexusIdiom;
pub use types::{ColumnHit, ColumnUsage, CrudOp, ExtractedFacts, OperationKind, TableReference};
