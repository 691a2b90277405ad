//! Shared constants for the crudmap analyzer.

/// crudmap version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---- Traversal ----

/// Default maximum call depth below an entry method.
pub const DEFAULT_MAX_CALL_DEPTH: u32 = 8;

/// Default maximum number of methods visited per entry class.
pub const DEFAULT_MAX_CALL_NODES: usize = 800;

// ---- Resolution ----

/// Default cap on candidates returned for a single call.
pub const DEFAULT_MAX_CANDIDATES: usize = 20;

/// Overloads kept from one class when the arity filter still leaves several.
pub const IN_CLASS_SAMPLE: usize = 10;

/// Overloads kept from one class when no overload matches the arity.
pub const IN_CLASS_AMBIGUOUS_SAMPLE: usize = 3;

/// Global same-name methods taken by the relaxed-arity fallback.
pub const RELAXED_SAMPLE: usize = 10;

// ---- Extraction ----

/// Default width in characters of the snippet kept around a reference.
pub const DEFAULT_CONTEXT_WINDOW: usize = 100;

/// Default cap on heuristic column hits per table per method.
pub const DEFAULT_MAX_COLUMNS_USED: usize = 25;

/// Default number of catalog columns attached to each used table.
pub const DEFAULT_MAX_LISTED_COLUMNS: usize = 10;

/// Column names of this length or shorter are never matched heuristically.
pub const MIN_COLUMN_NAME_LEN: usize = 2;

// ---- Entry points ----

/// `function_type` values that mark a class as an entry point.
pub const ENTRY_FUNCTION_TYPES: [&str; 2] = ["screen", "batch"];
