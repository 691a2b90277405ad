//! Subscriber setup for the analyzer's structured logs.
//!
//! Targets worth filtering on:
//! - `crudmap_analysis::index`: model indexing stats
//! - `crudmap_analysis::catalog`: duplicate tables dropped at load
//! - `crudmap_analysis::graph`: per-entry traversal spans, truncation
//! - `crudmap_analysis::pipeline`: run start and summary

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "CRUDMAP_LOG";

/// Prefix match, so it covers both `crudmap_core` and `crudmap_analysis`.
pub const DEFAULT_FILTER: &str = "crudmap=info";

/// Install the fmt subscriber once per process.
///
/// Traversal spans are at debug level, so tracing one entry class needs
/// `CRUDMAP_LOG=crudmap_analysis::graph=debug`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
