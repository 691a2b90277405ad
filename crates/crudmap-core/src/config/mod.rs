//! Configuration system for crudmap.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod crudmap_config;
pub mod extraction_config;
pub mod resolution_config;
pub mod traversal_config;

pub use crudmap_config::{CliOverrides, CrudmapConfig};
pub use extraction_config::ExtractionConfig;
pub use resolution_config::ResolutionConfig;
pub use traversal_config::TraversalConfig;
