//! Error types for crudmap.
//! One enum per subsystem, `thiserror` derives, and a code per variant.

pub mod config_error;
pub mod error_code;
pub mod model_error;
pub mod pipeline_error;

pub use config_error::ConfigError;
pub use error_code::CrudmapErrorCode;
pub use model_error::ModelError;
pub use pipeline_error::PipelineError;
