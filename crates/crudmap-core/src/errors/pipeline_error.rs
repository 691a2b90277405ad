//! Pipeline errors.

use super::error_code::{self, CrudmapErrorCode};
use super::{ConfigError, ModelError};

/// Errors that can end an analysis run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Model(#[from] ModelError),

    #[error("Analysis cancelled")]
    Cancelled,
}

impl CrudmapErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Model(e) => e.error_code(),
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
