//! Tests for error codes and conversions.

use crudmap_core::errors::error_code;
use crudmap_core::errors::{ConfigError, CrudmapErrorCode, ModelError, PipelineError};

#[test]
fn test_every_error_has_a_code() {
    let config = ConfigError::InvalidValue {
        field: "traversal.parallel".into(),
        message: "not a bool".into(),
    };
    assert_eq!(config.error_code(), error_code::CONFIG_ERROR);

    let io = ModelError::Io {
        path: "model.json".into(),
        message: "denied".into(),
    };
    assert_eq!(io.error_code(), error_code::MODEL_ERROR);

    let contract = ModelError::CatalogContract {
        message: "tables must be a list".into(),
    };
    assert_eq!(contract.error_code(), error_code::CATALOG_CONTRACT);

    assert_eq!(PipelineError::Cancelled.error_code(), error_code::CANCELLED);
}

#[test]
fn test_pipeline_error_keeps_source_code() {
    let err: PipelineError = ModelError::CatalogContract {
        message: "table #2 has no table_name".into(),
    }
    .into();
    assert_eq!(err.error_code(), error_code::CATALOG_CONTRACT);
    assert!(err.to_string().contains("table #2"));

    let err: PipelineError = ConfigError::FileNotFound {
        path: "crudmap.toml".into(),
    }
    .into();
    assert_eq!(err.error_code(), error_code::CONFIG_ERROR);
}

#[test]
fn test_coded_message_format() {
    let msg = PipelineError::Cancelled.coded_message();
    assert_eq!(msg, "[CANCELLED] Analysis cancelled");
}
