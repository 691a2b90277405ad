//! Tests for the crudmap configuration system.

use std::sync::Mutex;

use crudmap_core::config::{CliOverrides, CrudmapConfig};
use crudmap_core::errors::ConfigError;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all CRUDMAP_ env vars to prevent cross-test contamination.
fn clear_crudmap_env_vars() {
    for key in [
        "CRUDMAP_MAX_CALL_DEPTH",
        "CRUDMAP_MAX_CALL_NODES",
        "CRUDMAP_SKIP_LEAF_METHODS",
        "CRUDMAP_PARALLEL",
        "CRUDMAP_DEBUG_SAMPLES",
        "CRUDMAP_RELAX_ARITY_FALLBACK",
    ] {
        std::env::remove_var(key);
    }
}

/// CLI beats env, env beats the project file.
#[test]
fn test_four_layer_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_crudmap_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("crudmap.toml"),
        r#"
[traversal]
max_call_depth = 4
max_call_nodes = 50

[resolution]
relax_arity_fallback = false
"#,
    )
    .unwrap();

    std::env::set_var("CRUDMAP_MAX_CALL_NODES", "300");

    let cli = CliOverrides {
        max_call_depth: Some(12),
        ..Default::default()
    };

    let config = CrudmapConfig::load(dir.path(), Some(&cli)).unwrap();

    assert_eq!(config.traversal.max_call_depth, Some(12));
    assert_eq!(config.traversal.max_call_nodes, Some(300));
    assert_eq!(config.resolution.relax_arity_fallback, Some(false));

    clear_crudmap_env_vars();
}

#[test]
fn test_load_missing_files_fallback() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_crudmap_env_vars();

    let dir = tempdir();
    let config = CrudmapConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.traversal.effective_max_call_depth(), 8);
    assert_eq!(config.traversal.effective_max_call_nodes(), 800);
    assert!(config.traversal.effective_skip_leaf_methods());
    assert!(config.traversal.effective_parallel());
    assert_eq!(config.resolution.effective_max_candidates(), 20);
    assert!(config.resolution.effective_relax_arity_fallback());
    assert_eq!(config.extraction.effective_context_window(), 100);
    assert_eq!(config.extraction.effective_max_columns_used(), 25);
    assert_eq!(config.extraction.effective_max_listed_columns(), 10);
}

#[test]
fn test_env_var_garbage_is_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_crudmap_env_vars();

    let dir = tempdir();
    std::env::set_var("CRUDMAP_MAX_CALL_DEPTH", "deep");
    std::env::set_var("CRUDMAP_PARALLEL", "false");

    let config = CrudmapConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.traversal.max_call_depth, None);
    assert_eq!(config.traversal.parallel, Some(false));

    clear_crudmap_env_vars();
}

#[test]
fn test_invalid_toml_syntax() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_crudmap_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("crudmap.toml"), "this is not valid toml {{{{").unwrap();

    match CrudmapConfig::load(dir.path(), None).unwrap_err() {
        ConfigError::ParseError { .. } => {}
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn test_zero_node_budget_rejected() {
    let err = CrudmapConfig::from_toml("[traversal]\nmax_call_nodes = 0\n").unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => {
            assert_eq!(field, "traversal.max_call_nodes");
        }
        other => panic!("Expected ValidationFailed, got: {:?}", other),
    }
}

#[test]
fn test_cli_node_budget_clamped_to_one() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_crudmap_env_vars();

    let dir = tempdir();
    let cli = CliOverrides {
        max_call_nodes: Some(0),
        ..Default::default()
    };
    let config = CrudmapConfig::load(dir.path(), Some(&cli)).unwrap();
    assert_eq!(config.traversal.effective_max_call_nodes(), 1);
}

#[test]
fn test_unknown_keys_ignored() {
    let config = CrudmapConfig::from_toml(
        r#"
[traversal]
max_call_depth = 3
colour = "blue"

[reporting]
format = "json"
"#,
    )
    .unwrap();
    assert_eq!(config.traversal.effective_max_call_depth(), 3);
}

#[test]
fn test_merge_keeps_unset_fields() {
    let mut base = CrudmapConfig::from_toml("[traversal]\nmax_call_depth = 5\nmax_call_nodes = 99\n")
        .unwrap();
    let over = CrudmapConfig::from_toml("[traversal]\nmax_call_nodes = 10\n").unwrap();
    base.merge(&over);
    assert_eq!(base.traversal.max_call_depth, Some(5));
    assert_eq!(base.traversal.max_call_nodes, Some(10));
}

#[test]
fn test_toml_round_trip() {
    let config = CrudmapConfig::from_toml(
        "[traversal]\nmax_call_depth = 6\n\n[extraction]\ncontext_window = 80\n",
    )
    .unwrap();
    let text = config.to_toml().unwrap();
    let again = CrudmapConfig::from_toml(&text).unwrap();
    assert_eq!(again.traversal.max_call_depth, Some(6));
    assert_eq!(again.extraction.context_window, Some(80));
}
