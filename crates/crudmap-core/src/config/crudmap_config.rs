//! Top-level crudmap configuration with 4-layer resolution.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ExtractionConfig, ResolutionConfig, TraversalConfig};
use crate::errors::ConfigError;

/// Project config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "crudmap.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CRUDMAP_*`)
/// 3. Project config (`crudmap.toml` in project root)
/// 4. User config (`~/.crudmap/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CrudmapConfig {
    pub traversal: TraversalConfig,
    pub resolution: ResolutionConfig,
    pub extraction: ExtractionConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_call_depth: Option<u32>,
    pub max_call_nodes: Option<usize>,
    pub relax_arity_fallback: Option<bool>,
    pub parallel: Option<bool>,
}

impl CrudmapConfig {
    /// Load configuration with 4-layer resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &CrudmapConfig) -> Result<(), ConfigError> {
        if config.traversal.max_call_nodes == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "traversal.max_call_nodes".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if config.resolution.max_candidates == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "resolution.max_candidates".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if config.extraction.context_window == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "extraction.context_window".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.crudmap/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".crudmap").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut CrudmapConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: CrudmapConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        config.merge(&file_config);
        Ok(())
    }

    /// Overlay `other` onto `self`; only `Some` values in `other` win.
    pub fn merge(&mut self, other: &CrudmapConfig) {
        let (base, over) = (&mut self.traversal, &other.traversal);
        base.max_call_depth = over.max_call_depth.or(base.max_call_depth);
        base.max_call_nodes = over.max_call_nodes.or(base.max_call_nodes);
        base.skip_leaf_methods = over.skip_leaf_methods.or(base.skip_leaf_methods);
        base.parallel = over.parallel.or(base.parallel);
        base.debug_samples = over.debug_samples.or(base.debug_samples);

        let (base, over) = (&mut self.resolution, &other.resolution);
        base.max_candidates = over.max_candidates.or(base.max_candidates);
        base.relax_arity_fallback = over.relax_arity_fallback.or(base.relax_arity_fallback);

        let (base, over) = (&mut self.extraction, &other.extraction);
        base.context_window = over.context_window.or(base.context_window);
        base.max_columns_used = over.max_columns_used.or(base.max_columns_used);
        base.max_listed_columns = over.max_listed_columns.or(base.max_listed_columns);
    }

    /// Apply environment variable overrides.
    /// Values that do not parse are ignored.
    fn apply_env_overrides(config: &mut CrudmapConfig) {
        if let Some(v) = env_value("CRUDMAP_MAX_CALL_DEPTH") {
            config.traversal.max_call_depth = Some(v);
        }
        if let Some(v) = env_value("CRUDMAP_MAX_CALL_NODES") {
            config.traversal.max_call_nodes = Some(v);
        }
        if let Some(v) = env_value("CRUDMAP_SKIP_LEAF_METHODS") {
            config.traversal.skip_leaf_methods = Some(v);
        }
        if let Some(v) = env_value("CRUDMAP_PARALLEL") {
            config.traversal.parallel = Some(v);
        }
        if let Some(v) = env_value("CRUDMAP_DEBUG_SAMPLES") {
            config.traversal.debug_samples = Some(v);
        }
        if let Some(v) = env_value("CRUDMAP_RELAX_ARITY_FALLBACK") {
            config.resolution.relax_arity_fallback = Some(v);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut CrudmapConfig, cli: &CliOverrides) {
        if let Some(v) = cli.max_call_depth {
            config.traversal.max_call_depth = Some(v);
        }
        if let Some(v) = cli.max_call_nodes {
            config.traversal.max_call_nodes = Some(v.max(1));
        }
        if let Some(v) = cli.relax_arity_fallback {
            config.resolution.relax_arity_fallback = Some(v);
        }
        if let Some(v) = cli.parallel {
            config.traversal.parallel = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_value<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse().ok()
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
