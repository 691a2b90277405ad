//! Program model input: the parsed-source description of classes, methods
//! and call sites that the analyzer consumes.
//!
//! Loading is lenient. A field with the wrong JSON type reads as absent and a
//! malformed list element is dropped on its own, so one bad method never
//! costs the rest of the file.

pub(crate) mod lenient;
pub mod records;

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crudmap_core::errors::ModelError;

pub use records::{CallDescriptor, ClassRecord, FunctionType, MethodRecord};

/// The whole parsed program.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProgramModel {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub project_name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub project_root: Option<String>,
    #[serde(deserialize_with = "lenient::seq")]
    pub files: Vec<SourceFile>,
}

/// One parsed source file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceFile {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub path: Option<String>,
    #[serde(deserialize_with = "lenient::seq")]
    pub classes: Vec<RawClass>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawClass {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub package: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub function_type: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub genexus_type: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub dependencies: RawDependencies,
    #[serde(deserialize_with = "lenient::seq")]
    pub methods: Vec<RawMethod>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDependencies {
    #[serde(deserialize_with = "lenient::string_list")]
    pub type_references: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMethod {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_int")]
    pub param_count: Option<i64>,
    #[serde(deserialize_with = "lenient::opt_int")]
    pub start_line: Option<i64>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub signature: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub code: Option<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub sql_strings: Vec<String>,
    #[serde(deserialize_with = "lenient::seq")]
    pub calls: Vec<RawCall>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCall {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub qualifier: Option<String>,
    #[serde(deserialize_with = "lenient::opt_int")]
    pub arg_count: Option<i64>,
    #[serde(deserialize_with = "lenient::opt_int")]
    pub line: Option<i64>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub text: Option<String>,
}

impl ProgramModel {
    /// Parse a program model from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Self::parse(json, "<string>")
    }

    /// Read and parse a program model file.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = read_input(path)?;
        Self::parse(&text, &path.display().to_string())
    }

    fn parse(json: &str, source_name: &str) -> Result<Self, ModelError> {
        let invalid = |message: String| ModelError::InvalidJson {
            source_name: source_name.to_string(),
            message,
        };
        let value: Value = serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;
        if !value.is_object() {
            return Err(invalid("top level must be an object".to_string()));
        }
        serde_json::from_value(value).map_err(|e| invalid(e.to_string()))
    }

    /// Total number of classes across all files.
    pub fn class_count(&self) -> usize {
        self.files.iter().map(|f| f.classes.len()).sum()
    }
}

pub(crate) fn read_input(path: &Path) -> Result<String, ModelError> {
    std::fs::read_to_string(path).map_err(|e| ModelError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
