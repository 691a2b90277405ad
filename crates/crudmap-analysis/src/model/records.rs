//! Validated records built from the raw program model.

use serde::{Serialize, Serializer};

use crudmap_core::constants::ENTRY_FUNCTION_TYPES;
use crudmap_core::types::{ClassId, MethodId, NameId};

use super::RawCall;

/// Role of a class in the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FunctionType {
    Screen,
    Batch,
    Other(String),
    Unknown,
}

impl FunctionType {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()) {
            None => Self::Unknown,
            Some(s) if s == ENTRY_FUNCTION_TYPES[0] => Self::Screen,
            Some(s) if s == ENTRY_FUNCTION_TYPES[1] => Self::Batch,
            Some(s) => Self::Other(s),
        }
    }

    /// Screens and batches are where traversal starts.
    pub fn is_entry(&self) -> bool {
        matches!(self, Self::Screen | Self::Batch)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Screen => "screen",
            Self::Batch => "batch",
            Self::Other(s) => s,
            Self::Unknown => "unknown",
        }
    }
}

impl Serialize for FunctionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One call site inside a method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDescriptor {
    pub name: String,
    /// Receiver text as written, e.g. `this`, `svc`, `new OrderService()`.
    pub qualifier: Option<String>,
    /// `None` when the parser could not count the arguments.
    pub arg_count: Option<usize>,
    pub line: Option<u32>,
    pub text: Option<String>,
}

impl CallDescriptor {
    /// Returns `None` for a call without a name.
    pub fn from_raw(raw: &RawCall) -> Option<Self> {
        let name = raw.name.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            qualifier: raw.qualifier.clone(),
            arg_count: raw.arg_count.and_then(|n| usize::try_from(n).ok()),
            line: raw.line.and_then(|n| u32::try_from(n).ok()),
            text: raw.text.clone(),
        })
    }

    /// Convenience constructor for synthesized call sites.
    pub fn new(name: &str, qualifier: Option<&str>, arg_count: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            qualifier: qualifier.map(str::to_string),
            arg_count,
            line: None,
            text: None,
        }
    }
}

/// A class as held by the program index.
#[derive(Debug, Clone)]
pub struct ClassRecord {
    pub id: ClassId,
    /// Fully qualified name; falls back to `package.name`, then `name`.
    pub full_name: String,
    pub short_name: String,
    pub short_name_id: NameId,
    pub package: Option<String>,
    pub function_type: FunctionType,
    pub genexus_type: Option<String>,
    /// Declared types this class refers to (field types, locals, parameters).
    pub type_references: Vec<String>,
    pub methods: Vec<MethodId>,
    pub file: Option<String>,
}

/// A method as held by the program index.
#[derive(Debug, Clone)]
pub struct MethodRecord {
    pub id: MethodId,
    pub class: ClassId,
    pub name: String,
    pub name_id: NameId,
    /// `None` when the parser did not report a parameter count.
    pub param_count: Option<usize>,
    pub start_line: u32,
    /// Body (or signature) followed by the method's SQL string literals.
    pub text: String,
    pub sql_literal_count: usize,
    pub calls: Vec<CallDescriptor>,
    pub has_db_hints: bool,
}

impl MethodRecord {
    /// A method that can neither reach other code nor touch the database.
    pub fn is_inert_leaf(&self) -> bool {
        self.calls.is_empty() && self.sql_literal_count == 0 && !self.has_db_hints
    }

    pub fn accepts_arity(&self, arg_count: usize) -> bool {
        self.param_count.map_or(true, |p| p == arg_count)
    }
}

/// Identity string of a method: `{class}::{name}({params})@{line}`.
/// Unknown parameter counts render as `-1`.
pub fn method_key(class_full: &str, name: &str, param_count: Option<usize>, start_line: u32) -> String {
    match param_count {
        Some(p) => format!("{class_full}::{name}({p})@{start_line}"),
        None => format!("{class_full}::{name}(-1)@{start_line}"),
    }
}

/// Method text: code (or signature when there is no code), then each SQL literal on its own line.
pub fn method_text(code: Option<&str>, signature: Option<&str>, sql_strings: &[String]) -> String {
    let mut text = code.or(signature).unwrap_or_default().to_string();
    if !sql_strings.is_empty() {
        text.push('\n');
        text.push_str(&sql_strings.join("\n"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_type_is_case_insensitive() {
        assert_eq!(FunctionType::parse(Some("Screen")), FunctionType::Screen);
        assert_eq!(FunctionType::parse(Some("BATCH")), FunctionType::Batch);
        assert!(!FunctionType::parse(Some("procedure")).is_entry());
        assert_eq!(FunctionType::parse(None), FunctionType::Unknown);
    }

    #[test]
    fn negative_arg_count_means_unknown() {
        let raw = RawCall {
            name: Some("load".into()),
            arg_count: Some(-1),
            ..Default::default()
        };
        assert_eq!(CallDescriptor::from_raw(&raw).unwrap().arg_count, None);
        assert!(CallDescriptor::from_raw(&RawCall::default()).is_none());
    }

    #[test]
    fn method_text_appends_sql_literals() {
        let sql = vec!["SELECT * FROM A".to_string(), "DELETE FROM B".to_string()];
        assert_eq!(
            method_text(Some("run();"), Some("void run()"), &sql),
            "run();\nSELECT * FROM A\nDELETE FROM B"
        );
        assert_eq!(method_text(None, Some("void run()"), &[]), "void run()");
    }

    #[test]
    fn method_key_format() {
        assert_eq!(method_key("app.OrderService", "persist", Some(1), 40), "app.OrderService::persist(1)@40");
        assert_eq!(method_key("Util", "x", None, 0), "Util::x(-1)@0");
    }
}
