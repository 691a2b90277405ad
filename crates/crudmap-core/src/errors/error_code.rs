//! Stable error codes.

/// Gives every crudmap error a stable, machine-readable code.
pub trait CrudmapErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_message(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const MODEL_ERROR: &str = "MODEL_ERROR";
pub const CATALOG_CONTRACT: &str = "CATALOG_CONTRACT";
pub const CANCELLED: &str = "CANCELLED";
