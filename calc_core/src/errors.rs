//! # Error Types
//!
//! Structured error types for calc_core. A calculation either completes or is
//! refused by a validation guard; these errors describe why it was refused so a
//! form can highlight the offending fields.
//!
//! Threshold breaches (non-compliant U-value, unstable scaffold, excessive
//! voltage drop) are NOT errors. They are reported as
//! [`RuleWarning`](crate::rules::RuleWarning)s on a successful result.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_m: f64) -> CalcResult<()> {
//!     if length_m <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "length_m",
//!             length_m.to_string(),
//!             "Length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// One or more required fields are absent, blank or non-numeric
    #[error("Incomplete input: {}", fields.join(", "))]
    IncompleteInput { fields: Vec<String> },

    /// An input value is present but unusable (out of range, unknown option, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Insulation material code not present in the material table
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// A reference table handed to an engine breaks its own invariants
    #[error("Invalid reference table '{table}': {reason}")]
    InvalidTable { table: String, reason: String },

    /// File I/O error (settings and request files)
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an IncompleteInput error from the missing field names
    pub fn incomplete<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CalcError::IncompleteInput {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create an InvalidTable error
    pub fn invalid_table(table: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidTable {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// True when the calculation is simply not yet calculable (fields still missing).
    ///
    /// Callers keep whatever result they were showing and wait for more input.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, CalcError::IncompleteInput { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::IncompleteInput { .. } => "INCOMPLETE_INPUT",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::InvalidTable { .. } => "INVALID_TABLE",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::serialization(e.to_string())
    }
}

impl From<toml::de::Error> for CalcError {
    fn from(e: toml::de::Error) -> Self {
        CalcError::serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("width_m", "-1.2", "Width must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_incomplete_lists_fields() {
        let error = CalcError::incomplete(["height_m", "width_m"]);
        assert!(error.is_incomplete());
        assert_eq!(error.to_string(), "Incomplete input: height_m, width_m");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::incomplete(["x"]).error_code(), "INCOMPLETE_INPUT");
        assert_eq!(CalcError::material_not_found("cork").error_code(), "MATERIAL_NOT_FOUND");
        assert_eq!(CalcError::invalid_table("ampacity", "empty").error_code(), "INVALID_TABLE");
        assert!(!CalcError::material_not_found("cork").is_incomplete());
    }
}
