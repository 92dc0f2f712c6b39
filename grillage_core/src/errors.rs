//! # Error Types
//!
//! Structured error types for grillage_core. Every precondition failure in a
//! deck calculation is reported as a [`CalcError::ConfigurationError`] naming
//! the offending field, so callers can point the user at the exact input.
//!
//! ## Example
//!
//! ```rust
//! use grillage_core::errors::{CalcError, CalcResult};
//!
//! fn validate_gap(girder_gap_mm: f64) -> CalcResult<()> {
//!     if girder_gap_mm <= 0.0 {
//!         return Err(CalcError::configuration(
//!             "girder_gap_mm",
//!             girder_gap_mm.to_string(),
//!             "Girder gap must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_gap(-1.0).is_err());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for grillage_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Reason attached to a negative flange width.
pub const INSUFFICIENT_WIDTH: &str = "insufficient width for girder count";

/// Everything that can go wrong laying out a deck or handling its files.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input is out of range, or the inputs together describe an
    /// impossible deck (e.g. more girders than the width can hold)
    #[error("Configuration error for '{field}': {value} - {reason}")]
    ConfigurationError {
        field: String,
        value: String,
        reason: String,
    },

    /// No layout with this label in the project
    #[error("No layout labelled '{label}' in the project")]
    LayoutNotFound { label: String },

    /// Reading or writing a project, input or lock file failed
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Another process is editing the project
    #[error("Project '{path}' is being edited by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// A file's JSON did not match the expected shape
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Project written by an incompatible version of the tool
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    pub fn configuration(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ConfigurationError {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// The ConfigurationError raised when a sub-structure is too narrow for
    /// its girders and gaps
    pub fn insufficient_width(field: impl Into<String>, flange_width_mm: f64) -> Self {
        CalcError::configuration(field, format!("{:.3} mm", flange_width_mm), INSUFFICIENT_WIDTH)
    }

    pub fn layout_not_found(label: impl Into<String>) -> Self {
        CalcError::LayoutNotFound { label: label.into() }
    }

    /// Wrap an I/O failure on `path`
    pub fn file_error(operation: impl Into<String>, path: &Path, reason: impl ToString) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn file_locked(path: &Path, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.display().to_string(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    pub fn serialization(reason: impl ToString) -> Self {
        CalcError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Short code for scripts consuming the CLI's error JSON
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::ConfigurationError { .. } => "CONFIGURATION_ERROR",
            CalcError::LayoutNotFound { .. } => "LAYOUT_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
