//! # Error Types
//!
//! Structured error types for pallet_core. Every failure a quote can run
//! into maps to one variant, so front ends can decide between a blocking
//! message, an inline validation hint, or a retryable banner.
//!
//! ## Example
//!
//! ```rust
//! use pallet_core::errors::{QuoteError, QuoteResult};
//!
//! fn require_location(location_id: Option<&str>) -> QuoteResult<&str> {
//!     location_id.ok_or_else(|| {
//!         QuoteError::validation_failed("Pallet 1", "location_id", "Select a shipping location")
//!     })
//! }
//!
//! assert!(require_location(None).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pallet_core operations
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Structured error type for quoting operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum QuoteError {
    /// No settings document exists. Top-level defaults are never substituted.
    #[error("Configuration missing: {what}")]
    ConfigurationMissing { what: String },

    /// A pallet is missing a field required before pricing can run
    #[error("Validation failed for '{pallet}': {field} - {reason}")]
    ValidationFailed {
        pallet: String,
        field: String,
        reason: String,
    },

    /// Saving to a store failed; computed results are still held in memory
    #[error("Persistence failed: {operation} - {reason}")]
    PersistenceFailed { operation: String, reason: String },

    /// An input value is invalid (negative count, unknown label, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A referenced record does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl QuoteError {
    /// Create a ConfigurationMissing error
    pub fn configuration_missing(what: impl Into<String>) -> Self {
        QuoteError::ConfigurationMissing { what: what.into() }
    }

    /// Create a ValidationFailed error
    pub fn validation_failed(pallet: impl Into<String>, field: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::ValidationFailed {
            pallet: pallet.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a PersistenceFailed error
    pub fn persistence_failed(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::PersistenceFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        QuoteError::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        QuoteError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        QuoteError::SerializationError { reason: reason.into() }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            QuoteError::FileLocked { .. } | QuoteError::PersistenceFailed { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteError::ConfigurationMissing { .. } => "CONFIGURATION_MISSING",
            QuoteError::ValidationFailed { .. } => "VALIDATION_FAILED",
            QuoteError::PersistenceFailed { .. } => "PERSISTENCE_FAILED",
            QuoteError::InvalidInput { .. } => "INVALID_INPUT",
            QuoteError::NotFound { .. } => "NOT_FOUND",
            QuoteError::FileError { .. } => "FILE_ERROR",
            QuoteError::FileLocked { .. } => "FILE_LOCKED",
            QuoteError::SerializationError { .. } => "SERIALIZATION_ERROR",
            QuoteError::VersionMismatch { .. } => "VERSION_MISMATCH",
            QuoteError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(e: serde_json::Error) -> Self {
        QuoteError::serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = QuoteError::validation_failed("Pallet 2", "transportation_type", "Select a vehicle");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"ValidationFailed\""));
        let roundtrip: QuoteError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(QuoteError::configuration_missing("settings").error_code(), "CONFIGURATION_MISSING");
        assert_eq!(QuoteError::not_found("ShippingLocation", "loc-1").error_code(), "NOT_FOUND");
        assert_eq!(QuoteError::persistence_failed("save quote", "disk full").error_code(), "PERSISTENCE_FAILED");
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(QuoteError::persistence_failed("save quote", "disk full").is_recoverable());
        assert!(QuoteError::file_locked("quotes.json", "someone", "now").is_recoverable());
        assert!(!QuoteError::configuration_missing("settings").is_recoverable());
    }

    #[test]
    fn test_display_message() {
        let error = QuoteError::not_found("ShippingLocation", "loc-7");
        assert_eq!(error.to_string(), "ShippingLocation not found: loc-7");
    }
}
