//! Typed error handling for lookups
//!
//! Lookup failures fall into distinct categories so that callers can decide
//! how to surface them:
//!
//! - [`ConfigError`]: setup mistakes by the lookup author (missing id field,
//!   unknown sort column, malformed format template). Fatal, never retried.
//! - [`InputError`]: problems originating from the client request, such as a
//!   non-numeric id for a numeric identifier field.
//! - [`LookupError::Source`]: failures reported by the record source.
//!
//! Missing or null field values while rendering rows are not errors; they
//! degrade to null cells.
//!
//! # Example
//!
//! ```rust,ignore
//! match lookup.get_data(&filter, &source).await {
//!     Ok(data) => respond(data),
//!     Err(err) if err.is_client_error() => bad_request(err.error_code(), err.to_string()),
//!     Err(err) => server_error(err),
//! }
//! ```

use crate::core::field::FieldKind;
use thiserror::Error;

/// The main error type returned by the lookup pipeline
#[derive(Debug, Error)]
pub enum LookupError {
    /// Lookup configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request carries unusable input
    #[error(transparent)]
    Input(#[from] InputError),

    /// The record source failed to count or fetch
    #[error("Record source failed: {0}")]
    Source(#[source] anyhow::Error),

    /// No lookup is registered under this name
    #[error("Unknown lookup: {name}")]
    UnknownLookup { name: String },
}

impl LookupError {
    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LookupError::Config(e) => e.error_code(),
            LookupError::Input(e) => e.error_code(),
            LookupError::Source(_) => "SOURCE_ERROR",
            LookupError::UnknownLookup { .. } => "UNKNOWN_LOOKUP",
        }
    }

    /// Whether the failure originates from the request rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LookupError::Input(_) | LookupError::UnknownLookup { .. }
        )
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors caused by how a lookup or its record type is set up
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The record type has no identifier field
    #[error("'{record_type}' type does not have field named '{field}', required for id filtering and rendering")]
    MissingIdField { record_type: String, field: String },

    /// The identifier field is neither textual nor numeric
    #[error("'{record_type}.{field}' field type has to be text or a number, found {kind}")]
    UnsupportedIdType {
        record_type: String,
        field: String,
        kind: FieldKind,
    },

    /// The effective sort column does not exist on the record type
    #[error("'{record_type}' type does not have field named '{column}' to sort by")]
    UnknownSortColumn { record_type: String, column: String },

    /// A declared field does not exist on the record type
    #[error("'{record_type}' type does not have field named '{field}'")]
    UnknownField { record_type: String, field: String },

    /// Two columns resolved to the same key
    #[error("Duplicate lookup column key '{key}'")]
    DuplicateColumn { key: String },

    /// A column format template could not be parsed
    #[error("Invalid format '{template}' for column '{column}': {message}")]
    InvalidFormat {
        column: String,
        template: String,
        message: String,
    },

    /// Failed to parse a configuration file
    #[error("Failed to parse lookup config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" '{}'", f))
        .unwrap_or_default()
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::MissingIdField { .. } => "MISSING_ID_FIELD",
            ConfigError::UnsupportedIdType { .. } => "UNSUPPORTED_ID_TYPE",
            ConfigError::UnknownSortColumn { .. } => "UNKNOWN_SORT_COLUMN",
            ConfigError::UnknownField { .. } => "UNKNOWN_FIELD",
            ConfigError::DuplicateColumn { .. } => "DUPLICATE_COLUMN",
            ConfigError::InvalidFormat { .. } => "INVALID_FORMAT",
            ConfigError::ParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND",
        }
    }
}

// =============================================================================
// Input Errors
// =============================================================================

/// Errors caused by the client request
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    /// A non-numeric id was supplied for a numeric identifier field
    #[error("'{value}' is not a valid id for '{record_type}', a number is expected")]
    NonNumericId { record_type: String, value: String },

    /// An additional filter value cannot be converted to the field's type
    #[error("Filter value '{value}' for '{field}' is not a valid {expected}")]
    InvalidFilterValue {
        field: String,
        value: String,
        expected: FieldKind,
    },

    /// The request filters on a field the lookup does not declare
    #[error("Filtering by '{field}' is not allowed for this lookup")]
    UndeclaredFilter { field: String },
}

impl InputError {
    pub fn error_code(&self) -> &'static str {
        match self {
            InputError::NonNumericId { .. } => "NON_NUMERIC_ID",
            InputError::InvalidFilterValue { .. } => "INVALID_FILTER_VALUE",
            InputError::UndeclaredFilter { .. } => "UNDECLARED_FILTER",
        }
    }
}
