//! Error types for jobly-sql

use thiserror::Error;

/// Result type alias for clause building
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while turning client fields into SQL clauses.
///
/// Every variant is a caller contract violation: the request carried data
/// the builders cannot express, so they all map to a bad request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SqlError {
    /// Partial update called without any fields
    #[error("No data")]
    NoData,

    /// Filter key outside the resource's vocabulary
    #[error("Unrecognized {resource} filter: '{key}'")]
    UnrecognizedFilterKey { resource: &'static str, key: String },

    /// Filter set with no keys while `EmptyFilterPolicy::Reject` is active
    #[error("Empty {resource} filter set")]
    EmptyFilterSet { resource: &'static str },

    /// Filter value that cannot be coerced to the shape its key needs
    #[error("Invalid value for filter '{key}': expected {expected}")]
    InvalidFilterValue { key: &'static str, expected: &'static str },

    /// Lower bound greater than upper bound
    #[error("Invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: i64, max: i64 },

    /// Field the statement may not write (primary keys, unknown fields)
    #[error("Field '{field}' of {resource} cannot be set")]
    NotUpdatable { resource: &'static str, field: String },

    /// Non-scalar value (JSON array or object)
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),
}

impl SqlError {
    /// Create an unrecognized filter key error
    pub fn unrecognized(resource: &'static str, key: impl Into<String>) -> Self {
        Self::UnrecognizedFilterKey {
            resource,
            key: key.into(),
        }
    }

    /// Create an invalid filter value error
    pub fn invalid_value(key: &'static str, expected: &'static str) -> Self {
        Self::InvalidFilterValue { key, expected }
    }

    /// Create a not-updatable error
    pub fn not_updatable(resource: &'static str, field: impl Into<String>) -> Self {
        Self::NotUpdatable {
            resource,
            field: field.into(),
        }
    }

    /// Whether the caller should answer with a 400-class response.
    pub fn is_bad_request(&self) -> bool {
        match self {
            Self::NoData
            | Self::UnrecognizedFilterKey { .. }
            | Self::EmptyFilterSet { .. }
            | Self::InvalidFilterValue { .. }
            | Self::InvalidRange { .. }
            | Self::NotUpdatable { .. }
            | Self::UnsupportedValue(_) => true,
        }
    }

    /// Check if this is a no data error
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    /// Check if this is an unrecognized filter key error
    pub fn is_unrecognized_key(&self) -> bool {
        matches!(self, Self::UnrecognizedFilterKey { .. })
    }
}
