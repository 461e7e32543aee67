//! Error types for the grid model.
//!
//! Two families live here. [`GridError`] covers precondition violations that
//! would corrupt column alignment; those are returned to the caller.
//! [`EngineIssue`] covers problems the engine recovers from locally: they are
//! logged through `tracing` and replaced with a default (null, a dropped
//! column reference, or a fallback computation).

use thiserror::Error;
use tracing::warn;

/// Shape errors escalated to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A row carries more cells than the grid has fields.
    #[error("row {row} has {actual} cells but the grid has {expected} fields")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A row index past the end of the data (appending at `len` is allowed).
    #[error("row {row} is out of range (grid has {len} rows including the header)")]
    RowOutOfRange { row: usize, len: usize },

    /// A column index past the end of the field list.
    #[error("column {column} is out of range (grid has {width} fields)")]
    ColumnOutOfRange { column: usize, width: usize },
}

/// Recoverable problems, reported through [`EngineIssue::report`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineIssue {
    /// Raw text could not be coerced to the field's declared type.
    #[error("cannot parse '{raw}' as {field_type} for field '{label}': {reason}")]
    ParseFailure {
        label: String,
        field_type: String,
        raw: String,
        reason: String,
    },

    /// A label used for grouping or aggregation does not exist in the grid.
    #[error("column '{label}' does not exist")]
    UnresolvedColumnReference { label: String },

    /// An aggregate function was used in a mode where it has no meaning.
    #[error("function {func} is not valid in {mode} mode")]
    InvalidAggregateFunction { func: String, mode: String },

    /// A mapping spec with an unusable parameter list.
    #[error("mapping spec '{spec}' is invalid: {reason}")]
    InvalidMappingSpec { spec: String, reason: String },
}

impl EngineIssue {
    /// Log the issue. Recovery is up to the caller.
    pub fn report(&self) {
        match self {
            Self::ParseFailure { .. } => warn!(kind = "parse_failure", "{self}"),
            Self::UnresolvedColumnReference { .. } => {
                warn!(kind = "unresolved_column_reference", "{self}");
            }
            Self::InvalidAggregateFunction { .. } => {
                warn!(kind = "invalid_aggregate_function", "{self}");
            }
            Self::InvalidMappingSpec { .. } => warn!(kind = "invalid_mapping_spec", "{self}"),
        }
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
