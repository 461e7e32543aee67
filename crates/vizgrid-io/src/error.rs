//! Error types for grid codecs.

use std::string::FromUtf8Error;

use polars::error::PolarsError;
use thiserror::Error;
use vizgrid_model::GridError;

#[derive(Debug, Error)]
pub enum CodecError {
    // === Shape errors ===
    /// JSON input was not an array of row objects.
    #[error("expected a JSON array of row objects")]
    NotAnArray,

    /// An array element was not an object.
    #[error("row {index} is not a JSON object")]
    NotAnObject { index: usize },

    /// Format could not be determined from a name or extension.
    #[error("unknown data format '{0}' (expected json, csv or tsv)")]
    UnknownFormat(String),

    // === Wrapped errors ===
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoded text is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
