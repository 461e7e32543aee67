//! Embedded tabular data engine.
//!
//! - **field**: column metadata and coercion of raw cell text
//! - **grid**: the checksum-versioned table and its structural operations
//! - **inference**: column-type classification used by `Grid::analyse`
//! - **datetime** / **format**: pattern tables and display formatting
//! - **schema**: deterministic merge of incoming keys into a field list

#![deny(unsafe_code)]

pub mod checksum;
pub mod datetime;
pub mod error;
pub mod field;
pub mod format;
pub mod grid;
pub mod inference;
pub mod schema;
pub mod setting;
pub mod value;

pub use checksum::{Checksum, ChecksumBuilder};
pub use error::{EngineIssue, GridError, Result};
pub use field::{Field, FieldType, Formatter};
pub use format::NumberFormat;
pub use grid::{CellValue, ChecksumMode, ColumnRef, Grid, Row, text_row};
pub use inference::ColumnProfile;
pub use schema::{SchemaMerge, merge_schema};
pub use setting::Setting;
pub use value::{Value, format_numeric, parse_f64};
