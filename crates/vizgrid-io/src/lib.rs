//! Grid codecs.
//!
//! - **json**: array of row objects keyed by field label
//! - **delimited**: CSV / TSV with a header record
//! - **frame**: polars `DataFrame` interop
//! - **format**: pick a codec from a name or file extension
//!
//! Every text decoder merges into the grid's schema the same way: known
//! labels reuse their column, unseen labels append trailing columns.

#![deny(unsafe_code)]

pub mod delimited;
pub mod error;
pub mod format;
pub mod frame;
pub mod json;
pub mod records;

pub use delimited::{
    DelimitedOptions, from_csv_str, from_delimited_str, from_tsv_str, merge_delimited,
    to_csv_string, to_delimited_string, to_tsv_string,
};
pub use error::{CodecError, Result};
pub use format::{DataFormat, read_path};
pub use frame::{any_to_cell, field_type_for, frame_to_grid, grid_to_frame};
pub use json::{
    RowObject, from_json_rows, from_json_str, merge_json_rows, row_objects, to_json_rows,
    to_json_string, to_json_string_pretty,
};
pub use records::{merge_records, merge_table};
