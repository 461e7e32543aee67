//! Aggregation pipeline over a grid.
//!
//! - **mapping**: output-column specs (`Label`, `SUM(A)`, `AVE(A,B)`, ...)
//! - **options**: mode selection and missing-data placeholder
//! - **pipeline**: [`hipie_mappings`], the grouped / row-wise evaluator

#![deny(unsafe_code)]

pub mod mapping;
pub mod options;
pub mod pipeline;

pub use mapping::{MappingFn, MappingSpec, MappingSpecError};
pub use options::{MappingMode, MappingOptions};
pub use pipeline::hipie_mappings;
