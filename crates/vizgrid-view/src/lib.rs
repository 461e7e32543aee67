//! Read-only projections over a shared [`Grid`](vizgrid_model::Grid).
//!
//! Every view holds the grid through [`SharedGrid`] and memoizes its
//! projection by the grid checksum: a read recomputes only when the checksum
//! differs from the one the cached value was built from.

#![deny(unsafe_code)]

pub mod aggregate;
pub mod cache;
pub mod legacy;
pub mod nest;

pub use aggregate::{AggregateFn, AggregateRow, AggregateSpec, AggregateView, numeric_values};
pub use cache::{ChecksumCache, DerivedView, SharedGrid, share};
pub use legacy::{FormattedTable, LegacyView, ParsedTable};
pub use nest::{
    NestEntry, NestMap, NestNode, NestView, NestedRow, RollupFn, RollupRow, RollupView,
    group_by_keys, group_rows, nest,
};
