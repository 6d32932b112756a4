//! Shared utilities for fedprep crates.
//!
//! This crate provides the Polars helpers every owner-local computation relies
//! on: reading a column as optional `f64` values, rebuilding float columns and
//! listing a frame's column names.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use polars::{
    any_to_f64, column_names, f64_column, is_numeric_dtype, numeric_column_f64, parse_f64,
};
