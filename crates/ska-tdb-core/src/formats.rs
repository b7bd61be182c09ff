//! Format-specific helpers.
//!
//! This module is the home for decoding helpers tied to the on-disk table
//! format. TDB tables are stored as Parquet files, one per table.

pub mod parquet;
