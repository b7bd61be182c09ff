//! Error types and SNAFU context selectors for TDB access.
//!
//! `TdbError` is the single public error type of the crate. Context selectors
//! are exposed crate-wide via `#[snafu(visibility(pub(crate)))]` so sibling
//! modules can attach context without re-exporting them.

use std::num::ParseIntError;

use arrow::{datatypes::DataType, error::ArrowError};
use parquet::errors::ParquetError;
use snafu::{Backtrace, prelude::*};

use crate::storage::StorageError;
use crate::version::SUPPORTED_VERSIONS;

/// Result alias used throughout the crate.
pub type TdbResult<T> = Result<T, TdbError>;

/// Errors from TDB registry, table and MSID operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TdbError {
    /// Requested database version is not one of the supported versions.
    #[snafu(display("TDB version must be one of {SUPPORTED_VERSIONS:?}, got {version}"))]
    InvalidVersion {
        /// The rejected version number.
        version: u32,
    },

    /// A version string could not be parsed as an integer.
    #[snafu(display("Invalid TDB version '{input}': {source}"))]
    ParseVersion {
        /// The raw input.
        input: String,
        /// Underlying integer parse error.
        source: ParseIntError,
    },

    /// No backing file exists for the requested table.
    #[snafu(display("Table {table} not in TDB files (looked for {path})"))]
    UnknownTable {
        /// Requested table name.
        table: String,
        /// Path that was probed.
        path: String,
    },

    /// The requested MSID is not present in the description table.
    #[snafu(display("No MSID {msid} in TDB"))]
    UnknownMsid {
        /// Normalized (upper-case) MSID.
        msid: String,
    },

    /// A column lookup did not match any column of the table.
    #[snafu(display("Table {table} has no column {column}"))]
    UnknownColumn {
        /// Table name.
        table: String,
        /// Requested column (as given).
        column: String,
    },

    /// A positional row index was past the end of the view.
    #[snafu(display("Row {index} out of range for table {table} with {len} rows"))]
    RowOutOfRange {
        /// Table name.
        table: String,
        /// Requested index.
        index: usize,
        /// Number of rows held by the view.
        len: usize,
    },

    /// Attribute name not known to the MSID accessor map.
    #[snafu(display("MsidView has no attribute {name}"))]
    UnknownAttribute {
        /// Requested attribute name.
        name: String,
    },

    /// `find` pattern is not a valid regular expression.
    #[snafu(display("Invalid MSID search pattern {pattern:?}: {source}"))]
    InvalidPattern {
        /// The pattern as given.
        pattern: String,
        /// Regex compile error.
        source: regex::Error,
    },

    /// Filesystem error other than a missing table file.
    #[snafu(display("Storage error: {source}"))]
    Storage {
        /// Underlying storage error.
        #[snafu(source, backtrace)]
        source: StorageError,
    },

    /// A table file exists but could not be decoded.
    #[snafu(display("Failed to read table {table} from {path}: {source}"))]
    ParquetRead {
        /// Table name.
        table: String,
        /// File path.
        path: String,
        /// Underlying Parquet error.
        source: ParquetError,
        /// Backtrace captured at the failure point.
        backtrace: Backtrace,
    },

    /// An Arrow compute or batch construction step failed.
    #[snafu(display("Arrow error on table {table}: {source}"))]
    Arrow {
        /// Table name.
        table: String,
        /// Underlying Arrow error.
        source: ArrowError,
    },

    /// A column holds a type that has no scalar mapping.
    #[snafu(display("Column {column} has unsupported type {data_type}"))]
    UnsupportedColumnType {
        /// Column name.
        column: String,
        /// Arrow data type of the column.
        data_type: DataType,
    },
}
