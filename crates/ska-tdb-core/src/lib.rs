//! Read-only access to the versioned telemetry reference database (TDB).
//!
//! The TDB is a fixed set of tables describing measurement identifiers
//! (MSIDs): calibration, units, state codes and descriptive metadata. Each
//! supported database version lives in its own directory (`p010`, ...) with
//! one Parquet file per table.
//!
//! - [`Tdb`] is the version registry and the entry point.
//! - [`TableStore`] loads tables lazily and caches them per version
//!   (`table` module).
//! - [`TableView`] answers column lookups and MSID filters on one table.
//! - [`MsidView`] navigates from an MSID to its rows in every MSID-bearing
//!   table and to its `tmsrment` description columns (`msid` module).
//!
//! ```no_run
//! use ska_tdb_core::{Tdb, TdbConfig};
//!
//! # fn main() -> ska_tdb_core::TdbResult<()> {
//! let tdb = Tdb::open(TdbConfig::new("/proj/sot/ska/data/tdb"));
//! for msid in tdb.find("tephin")? {
//!     println!("{msid}");
//! }
//! tdb.set_version(8)?;
//! let point_pairs = tdb.table("tpp")?.filter_msid("tephin")?;
//! # let _ = point_pairs;
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs)]
pub mod config;
pub mod error;
pub mod formats;
pub mod msid;
pub mod registry;
pub mod storage;
pub mod table;
pub mod version;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::TdbConfig;
pub use error::{TdbError, TdbResult};
pub use msid::{Attribute, MsidTable, MsidView, TmsrmentColumn};
pub use registry::Tdb;
pub use table::{ColumnValue, Lookup, Rows, Scalar, TableStore, TableView};
pub use version::{SUPPORTED_VERSIONS, TdbVersion};
