//! Lazily loaded, cached TDB tables.
//!
//! A [`TableStore`] is bound to one version's data directory. Tables are read
//! from `<data_dir>/<name>.parquet` on first use and cached for the lifetime
//! of the store; a version switch replaces the whole store rather than
//! invalidating entries.

pub mod value;
pub mod view;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;
use snafu::prelude::*;

use crate::error::{StorageSnafu, TdbResult, UnknownTableSnafu};
use crate::formats::parquet::{TABLE_FILE_EXTENSION, read_table_bytes};
use crate::storage;

pub use value::{ColumnValue, Scalar};
pub use view::{Lookup, MSID_COLUMN, Rows, TableView};

/// Cache of the tables of one database version.
///
/// Entries are written once per name and never evicted. Failed loads are not
/// cached, so a later request retries the file.
#[derive(Debug)]
pub struct TableStore {
    data_dir: PathBuf,
    cache: Mutex<HashMap<String, TableView>>,
}

impl TableStore {
    /// Store reading tables from `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        TableStore {
            data_dir: data_dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Directory the tables are read from.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing table `name`.
    pub fn table_path(&self, name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{name}.{TABLE_FILE_EXTENSION}"))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, TableView>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True once table `name` has been loaded into the cache.
    pub fn is_cached(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// The whole table `name`, loading it on first use.
    ///
    /// Table names are case-sensitive (lower-case by convention).
    ///
    /// # Errors
    ///
    /// - [`crate::TdbError::UnknownTable`] when no file backs the name;
    /// - [`crate::TdbError::ParquetRead`] / [`crate::TdbError::Arrow`] when
    ///   the file cannot be decoded;
    /// - [`crate::TdbError::Storage`] for other filesystem failures.
    pub fn get(&self, name: &str) -> TdbResult<TableView> {
        if let Some(view) = self.lock().get(name) {
            return Ok(view.clone());
        }

        let path = self.table_path(name);
        ensure!(
            is_plain_name(name),
            UnknownTableSnafu {
                table: name,
                path: path.display().to_string(),
            }
        );

        let data = match storage::read_all_bytes(&path) {
            Ok(data) => data,
            Err(e) if e.is_not_found() => {
                return UnknownTableSnafu {
                    table: name,
                    path: path.display().to_string(),
                }
                .fail();
            }
            Err(e) => return Err(e).context(StorageSnafu),
        };

        let batch = read_table_bytes(name, &path, data)?;
        debug!(
            "loaded TDB table {name}: {} rows, {} columns from {}",
            batch.num_rows(),
            batch.num_columns(),
            path.display()
        );

        let view = TableView::new(name, batch);
        Ok(self.lock().entry(name.to_string()).or_insert(view).clone())
    }

    /// Names of all tables present in the data directory, sorted.
    ///
    /// Always reflects the filesystem; the cache is neither read nor filled.
    /// A data directory that does not exist holds no tables.
    pub fn names(&self) -> TdbResult<Vec<String>> {
        storage::list_files_with_extension(&self.data_dir, TABLE_FILE_EXTENSION)
            .context(StorageSnafu)
    }
}

/// Table names are bare file stems; anything that could walk out of the
/// data directory is treated as unknown.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
