//! The version registry: which database version is active, and the table
//! store and MSID root that belong to it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use log::info;

use crate::config::TdbConfig;
use crate::error::TdbResult;
use crate::msid::MsidView;
use crate::table::{TableStore, TableView};
use crate::version::TdbVersion;

#[derive(Debug)]
struct ActiveVersion {
    version: TdbVersion,
    tables: Arc<TableStore>,
    msids: MsidView,
}

impl ActiveVersion {
    fn new(data_root: &Path, version: TdbVersion) -> Self {
        let tables = Arc::new(TableStore::new(version.data_dir(data_root)));
        let msids = MsidView::root(tables.clone());
        ActiveVersion {
            version,
            tables,
            msids,
        }
    }
}

/// Entry point to a TDB installation.
///
/// Holds the active version together with its [`TableStore`] and root
/// [`MsidView`]. Switching versions swaps all three in one step; handles
/// obtained before the switch keep answering from the old version.
#[derive(Debug)]
pub struct Tdb {
    data_root: PathBuf,
    active: RwLock<ActiveVersion>,
}

impl Tdb {
    /// Registry for `config`. No files are touched until a table is needed.
    pub fn open(config: TdbConfig) -> Self {
        let active = ActiveVersion::new(&config.data_root, config.version);
        Tdb {
            data_root: config.data_root,
            active: RwLock::new(active),
        }
    }

    /// Registry over `data_root` at the default version.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Tdb::open(TdbConfig::new(data_root))
    }

    fn read(&self) -> RwLockReadGuard<'_, ActiveVersion> {
        self.active.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Root directory holding the per-version directories.
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Switch to version `version`.
    ///
    /// # Errors
    ///
    /// [`crate::TdbError::InvalidVersion`] when `version` is unsupported; the
    /// active version is left unchanged.
    pub fn set_version(&self, version: u32) -> TdbResult<()> {
        let version = TdbVersion::new(version)?;
        self.switch_to(version);
        Ok(())
    }

    /// Switch to an already validated version. Always discards the caches,
    /// even when `version` is the active one.
    pub fn switch_to(&self, version: TdbVersion) {
        let fresh = ActiveVersion::new(&self.data_root, version);
        let previous = {
            let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *active, fresh).version
        };
        info!(
            "TDB version switched from {previous} to {version} ({})",
            version.data_dir(&self.data_root).display()
        );
    }

    /// The active version.
    pub fn version(&self) -> TdbVersion {
        self.read().version
    }

    /// Data directory of the active version.
    pub fn data_dir(&self) -> PathBuf {
        self.read().tables.data_dir().to_path_buf()
    }

    /// Table store of the active version.
    pub fn tables(&self) -> Arc<TableStore> {
        self.read().tables.clone()
    }

    /// Root (unbound) MSID view of the active version.
    pub fn msids(&self) -> MsidView {
        self.read().msids.clone()
    }

    /// Table `name` of the active version.
    pub fn table(&self, name: &str) -> TdbResult<TableView> {
        self.tables().get(name)
    }

    /// Names of the tables present for the active version.
    pub fn table_names(&self) -> TdbResult<Vec<String>> {
        self.tables().names()
    }

    /// Bound view for MSID `key` in the active version.
    pub fn msid(&self, key: &str) -> TdbResult<MsidView> {
        self.msids().lookup(key)
    }

    /// Search the active version's MSIDs (see [`MsidView::find`]).
    pub fn find(&self, pattern: &str) -> TdbResult<Vec<MsidView>> {
        self.msids().find(pattern)
    }
}
