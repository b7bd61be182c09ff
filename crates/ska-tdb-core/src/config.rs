//! Registry configuration: where the data lives and which version to start on.

use std::path::PathBuf;

use crate::error::TdbResult;
use crate::version::TdbVersion;

/// Environment variable naming the root data directory.
pub const DATA_ROOT_ENV: &str = "SKA_TDB_DATA";

/// Environment variable selecting the initial database version.
pub const VERSION_ENV: &str = "SKA_TDB_VERSION";

/// Data root used when [`DATA_ROOT_ENV`] is unset.
pub const DEFAULT_DATA_ROOT: &str = "data";

/// Settings used to open a [`crate::Tdb`] registry.
///
/// The data root holds one `pNNN` subdirectory per supported version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TdbConfig {
    /// Root directory holding the per-version data directories.
    pub data_root: PathBuf,
    /// Version active right after the registry is opened.
    pub version: TdbVersion,
}

impl TdbConfig {
    /// Configuration for `data_root` at the default version.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        TdbConfig {
            data_root: data_root.into(),
            version: TdbVersion::DEFAULT,
        }
    }

    /// Replace the initial version.
    pub fn with_version(mut self, version: TdbVersion) -> Self {
        self.version = version;
        self
    }

    /// Build a configuration from [`DATA_ROOT_ENV`] and [`VERSION_ENV`].
    ///
    /// Unset variables fall back to [`DEFAULT_DATA_ROOT`] and
    /// [`TdbVersion::DEFAULT`]. An unparsable or unsupported version is an
    /// error rather than a silent fallback.
    pub fn from_env() -> TdbResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> TdbResult<Self> {
        let data_root = lookup(DATA_ROOT_ENV)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_ROOT));

        let version = match lookup(VERSION_ENV).filter(|s| !s.trim().is_empty()) {
            Some(raw) => raw.parse()?,
            None => TdbVersion::DEFAULT,
        };

        Ok(TdbConfig { data_root, version })
    }
}

impl Default for TdbConfig {
    fn default() -> Self {
        TdbConfig::new(DEFAULT_DATA_ROOT)
    }
}
