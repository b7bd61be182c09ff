//! Supported database versions and their on-disk directory names.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use snafu::prelude::*;

use crate::error::{InvalidVersionSnafu, ParseVersionSnafu, TdbError, TdbResult};

/// Database versions with a data directory shipped for them.
pub const SUPPORTED_VERSIONS: [u32; 6] = [4, 6, 7, 8, 9, 10];

/// A validated TDB version number.
///
/// Construction goes through [`TdbVersion::new`] (or `TryFrom`/`FromStr`), so a
/// value of this type is always one of [`SUPPORTED_VERSIONS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TdbVersion(u32);

impl TdbVersion {
    /// Version selected when nothing else is configured.
    pub const DEFAULT: TdbVersion = TdbVersion(10);

    /// Validate `version` against [`SUPPORTED_VERSIONS`].
    pub fn new(version: u32) -> TdbResult<Self> {
        ensure!(
            SUPPORTED_VERSIONS.contains(&version),
            InvalidVersionSnafu { version }
        );
        Ok(TdbVersion(version))
    }

    /// Raw version number.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Every supported version, oldest first.
    pub fn all() -> impl Iterator<Item = TdbVersion> {
        SUPPORTED_VERSIONS.into_iter().map(TdbVersion)
    }

    /// Directory name for this version, e.g. `p010`.
    pub fn dir_name(self) -> String {
        format!("p{:03}", self.0)
    }

    /// Data directory for this version under `data_root`.
    pub fn data_dir(self, data_root: &Path) -> PathBuf {
        data_root.join(self.dir_name())
    }
}

impl Default for TdbVersion {
    fn default() -> Self {
        TdbVersion::DEFAULT
    }
}

impl fmt::Display for TdbVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for TdbVersion {
    type Error = TdbError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        TdbVersion::new(value)
    }
}

impl From<TdbVersion> for u32 {
    fn from(v: TdbVersion) -> Self {
        v.0
    }
}

impl FromStr for TdbVersion {
    type Err = TdbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let raw: u32 = trimmed.parse().context(ParseVersionSnafu { input: trimmed })?;
        TdbVersion::new(raw)
    }
}
