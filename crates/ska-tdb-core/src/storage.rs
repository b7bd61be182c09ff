//! Local filesystem access for TDB data directories.
//!
//! Every table of a database version lives as one flat file inside the
//! version directory. This module owns the two filesystem operations the
//! rest of the crate needs:
//!
//! - reading a whole table file into memory ([`read_all_bytes`]);
//! - enumerating the table files present in a directory
//!   ([`list_files_with_extension`]).
//!
//! Filesystem failures are classified into [`StorageError::NotFound`] and
//! [`StorageError::OtherIo`] so callers can turn a missing file into a
//! domain-level "unknown table" without string matching on I/O errors.

use std::{
    error::Error,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use bytes::Bytes;
use snafu::{Backtrace, IntoError, prelude::*};

/// General result type used by storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors produced by the storage backend implementation.
///
/// Only the local filesystem is supported; the wrapper keeps backend
/// details out of the [`StorageError`] variants.
#[derive(Debug)]
pub enum BackendError {
    /// A local filesystem I/O error.
    Local(io::Error),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Local(e) => write!(f, "local I/O error: {e}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BackendError::Local(e) => Some(e),
        }
    }
}

/// Errors that can occur during storage operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StorageError {
    /// The specified path was not found (or is not a regular file).
    #[snafu(display("Path not found: {path}"))]
    NotFound {
        /// The path that was not found.
        path: String,
        /// Underlying backend error that caused the failure.
        source: BackendError,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },

    /// An I/O error occurred on the local filesystem.
    #[snafu(display("Local I/O error at {path}: {source}"))]
    OtherIo {
        /// The path where the I/O error occurred.
        path: String,
        /// Underlying backend I/O error with platform-specific details.
        source: BackendError,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },
}

impl StorageError {
    /// True when the error means the requested path does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

fn classify(path: &Path, e: io::Error) -> StorageError {
    let path = path.display().to_string();
    if e.kind() == io::ErrorKind::NotFound {
        NotFoundSnafu { path }.into_error(BackendError::Local(e))
    } else {
        OtherIoSnafu { path }.into_error(BackendError::Local(e))
    }
}

/// Read the file at `path` fully into memory.
///
/// Semantics:
/// - missing path: [`StorageError::NotFound`];
/// - path exists but is not a regular file: also `NotFound`;
/// - any other I/O problem: [`StorageError::OtherIo`].
pub fn read_all_bytes(path: &Path) -> StorageResult<Bytes> {
    let meta = fs::metadata(path).map_err(|e| classify(path, e))?;

    if !meta.is_file() {
        let synthetic = io::Error::other("not a regular file");
        return Err(NotFoundSnafu {
            path: path.display().to_string(),
        }
        .into_error(BackendError::Local(synthetic)));
    }

    let data = fs::read(path).map_err(|e| classify(path, e))?;
    Ok(Bytes::from(data))
}

/// List the base names (file stem, no extension) of all regular files in
/// `dir` whose extension is exactly `extension`.
///
/// Symlinks are followed, matching [`read_all_bytes`]. A missing `dir`
/// lists as empty. Names are returned sorted so listings are stable
/// across platforms.
pub fn list_files_with_extension(dir: &Path, extension: &str) -> StorageResult<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(classify(dir, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| classify(dir, e))?;
        let path: PathBuf = entry.path();

        if path.extension().and_then(|ext| ext.to_str()) != Some(extension) {
            continue;
        }
        // Dangling links are skipped like any other non-file entry.
        let is_file = match fs::metadata(&path) {
            Ok(meta) => meta.is_file(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(classify(&path, e)),
        };
        if !is_file {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }

    names.sort();
    Ok(names)
}
