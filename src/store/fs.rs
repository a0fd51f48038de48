//! JSON file I/O with atomic writes.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors during file system operations on the data directory.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Creates an appropriate StoreError from an io::Error.
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound { path: path.into() },
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied { path: path.into() },
            _ => StoreError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Reads and deserializes a JSON file.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if the file doesn't exist.
/// Returns `StoreError::Parse` if the content is not valid JSON for `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let bytes = std::fs::read(path).map_err(|e| StoreError::from_io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Parse {
        path: path.into(),
        source: e,
    })
}

/// Serializes a value as pretty-printed JSON and writes it atomically.
///
/// Uses a temporary file in the target's directory and an atomic rename so
/// a crash mid-write never leaves a truncated file behind. Creates the
/// parent directory if missing.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let parent = path.parent().ok_or_else(|| StoreError::Io {
        path: path.into(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory"),
    })?;

    std::fs::create_dir_all(parent).map_err(|e| StoreError::from_io(parent, e))?;

    let content = serde_json::to_vec_pretty(value).map_err(|e| StoreError::Serialize {
        path: path.into(),
        source: e,
    })?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| StoreError::Io {
        path: path.into(),
        source: e,
    })?;

    temp.write_all(&content).map_err(|e| StoreError::Io {
        path: path.into(),
        source: e,
    })?;

    temp.persist(path).map_err(|e| StoreError::AtomicWrite {
        path: path.into(),
        source: e.error,
    })?;

    Ok(())
}
