//! Durable selection store: one JSON snapshot, replaced in full per scan.
//!
//! Writes are atomic: serialize to `<path>.tmp`, then rename into place, so a
//! reader never sees a half-written selection.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use confluence_core::domain::{Selection, SelectionError};
use confluence_core::TOP_K;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("selection JSON at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored selection failed integrity check: {0}")]
    Integrity(#[from] SelectionError),
}

/// Single-writer, single-reader snapshot of the latest selection.
///
/// `write_selection` replaces whatever was stored; there is no history.
pub trait SelectionStore: Send + Sync {
    fn write_selection(&self, selection: &Selection) -> Result<(), StoreError>;

    /// `Ok(None)` when no scan has written a selection yet.
    fn read_selection(&self) -> Result<Option<Selection>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SelectionStore for JsonFileStore {
    fn write_selection(&self, selection: &Selection) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(selection).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            self.io_err(e)
        })?;

        debug!(path = %self.path.display(), candidates = selection.len(), "selection written");
        Ok(())
    }

    fn read_selection(&self) -> Result<Option<Selection>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        let selection: Selection =
            serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        selection.validate(TOP_K)?;
        Ok(Some(selection))
    }
}
