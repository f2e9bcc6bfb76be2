//! JSON-file store backend.

use crate::error::{Result, StoreError};
use crate::store::RecordStore;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each record as `<dir>/<record>.json`, pretty-printed.
///
/// The directory is created lazily on first write, so constructing a
/// store never touches the filesystem.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Creates a store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this store reads from and writes to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, record: &str) -> PathBuf {
        self.dir.join(format!("{record}.json"))
    }
}

impl RecordStore for JsonStore {
    fn get(&self, record: &str) -> Result<Vec<serde_json::Value>> {
        let path = self.record_path(record);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| StoreError::ReadFailed {
            record: record.to_string(),
            reason: e.to_string(),
        })?;
        let values = serde_json::from_str(&content).map_err(|e| StoreError::ReadFailed {
            record: record.to_string(),
            reason: e.to_string(),
        })?;
        Ok(values)
    }

    fn save(&self, record: &str, values: &[serde_json::Value]) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| StoreError::WriteFailed {
                record: record.to_string(),
                reason: e.to_string(),
            })?;
        }
        let content =
            serde_json::to_string_pretty(values).map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(self.record_path(record), content).map_err(|e| StoreError::WriteFailed {
            record: record.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
