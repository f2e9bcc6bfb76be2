//! File reading with memory mapping for large knowledge files.

// Memory mapping requires unsafe; access is read-only.
#![allow(unsafe_code)]

use crate::error::{IoError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Files at or above this size are memory-mapped (1MB).
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Refuse to load files larger than this (256MB). Knowledge sources are
/// documents, not datasets.
const MAX_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Reads a file either directly or through a memory map, depending on
/// its size.
pub struct FileReader {
    file: File,
    size: u64,
    path: String,
}

impl FileReader {
    /// Opens a file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be opened,
    /// or exceeds the size limit.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let path = path_ref.display().to_string();

        if !path_ref.exists() {
            return Err(IoError::FileNotFound { path }.into());
        }

        let file = File::open(path_ref).map_err(|e| IoError::ReadFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let size = file
            .metadata()
            .map_err(|e| IoError::ReadFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?
            .len();

        if size > MAX_FILE_SIZE {
            return Err(IoError::ReadFailed {
                path,
                reason: format!("file too large: {size} bytes (max: {MAX_FILE_SIZE} bytes)"),
            }
            .into());
        }

        Ok(Self { file, size, path })
    }

    /// The file size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Reads the whole file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the content is not UTF-8.
    pub fn read_to_string(&self) -> Result<String> {
        let bytes = if self.size >= MMAP_THRESHOLD {
            self.read_mmap()?
        } else {
            self.read_direct()?
        };
        String::from_utf8(bytes).map_err(|e| {
            IoError::ReadFailed {
                path: self.path.clone(),
                reason: format!("invalid UTF-8: {e}"),
            }
            .into()
        })
    }

    fn read_mmap(&self) -> Result<Vec<u8>> {
        // Safety: read-only mapping of a file we hold open.
        let mmap = unsafe {
            Mmap::map(&self.file).map_err(|e| IoError::MmapFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?
        };
        Ok(mmap.to_vec())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn read_direct(&self) -> Result<Vec<u8>> {
        let mut file = &self.file;
        let mut buffer = Vec::with_capacity(self.size as usize);
        file.read_to_end(&mut buffer)
            .map_err(|e| IoError::ReadFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        Ok(buffer)
    }
}
