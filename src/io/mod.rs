//! File reading and writing for knowledge sources and rendered prompts.

mod reader;

pub use reader::FileReader;

use crate::core::Document;
use crate::error::{IoError, Result};
use std::fs;
use std::path::Path;

/// Reads a UTF-8 text file, memory-mapping it when large.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or not UTF-8.
pub fn read_file(path: &Path) -> Result<String> {
    FileReader::open(path)?.read_to_string()
}

/// Loads a file as a knowledge document named after the file.
///
/// JSON files are validated before being accepted, matching how
/// uploaded sources are checked before entering the knowledge base.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains invalid JSON
/// when a JSON document was expected.
pub fn load_document(path: &Path) -> Result<Document> {
    let content = read_file(path)?;
    let doc = Document::from_file_content(path, content);
    if doc.kind == crate::core::SourceKind::Json {
        serde_json::from_str::<serde_json::Value>(&doc.content).map_err(|e| {
            IoError::ReadFailed {
                path: path.display().to_string(),
                reason: format!("invalid JSON: {e}"),
            }
        })?;
    }
    Ok(doc)
}

/// Writes text to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if directory creation or the write fails.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| IoError::DirectoryFailed {
            path: parent.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    fs::write(path, content).map_err(|e| {
        IoError::WriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Writes chunks as numbered text files under `out_dir`.
///
/// Files are named `{prefix}_{index:04}.txt`; the directory is created on
/// the first write. Returns the written paths in chunk order.
///
/// # Errors
///
/// Returns an error if directory creation or a write fails.
pub fn write_chunks(out_dir: &Path, chunks: &[String], prefix: &str) -> Result<Vec<String>> {
    let mut paths = Vec::with_capacity(chunks.len());
    for (index, content) in chunks.iter().enumerate() {
        let path = out_dir.join(format!("{prefix}_{index:04}.txt"));
        write_file(&path, content)?;
        paths.push(path.display().to_string());
    }
    Ok(paths)
}
