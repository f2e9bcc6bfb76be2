//! Persistence for templates and topics.
//!
//! Records are stored as JSON arrays, one file per record kind. A
//! missing file reads back as an empty collection; writes replace the
//! whole collection atomically from the caller's perspective.

pub mod json;

pub use json::JsonStore;

use crate::core::{PromptTemplate, Topic, builtin_templates, builtin_topics};
use crate::error::{Result, StoreError};

/// Default store directory, relative to the working directory.
pub const DEFAULT_STORE_DIR: &str = ".promptforge";

/// Record name for saved templates.
pub const TEMPLATES_RECORD: &str = "templates";

/// Record name for saved topics.
pub const TOPICS_RECORD: &str = "topics";

/// Trait for persistence backends.
///
/// A record is a named collection of JSON values. Implementations only
/// deal in raw values; typed access goes through the free functions in
/// this module.
pub trait RecordStore {
    /// Loads a record's values. A record that was never saved yields an
    /// empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing data cannot be read or parsed.
    fn get(&self, record: &str) -> Result<Vec<serde_json::Value>>;

    /// Replaces a record's values.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing data cannot be written.
    fn save(&self, record: &str, values: &[serde_json::Value]) -> Result<()>;
}

/// Loads saved templates, falling back to the built-in set when the
/// store holds none.
///
/// # Errors
///
/// Returns an error if the store cannot be read or an entry fails to
/// deserialize.
pub fn load_templates(store: &dyn RecordStore) -> Result<Vec<PromptTemplate>> {
    let values = store.get(TEMPLATES_RECORD)?;
    if values.is_empty() {
        return Ok(builtin_templates());
    }
    values
        .into_iter()
        .map(|value| {
            serde_json::from_value(value)
                .map_err(|e| StoreError::Serialization(e.to_string()).into())
        })
        .collect()
}

/// Saves the full template collection.
///
/// # Errors
///
/// Returns an error if serialization or the store write fails.
pub fn save_templates(store: &dyn RecordStore, templates: &[PromptTemplate]) -> Result<()> {
    let values = to_values(templates)?;
    store.save(TEMPLATES_RECORD, &values)
}

/// Loads saved topics, falling back to the built-in set when the store
/// holds none.
///
/// # Errors
///
/// Returns an error if the store cannot be read or an entry fails to
/// deserialize.
pub fn load_topics(store: &dyn RecordStore) -> Result<Vec<Topic>> {
    let values = store.get(TOPICS_RECORD)?;
    if values.is_empty() {
        return Ok(builtin_topics());
    }
    values
        .into_iter()
        .map(|value| {
            serde_json::from_value(value)
                .map_err(|e| StoreError::Serialization(e.to_string()).into())
        })
        .collect()
}

/// Saves the full topic collection.
///
/// # Errors
///
/// Returns an error if serialization or the store write fails.
pub fn save_topics(store: &dyn RecordStore, topics: &[Topic]) -> Result<()> {
    let values = to_values(topics)?;
    store.save(TOPICS_RECORD, &values)
}

fn to_values<T: serde::Serialize>(items: &[T]) -> Result<Vec<serde_json::Value>> {
    items
        .iter()
        .map(|item| {
            serde_json::to_value(item)
                .map_err(|e| StoreError::Serialization(e.to_string()).into())
        })
        .collect()
}

/// In-memory store used by tests and one-shot runs that should not
/// touch the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: std::sync::Mutex<std::collections::HashMap<String, Vec<serde_json::Value>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, record: &str) -> Result<Vec<serde_json::Value>> {
        let records = self.records.lock().map_err(|e| {
            crate::error::Error::from(StoreError::ReadFailed {
                record: record.to_string(),
                reason: e.to_string(),
            })
        })?;
        Ok(records.get(record).cloned().unwrap_or_default())
    }

    fn save(&self, record: &str, values: &[serde_json::Value]) -> Result<()> {
        let mut records = self.records.lock().map_err(|e| {
            crate::error::Error::from(StoreError::WriteFailed {
                record: record.to_string(),
                reason: e.to_string(),
            })
        })?;
        records.insert(record.to_string(), values.to_vec());
        Ok(())
    }
}
