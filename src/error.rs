//! Error types for promptforge operations.
//!
//! This module provides the error hierarchy using `thiserror` for all
//! operations including chunking, persistence, I/O, and CLI commands.
//! The retrieval core itself has no error kinds - it degrades to empty
//! results rather than failing.

use thiserror::Error;

/// Result type alias for promptforge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for promptforge operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Chunking-related errors (invalid configuration).
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    /// Store-related errors (template/topic persistence).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}

/// Chunking-specific errors.
///
/// The chunker itself never fails at runtime; these errors are raised by
/// callers that validate a configuration before chunking.
#[derive(Error, Debug)]
pub enum ChunkingError {
    /// Invalid chunk configuration.
    #[error("invalid chunk configuration: {reason}")]
    InvalidConfig {
        /// Reason the configuration is invalid.
        reason: String,
    },

    /// Overlap is as large as the chunk size.
    ///
    /// The chunker guards against the resulting non-advancing cursor, but
    /// such a configuration is almost certainly a caller mistake.
    #[error("overlap {overlap} must be less than chunk size {size}")]
    OverlapTooLarge {
        /// Overlap size.
        overlap: usize,
        /// Chunk size.
        size: usize,
    },
}

/// Store-specific errors for template and topic persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read a record file.
    #[error("failed to read record '{record}': {reason}")]
    ReadFailed {
        /// Record name (e.g. "templates").
        record: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write a record file.
    #[error("failed to write record '{record}': {reason}")]
    WriteFailed {
        /// Record name.
        record: String,
        /// Reason for failure.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Named entry not found within a record.
    #[error("{record} entry not found: {name}")]
    EntryNotFound {
        /// Record name.
        record: String,
        /// Entry name or id that was not found.
        name: String,
    },
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write file.
    #[error("failed to write file: {path}: {reason}")]
    WriteFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Memory mapping error.
    #[error("memory mapping failed: {path}: {reason}")]
    MmapFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Directory creation error.
    #[error("failed to create directory: {path}: {reason}")]
    DirectoryFailed {
        /// Path to the directory.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

// Implement From traits for standard library errors

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(StoreError::Serialization(err.to_string()))
    }
}
