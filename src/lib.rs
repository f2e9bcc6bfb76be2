//! # Promptforge
//!
//! Build structured agent prompts from templates, topics, few-shot
//! examples, and a lexically retrieved knowledge base.
//!
//! The core is a small retrieval engine: documents are split into
//! overlapping chunks, scored against a query by token overlap, and the
//! best chunks are woven into the rendered prompt. Around it sit prompt
//! assembly with `{{variable}}` substitution, a JSON-file store for
//! templates and topics, and a CLI.
//!
//! ## Features
//!
//! - **Chunking**: Word-boundary-aware overlapping chunks
//! - **Retrieval**: Deterministic token-overlap scoring with top-K ranking
//! - **Prompt assembly**: Role, goal, topics, knowledge, examples, reasoning
//! - **JSON Store**: Templates and topics persisted as plain JSON files

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
// Note: unsafe is needed for memory-mapped I/O (memmap2)
#![warn(unsafe_code)]

pub mod chunking;
pub mod cli;
pub mod core;
pub mod error;
pub mod io;
pub mod prompt;
pub mod retrieval;
pub mod store;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{Document, PromptTemplate, SourceKind, Topic};

// Re-export chunking and retrieval types
pub use chunking::{DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP, chunk_text};
pub use retrieval::{
    DEFAULT_TOP_K, RetrievalConfig, ScoredChunk, calculate_score, retrieve, tokenize,
};

// Re-export prompt assembly types
pub use prompt::{
    Example, PromptForm, ReasoningConfig, ReasoningEffort, ReasoningStrategy, RetrievalSettings,
    extract_variables,
};

// Re-export store types
pub use store::{DEFAULT_STORE_DIR, JsonStore, MemoryStore, RecordStore};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
