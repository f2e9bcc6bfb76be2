//! Core domain types: knowledge documents, prompt templates, and topics.

mod document;
mod template;
mod topic;

pub use document::{Document, SourceKind};
pub use template::{PromptTemplate, builtin_templates};
pub use topic::{Topic, builtin_topics};
