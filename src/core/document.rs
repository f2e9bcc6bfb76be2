use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// How a knowledge document entered the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SourceKind {
    /// Pasted or typed in directly.
    #[default]
    ManualEntry,
    /// Loaded from a JSON file.
    Json,
    /// Loaded from a plain-text or markdown file.
    Text,
    /// Loaded from a file of some other kind.
    File,
}

impl SourceKind {
    /// Infers the kind from a file path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::Json,
            Some("txt" | "md" | "markdown") => Self::Text,
            _ => Self::File,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ManualEntry => "Manual Entry",
            Self::Json => "JSON",
            Self::Text => "Text",
            Self::File => "File",
        };
        write!(f, "{label}")
    }
}

/// A document in the knowledge base.
///
/// Content is held verbatim; no parsing or cleaning happens at
/// construction time. Retrieval skips documents whose content is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Display name, shown as the source of retrieved chunks.
    pub name: String,
    /// Full text content.
    pub content: String,
    /// Provenance of the document.
    #[serde(default)]
    pub kind: SourceKind,
}

impl Document {
    /// Creates a manually entered document.
    pub fn from_text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            kind: SourceKind::ManualEntry,
        }
    }

    /// Creates a document from file content, naming it after the file
    /// and inferring the kind from the extension.
    pub fn from_file_content(path: &Path, content: impl Into<String>) -> Self {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self {
            name,
            content: content.into(),
            kind: SourceKind::from_path(path),
        }
    }
}
