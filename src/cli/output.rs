//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::{PromptTemplate, Topic};
use crate::error::Error;
use crate::retrieval::ScoredChunk;
use serde::Serialize;
use std::fmt::Write;
use unicode_segmentation::UnicodeSegmentation;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a chunk listing.
#[must_use]
pub fn format_chunks(chunks: &[String], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "{} chunks:", chunks.len());
            for (i, chunk) in chunks.iter().enumerate() {
                let preview = truncate(&chunk.replace('\n', "\\n"), 60);
                let _ = writeln!(output, "  [{i}] ({} bytes) {preview}", chunk.len());
            }
            output
        }
        OutputFormat::Json => format_json(&chunks),
    }
}

/// Formats the file paths written by a chunk dump.
#[must_use]
pub fn format_written_chunks(paths: &[String], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "Wrote {} chunks:", paths.len());
            for path in paths {
                let _ = writeln!(output, "  {path}");
            }
            output
        }
        OutputFormat::Json => format_json(&paths),
    }
}

/// Formats retrieval results.
#[must_use]
pub fn format_results(results: &[ScoredChunk], query: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            if results.is_empty() {
                return format!("No relevant chunks found for query: {query}\n");
            }
            let mut output = String::new();
            let _ = writeln!(output, "Found {} relevant chunks:\n", results.len());
            for chunk in results {
                let _ = writeln!(
                    output,
                    "[Source: {}] (Score: {:.2})\n{}\n",
                    chunk.source_name, chunk.score, chunk.content
                );
            }
            output
        }
        OutputFormat::Json => format_json(&results),
    }
}

/// Formats a rendered prompt.
#[must_use]
pub fn format_rendered(prompt: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = prompt.to_string();
            if !output.ends_with('\n') {
                output.push('\n');
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct RenderOutput<'a> {
                prompt: &'a str,
            }
            format_json(&RenderOutput { prompt })
        }
    }
}

/// Formats a variable name listing.
#[must_use]
pub fn format_variables(variables: &[String], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            if variables.is_empty() {
                return "No variables found.\n".to_string();
            }
            let mut output = String::new();
            let _ = writeln!(output, "{} variables:", variables.len());
            for name in variables {
                let _ = writeln!(output, "  {{{{{name}}}}}");
            }
            output
        }
        OutputFormat::Json => format_json(&variables),
    }
}

/// Formats a template list.
#[must_use]
pub fn format_template_list(templates: &[PromptTemplate], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            if templates.is_empty() {
                return "No templates found.\n".to_string();
            }
            let mut output = String::new();
            output.push_str("Templates:\n");
            let _ = writeln!(output, "{:<28} {:<26} Content", "Name", "Role");
            output.push_str(&"-".repeat(78));
            output.push('\n');
            for template in templates {
                let _ = writeln!(
                    output,
                    "{:<28} {:<26} {}",
                    truncate(&template.name, 28),
                    truncate(&template.role, 26),
                    truncate(&template.content.replace('\n', "\\n"), 24)
                );
            }
            output
        }
        OutputFormat::Json => format_json(&templates),
    }
}

/// Formats a single template.
#[must_use]
pub fn format_template(template: &PromptTemplate, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "Template: {}", template.name);
            if !template.role.is_empty() {
                let _ = writeln!(output, "  Role: {}", template.role);
            }
            if !template.goal.is_empty() {
                let _ = writeln!(output, "  Goal: {}", template.goal);
            }
            output.push_str("---\n");
            output.push_str(&template.content);
            if !template.content.ends_with('\n') {
                output.push('\n');
            }
            output
        }
        OutputFormat::Json => format_json(&template),
    }
}

/// Formats a topic list.
#[must_use]
pub fn format_topic_list(topics: &[Topic], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            if topics.is_empty() {
                return "No topics found.\n".to_string();
            }
            let mut output = String::new();
            output.push_str("Topics:\n");
            let _ = writeln!(output, "{:<30} {:<24} Description", "ID", "Title");
            output.push_str(&"-".repeat(78));
            output.push('\n');
            for topic in topics {
                let _ = writeln!(
                    output,
                    "{:<30} {:<24} {}",
                    truncate(&topic.id, 30),
                    truncate(&topic.title, 24),
                    truncate(&topic.description, 24)
                );
            }
            output
        }
        OutputFormat::Json => format_json(&topics),
    }
}

/// Formats a single topic.
#[must_use]
pub fn format_topic(topic: &Topic, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "Topic: {} ({})", topic.title, topic.id);
            if !topic.description.is_empty() {
                let _ = writeln!(output, "  Description: {}", topic.description);
            }
            if !topic.scope.is_empty() {
                let _ = writeln!(output, "  Scope: {}", topic.scope);
            }
            if !topic.instructions.is_empty() {
                output.push_str("  Instructions:\n");
                for line in &topic.instructions {
                    let _ = writeln!(output, "    - {line}");
                }
            }
            if !topic.actions.is_empty() {
                let _ = writeln!(output, "  Actions: {}", topic.actions.join(", "));
            }
            output
        }
        OutputFormat::Json => format_json(&topic),
    }
}

/// Formats an error for display.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }
            format_json(&ErrorOutput {
                error: error.to_string(),
            })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Truncates a string to max length (in grapheme clusters) with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let graphemes: Vec<&str> = s.graphemes(true).collect();
    if graphemes.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        graphemes[..max_len].concat()
    } else {
        format!("{}...", graphemes[..max_len - 3].concat())
    }
}
