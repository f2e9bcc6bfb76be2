//! CLI layer for Promptforge.
//!
//! Provides the command-line interface using clap, with commands for
//! chunking, retrieval, prompt rendering, and template/topic management.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands, TemplateCommands, TopicCommands};
