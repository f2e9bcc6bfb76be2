//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Promptforge: build structured agent prompts from templates, topics,
/// and a lexically retrieved knowledge base.
#[derive(Parser, Debug)]
#[command(name = "promptforge")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding saved templates and topics.
    ///
    /// Defaults to `.promptforge` in the current directory.
    #[arg(short, long, env = "PROMPTFORGE_STORE_DIR")]
    pub store_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Reasoning effort accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffortArg {
    /// Brief, bullet-point explanations.
    Low,
    /// No effort-specific directives.
    Medium,
    /// Extensive planning and reflection.
    High,
}

/// Reasoning strategy accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// Narrated tool-use preambles.
    ToolPreamble,
    /// Step-by-step reasoning.
    ChainOfThought,
    /// Keep going until the task is fully resolved.
    PlanningEnforcement,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split text into overlapping chunks.
    Chunk {
        /// Path to the text file to chunk.
        file: PathBuf,

        /// Chunk size in bytes.
        #[arg(long, default_value = "500")]
        chunk_size: usize,

        /// Overlap between consecutive chunks in bytes.
        #[arg(long, default_value = "50")]
        overlap: usize,

        /// Write chunks to this directory instead of listing them.
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Filename prefix for written chunk files.
        #[arg(long, default_value = "chunk")]
        prefix: String,
    },

    /// Retrieve the most relevant chunks for a query.
    Retrieve {
        /// The search query.
        query: String,

        /// Knowledge files to search.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of chunks to return (1-10).
        #[arg(long, default_value = "3")]
        top_k: usize,

        /// Chunk size in bytes (100-2000).
        #[arg(long, default_value = "500")]
        chunk_size: usize,
    },

    /// Render a full prompt from a form, template, or instruction text.
    Render {
        /// Instruction text; may contain {{variable}} placeholders.
        instructions: Option<String>,

        /// Render a saved template instead of inline instructions.
        #[arg(short, long, conflicts_with_all = ["instructions", "file", "form"])]
        template: Option<String>,

        /// Read instructions from a file.
        #[arg(short = 'f', long, conflicts_with_all = ["instructions", "form"])]
        file: Option<PathBuf>,

        /// Render a serialized prompt form (JSON) with role, goal, topics,
        /// knowledge, examples, and reasoning; other flags override it.
        #[arg(long, conflicts_with = "instructions")]
        form: Option<PathBuf>,

        /// Agent role, e.g. "Senior Recruiter".
        #[arg(long)]
        role: Option<String>,

        /// Agent goal.
        #[arg(long)]
        goal: Option<String>,

        /// Saved topic (id or title) to include; repeatable.
        #[arg(long = "topic")]
        topics: Vec<String>,

        /// Knowledge file to include; repeatable.
        #[arg(short, long = "knowledge")]
        knowledge: Vec<PathBuf>,

        /// Variable value as KEY=VALUE; repeatable.
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// List all knowledge sources instead of retrieving.
        #[arg(long)]
        no_retrieval: bool,

        /// Number of chunks to retrieve (1-10, default 3).
        #[arg(long)]
        top_k: Option<usize>,

        /// Retrieval chunk size in bytes (100-2000, default 500).
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Reasoning effort; omit to skip the reasoning section.
        #[arg(long, value_enum)]
        effort: Option<EffortArg>,

        /// Reasoning strategy; repeatable.
        #[arg(long = "strategy", value_enum)]
        strategies: Vec<StrategyArg>,

        /// Write the rendered prompt to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the {{variable}} placeholders in instruction text.
    Vars {
        /// Instruction text to inspect.
        instructions: Option<String>,

        /// Inspect a saved template instead.
        #[arg(short, long, conflicts_with_all = ["instructions", "file"])]
        template: Option<String>,

        /// Read instructions from a file.
        #[arg(short = 'f', long, conflicts_with = "instructions")]
        file: Option<PathBuf>,
    },

    /// Manage saved prompt templates.
    #[command(subcommand)]
    Template(TemplateCommands),

    /// Manage saved topics.
    #[command(subcommand)]
    Topic(TopicCommands),
}

/// Template management commands.
#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// List saved templates.
    #[command(name = "list", alias = "ls")]
    List,

    /// Show a template's full content.
    Show {
        /// Template name.
        name: String,
    },

    /// Save a template (replaces one with the same name).
    Save {
        /// Template name.
        name: String,

        /// Template content; may contain {{variable}} placeholders.
        content: Option<String>,

        /// Read content from a file.
        #[arg(short = 'f', long, conflicts_with = "content")]
        file: Option<PathBuf>,

        /// Agent role stored with the template.
        #[arg(long, default_value = "")]
        role: String,

        /// Agent goal stored with the template.
        #[arg(long, default_value = "")]
        goal: String,
    },

    /// Delete a template.
    #[command(name = "delete", alias = "rm")]
    Delete {
        /// Template name.
        name: String,
    },
}

/// Topic management commands.
#[derive(Subcommand, Debug)]
pub enum TopicCommands {
    /// List saved topics.
    #[command(name = "list", alias = "ls")]
    List,

    /// Show a topic's full definition.
    Show {
        /// Topic id or title.
        topic: String,
    },

    /// Add a topic.
    Add {
        /// Topic title.
        title: String,

        /// What the topic covers.
        #[arg(long, default_value = "")]
        description: String,

        /// When the topic applies.
        #[arg(long, default_value = "")]
        scope: String,

        /// Instruction line; repeatable.
        #[arg(long = "instruction")]
        instructions: Vec<String>,

        /// Action name; repeatable.
        #[arg(long = "action")]
        actions: Vec<String>,
    },

    /// Delete a topic.
    #[command(name = "delete", alias = "rm")]
    Delete {
        /// Topic id or title.
        topic: String,
    },
}

impl Cli {
    /// Returns the store directory, using the default if not specified.
    #[must_use]
    pub fn get_store_dir(&self) -> PathBuf {
        self.store_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::store::DEFAULT_STORE_DIR))
    }
}
