//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::chunking::chunk_text;
use crate::cli::output::{
    OutputFormat, format_chunks, format_rendered, format_results, format_template,
    format_template_list, format_topic, format_topic_list, format_variables,
    format_written_chunks,
};
use crate::cli::parser::{Cli, Commands, EffortArg, StrategyArg, TemplateCommands, TopicCommands};
use crate::core::{Document, PromptTemplate, Topic};
use crate::error::{ChunkingError, CommandError, Result, StoreError};
use crate::io::{load_document, read_file, write_chunks, write_file};
use crate::prompt::{
    PromptForm, ReasoningConfig, ReasoningEffort, ReasoningStrategy, extract_variables,
};
use crate::retrieval::{RetrievalConfig, retrieve};
use crate::store::{
    JsonStore, RecordStore, TEMPLATES_RECORD, TOPICS_RECORD, load_templates, load_topics,
    save_templates, save_topics,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Executes the CLI command.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
#[allow(clippy::too_many_lines)]
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let store = JsonStore::new(cli.get_store_dir());

    match &cli.command {
        Commands::Chunk {
            file,
            chunk_size,
            overlap,
            out_dir,
            prefix,
        } => cmd_chunk(file, *chunk_size, *overlap, out_dir.as_deref(), prefix, format),
        Commands::Retrieve {
            query,
            files,
            top_k,
            chunk_size,
        } => cmd_retrieve(query, files, *top_k, *chunk_size, format),
        Commands::Render {
            instructions,
            template,
            file,
            form,
            role,
            goal,
            topics,
            knowledge,
            set,
            no_retrieval,
            top_k,
            chunk_size,
            effort,
            strategies,
            output,
        } => {
            let args = RenderArgs {
                instructions: instructions.as_deref(),
                template: template.as_deref(),
                file: file.as_deref(),
                form: form.as_deref(),
                role: role.as_deref(),
                goal: goal.as_deref(),
                topics,
                knowledge,
                set,
                no_retrieval: *no_retrieval,
                top_k: *top_k,
                chunk_size: *chunk_size,
                effort: *effort,
                strategies,
                output: output.as_deref(),
            };
            cmd_render(&store, &args, format)
        }
        Commands::Vars {
            instructions,
            template,
            file,
        } => cmd_vars(
            &store,
            instructions.as_deref(),
            template.as_deref(),
            file.as_deref(),
            format,
        ),
        Commands::Template(cmd) => match cmd {
            TemplateCommands::List => cmd_template_list(&store, format),
            TemplateCommands::Show { name } => cmd_template_show(&store, name, format),
            TemplateCommands::Save {
                name,
                content,
                file,
                role,
                goal,
            } => cmd_template_save(&store, name, content.as_deref(), file.as_deref(), role, goal),
            TemplateCommands::Delete { name } => cmd_template_delete(&store, name),
        },
        Commands::Topic(cmd) => match cmd {
            TopicCommands::List => cmd_topic_list(&store, format),
            TopicCommands::Show { topic } => cmd_topic_show(&store, topic, format),
            TopicCommands::Add {
                title,
                description,
                scope,
                instructions,
                actions,
            } => cmd_topic_add(&store, title, description, scope, instructions, actions),
            TopicCommands::Delete { topic } => cmd_topic_delete(&store, topic),
        },
    }
}

// ==================== Command Implementations ====================

fn cmd_chunk(
    file: &Path,
    chunk_size: usize,
    overlap: usize,
    out_dir: Option<&Path>,
    prefix: &str,
    format: OutputFormat,
) -> Result<String> {
    if chunk_size == 0 {
        return Err(ChunkingError::InvalidConfig {
            reason: "chunk size must be greater than zero".to_string(),
        }
        .into());
    }
    if overlap >= chunk_size {
        return Err(ChunkingError::OverlapTooLarge {
            overlap,
            size: chunk_size,
        }
        .into());
    }

    let content = read_file(file)?;
    let chunks = chunk_text(&content, chunk_size, overlap);
    if let Some(dir) = out_dir {
        let paths = write_chunks(dir, &chunks, prefix)?;
        return Ok(format_written_chunks(&paths, format));
    }
    Ok(format_chunks(&chunks, format))
}

fn cmd_retrieve(
    query: &str,
    files: &[PathBuf],
    top_k: usize,
    chunk_size: usize,
    format: OutputFormat,
) -> Result<String> {
    let documents = load_knowledge(files)?;
    let config = RetrievalConfig::new()
        .with_top_k(top_k)
        .with_chunk_size(chunk_size)
        .clamped();
    let results = retrieve(query, &documents, &config);
    Ok(format_results(&results, query, format))
}

/// Arguments for the render command, bundled to keep the signature sane.
struct RenderArgs<'a> {
    instructions: Option<&'a str>,
    template: Option<&'a str>,
    file: Option<&'a Path>,
    form: Option<&'a Path>,
    role: Option<&'a str>,
    goal: Option<&'a str>,
    topics: &'a [String],
    knowledge: &'a [PathBuf],
    set: &'a [String],
    no_retrieval: bool,
    top_k: Option<usize>,
    chunk_size: Option<usize>,
    effort: Option<EffortArg>,
    strategies: &'a [StrategyArg],
    output: Option<&'a Path>,
}

fn cmd_render(store: &dyn RecordStore, args: &RenderArgs<'_>, format: OutputFormat) -> Result<String> {
    // Start from a serialized form when given; flags layer on top of it.
    let mut form = match args.form {
        Some(path) => load_form(path)?,
        None => PromptForm::default(),
    };

    // Instruction source: saved template, file, inline text, or the form.
    if let Some(name) = args.template {
        let template = find_template(store, name)?;
        form.instructions = template.content;
        form.role = template.role;
        form.goal = template.goal;
    } else if let Some(path) = args.file {
        form.instructions = read_file(path)?;
    } else if let Some(text) = args.instructions {
        form.instructions = text.to_string();
    } else if args.form.is_none() {
        return Err(CommandError::InvalidArgument(
            "no instructions given; pass text, --form, --template, or --file".to_string(),
        )
        .into());
    }

    // Explicit identity flags override whatever the template or form carried.
    if let Some(role) = args.role {
        form.role = role.to_string();
    }
    if let Some(goal) = args.goal {
        form.goal = goal.to_string();
    }

    form.topics.extend(resolve_topics(store, args.topics)?);
    form.knowledge.extend(load_knowledge(args.knowledge)?);

    if args.no_retrieval {
        form.retrieval.enabled = false;
    }
    if let Some(top_k) = args.top_k {
        form.retrieval.top_k = top_k;
    }
    if let Some(chunk_size) = args.chunk_size {
        form.retrieval.chunk_size = chunk_size;
    }

    if args.effort.is_some() || !args.strategies.is_empty() {
        form.reasoning = Some(ReasoningConfig {
            effort: args.effort.map_or(ReasoningEffort::Medium, Into::into),
            strategies: args.strategies.iter().copied().map(Into::into).collect(),
        });
    }

    let base = std::mem::take(&mut form.variables);
    form.variables = parse_variables(&form.instructions, base, args.set)?;

    let prompt = form.render();

    if let Some(path) = args.output {
        write_file(path, &prompt)?;
        return Ok(format!("Wrote prompt to {}\n", path.display()));
    }
    Ok(format_rendered(&prompt, format))
}

fn cmd_vars(
    store: &dyn RecordStore,
    instructions: Option<&str>,
    template: Option<&str>,
    file: Option<&Path>,
    format: OutputFormat,
) -> Result<String> {
    let content = if let Some(name) = template {
        find_template(store, name)?.content
    } else if let Some(path) = file {
        read_file(path)?
    } else if let Some(text) = instructions {
        text.to_string()
    } else {
        return Err(CommandError::InvalidArgument(
            "no instructions given; pass text, --template, or --file".to_string(),
        )
        .into());
    };

    Ok(format_variables(&extract_variables(&content), format))
}

fn cmd_template_list(store: &dyn RecordStore, format: OutputFormat) -> Result<String> {
    let templates = load_templates(store)?;
    Ok(format_template_list(&templates, format))
}

fn cmd_template_show(store: &dyn RecordStore, name: &str, format: OutputFormat) -> Result<String> {
    let template = find_template(store, name)?;
    Ok(format_template(&template, format))
}

fn cmd_template_save(
    store: &dyn RecordStore,
    name: &str,
    content: Option<&str>,
    file: Option<&Path>,
    role: &str,
    goal: &str,
) -> Result<String> {
    let content = if let Some(path) = file {
        read_file(path)?
    } else if let Some(text) = content {
        text.to_string()
    } else {
        return Err(CommandError::InvalidArgument(
            "no content given; pass text or --file".to_string(),
        )
        .into());
    };

    let mut templates = load_templates(store)?;
    templates.retain(|t| t.name != name);
    templates.push(PromptTemplate {
        name: name.to_string(),
        role: role.to_string(),
        goal: goal.to_string(),
        content,
    });
    save_templates(store, &templates)?;
    Ok(format!("Saved template '{name}'\n"))
}

fn cmd_template_delete(store: &dyn RecordStore, name: &str) -> Result<String> {
    let mut templates = load_templates(store)?;
    let before = templates.len();
    templates.retain(|t| t.name != name);
    if templates.len() == before {
        return Err(StoreError::EntryNotFound {
            record: TEMPLATES_RECORD.to_string(),
            name: name.to_string(),
        }
        .into());
    }
    save_templates(store, &templates)?;
    Ok(format!("Deleted template '{name}'\n"))
}

fn cmd_topic_list(store: &dyn RecordStore, format: OutputFormat) -> Result<String> {
    let topics = load_topics(store)?;
    Ok(format_topic_list(&topics, format))
}

fn cmd_topic_show(store: &dyn RecordStore, identifier: &str, format: OutputFormat) -> Result<String> {
    let topics = load_topics(store)?;
    let topic = topics
        .into_iter()
        .find(|t| t.id == identifier || t.title == identifier)
        .ok_or_else(|| StoreError::EntryNotFound {
            record: TOPICS_RECORD.to_string(),
            name: identifier.to_string(),
        })?;
    Ok(format_topic(&topic, format))
}

fn cmd_topic_add(
    store: &dyn RecordStore,
    title: &str,
    description: &str,
    scope: &str,
    instructions: &[String],
    actions: &[String],
) -> Result<String> {
    let mut topic = Topic::new(title);
    topic.description = description.to_string();
    topic.scope = scope.to_string();
    topic.instructions = instructions.to_vec();
    topic.actions = actions.to_vec();

    let mut topics = load_topics(store)?;
    topics.retain(|t| t.id != topic.id);
    let id = topic.id.clone();
    topics.push(topic);
    save_topics(store, &topics)?;
    Ok(format!("Added topic '{id}'\n"))
}

fn cmd_topic_delete(store: &dyn RecordStore, identifier: &str) -> Result<String> {
    let mut topics = load_topics(store)?;
    let before = topics.len();
    topics.retain(|t| t.id != identifier && t.title != identifier);
    if topics.len() == before {
        return Err(StoreError::EntryNotFound {
            record: TOPICS_RECORD.to_string(),
            name: identifier.to_string(),
        }
        .into());
    }
    save_topics(store, &topics)?;
    Ok(format!("Deleted topic '{identifier}'\n"))
}

// ==================== Helpers ====================

fn find_template(store: &dyn RecordStore, name: &str) -> Result<PromptTemplate> {
    load_templates(store)?
        .into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| {
            StoreError::EntryNotFound {
                record: TEMPLATES_RECORD.to_string(),
                name: name.to_string(),
            }
            .into()
        })
}

fn resolve_topics(store: &dyn RecordStore, requested: &[String]) -> Result<Vec<Topic>> {
    if requested.is_empty() {
        return Ok(Vec::new());
    }
    let saved = load_topics(store)?;
    requested
        .iter()
        .map(|identifier| {
            saved
                .iter()
                .find(|t| t.id == *identifier || t.title == *identifier)
                .cloned()
                .ok_or_else(|| {
                    StoreError::EntryNotFound {
                        record: TOPICS_RECORD.to_string(),
                        name: identifier.clone(),
                    }
                    .into()
                })
        })
        .collect()
}

fn load_knowledge(files: &[PathBuf]) -> Result<Vec<Document>> {
    files.iter().map(|path| load_document(path)).collect()
}

/// Deserializes a prompt form from a JSON file.
fn load_form(path: &Path) -> Result<PromptForm> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| {
        CommandError::InvalidArgument(format!("invalid form file {}: {e}", path.display())).into()
    })
}

/// Builds the variable map on top of `base`: every placeholder in the
/// instructions gets an entry (empty unless `base` supplied one), then
/// `KEY=VALUE` pairs fill them in. Pairs for unknown keys are accepted;
/// they simply never match.
fn parse_variables(
    instructions: &str,
    base: BTreeMap<String, String>,
    set: &[String],
) -> Result<BTreeMap<String, String>> {
    let mut variables = base;
    for name in extract_variables(instructions) {
        variables.entry(name).or_default();
    }

    for pair in set {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            CommandError::InvalidArgument(format!("expected KEY=VALUE, got '{pair}'"))
        })?;
        variables.insert(key.trim().to_string(), value.to_string());
    }

    Ok(variables)
}

impl From<EffortArg> for ReasoningEffort {
    fn from(arg: EffortArg) -> Self {
        match arg {
            EffortArg::Low => Self::Low,
            EffortArg::Medium => Self::Medium,
            EffortArg::High => Self::High,
        }
    }
}

impl From<StrategyArg> for ReasoningStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::ToolPreamble => Self::ToolPreamble,
            StrategyArg::ChainOfThought => Self::ChainOfThought,
            StrategyArg::PlanningEnforcement => Self::PlanningEnforcement,
        }
    }
}
