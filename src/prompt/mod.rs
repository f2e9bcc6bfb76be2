//! Prompt assembly: builds the final prompt text from an agent identity,
//! topics, knowledge, few-shot examples, reasoning configuration, and
//! instruction body, then fills in `{{variable}}` placeholders.
//!
//! Sections are emitted in a fixed order and empty sections are skipped
//! entirely, so the output contains no blank headers.

use crate::core::{Document, Topic};
use crate::retrieval::{RetrievalConfig, retrieve};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

/// Maximum snippet length (in grapheme clusters) shown per knowledge
/// source when retrieval is disabled.
const SNIPPET_LEN: usize = 200;

/// How much reasoning the agent is asked to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    /// Brief, bullet-point explanations.
    Low,
    /// No effort-specific directives in the output.
    #[default]
    Medium,
    /// Extensive planning and reflection.
    High,
}

/// A prompting strategy to inject into the reasoning section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningStrategy {
    /// A `<tool_preambles>` block asking the agent to narrate its plan.
    ToolPreamble,
    /// Step-by-step reasoning directive.
    ChainOfThought,
    /// Directives to keep going until the task is fully resolved.
    PlanningEnforcement,
}

/// Reasoning effort plus the set of enabled strategies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReasoningConfig {
    /// How much reasoning to ask for.
    pub effort: ReasoningEffort,
    /// Enabled strategies; rendered in a fixed order.
    #[serde(default)]
    pub strategies: Vec<ReasoningStrategy>,
}

impl ReasoningConfig {
    #[must_use]
    pub fn has(&self, strategy: ReasoningStrategy) -> bool {
        self.strategies.contains(&strategy)
    }
}

/// A few-shot example: a user turn and the desired assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// The user's message.
    pub input: String,
    /// The assistant response to emulate.
    pub output: String,
}

/// Controls the knowledge section of the rendered prompt.
///
/// With `enabled` set, knowledge is retrieved lexically against a query
/// built from the identity and instructions; otherwise every source is
/// listed with a short content snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Whether to retrieve instead of listing every source.
    pub enabled: bool,
    /// Maximum chunks woven into the prompt.
    pub top_k: usize,
    /// Chunk size in bytes used during retrieval.
    pub chunk_size: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        let config = RetrievalConfig::default();
        Self {
            enabled: true,
            top_k: config.top_k,
            chunk_size: config.chunk_size,
        }
    }
}

impl RetrievalSettings {
    /// Converts to a clamped retrieval config.
    #[must_use]
    pub fn to_config(self) -> RetrievalConfig {
        RetrievalConfig::new()
            .with_top_k(self.top_k)
            .with_chunk_size(self.chunk_size)
            .clamped()
    }
}

/// Everything needed to render a prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptForm {
    /// The instruction body; may contain `{{variable}}` placeholders.
    pub instructions: String,
    /// Agent persona.
    #[serde(default)]
    pub role: String,
    /// Agent objective.
    #[serde(default)]
    pub goal: String,
    /// Topics whose titles are listed in the prompt.
    #[serde(default)]
    pub topics: Vec<Topic>,
    /// Knowledge base documents.
    #[serde(default)]
    pub knowledge: Vec<Document>,
    /// Few-shot examples.
    #[serde(default)]
    pub examples: Vec<Example>,
    /// Reasoning section configuration; omitted entirely when `None`.
    #[serde(default)]
    pub reasoning: Option<ReasoningConfig>,
    /// Knowledge retrieval settings.
    #[serde(default)]
    pub retrieval: RetrievalSettings,
    /// Variable values substituted into the rendered text.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl PromptForm {
    /// Creates a form with the given instruction body and defaults for
    /// everything else.
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            ..Self::default()
        }
    }

    /// Renders the full prompt text.
    ///
    /// Section order: Role, Goal, Topics, Knowledge Sources, Few-Shot
    /// Examples, Reasoning Configuration, Instructions. Variable
    /// substitution runs last over the assembled text; a variable with
    /// an empty value leaves its placeholder intact.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        if !self.role.is_empty() {
            out.push_str(&format!("Role:\n{}\n\n", self.role));
        }
        if !self.goal.is_empty() {
            out.push_str(&format!("Goal:\n{}\n\n", self.goal));
        }

        if !self.topics.is_empty() {
            let lines: Vec<String> = self
                .topics
                .iter()
                .map(|t| format!("- {}", t.title))
                .collect();
            out.push_str(&format!("Topics:\n{}\n\n", lines.join("\n")));
        }

        if !self.knowledge.is_empty() {
            out.push_str(&self.render_knowledge());
            out.push_str("\n\n");
        }

        if !self.examples.is_empty() {
            let blocks: Vec<String> = self
                .examples
                .iter()
                .enumerate()
                .map(|(i, ex)| {
                    format!(
                        "Example {}:\nUser: {}\nAssistant: {}",
                        i + 1,
                        ex.input,
                        ex.output
                    )
                })
                .collect();
            out.push_str(&format!("Few-Shot Examples:\n{}\n\n", blocks.join("\n\n")));
        }

        if let Some(reasoning) = &self.reasoning {
            out.push_str(&render_reasoning(reasoning));
        }

        out.push_str(&format!("Instructions:\n{}", self.instructions));

        substitute(&out, &self.variables)
    }

    /// Renders the knowledge section body (no trailing blank line).
    fn render_knowledge(&self) -> String {
        if self.retrieval.enabled {
            // The query folds in the identity so retrieval favors
            // chunks relevant to the agent's purpose, not just the
            // literal instruction text.
            let query = format!("{} {} {}", self.role, self.goal, self.instructions);
            let chunks = retrieve(&query, &self.knowledge, &self.retrieval.to_config());

            if chunks.is_empty() {
                return "Knowledge Sources:\n(No relevant information found for the current prompt)"
                    .to_string();
            }
            let rendered: Vec<String> = chunks
                .iter()
                .map(|chunk| {
                    format!(
                        "[Source: {}] (Score: {:.2})\n{}",
                        chunk.source_name, chunk.score, chunk.content
                    )
                })
                .collect();
            format!("Knowledge Sources (Retrieved):\n{}", rendered.join("\n\n"))
        } else {
            let listed: Vec<String> = self
                .knowledge
                .iter()
                .map(|doc| {
                    let mut info = format!("- {} ({})", doc.name, doc.kind);
                    if !doc.content.is_empty() {
                        info.push_str(&format!("\n  Content Snippet: {}", snippet(&doc.content)));
                    }
                    info
                })
                .collect();
            format!("Knowledge Sources:\n{}", listed.join("\n"))
        }
    }
}

fn render_reasoning(reasoning: &ReasoningConfig) -> String {
    let mut out = String::from("Reasoning Configuration:\n");

    match reasoning.effort {
        ReasoningEffort::Low => {
            out.push_str(
                "[Reasoning Effort: Low]\n- Provide brief, bullet-point explanations.\n- Focus on speed and conciseness.\n",
            );
        }
        ReasoningEffort::High => {
            out.push_str(
                "[Reasoning Effort: High]\n- Plan extensively before answering.\n- Decompose the user's query into sub-tasks.\n- Reflect on outcomes before proceeding.\n",
            );
        }
        ReasoningEffort::Medium => {}
    }

    if !reasoning.strategies.is_empty() {
        out.push_str("\nStrategic Instructions:\n");
        // Strategies render in a fixed order, independent of how they
        // were listed in the config.
        if reasoning.has(ReasoningStrategy::ToolPreamble) {
            out.push_str(
                "<tool_preambles>\n- Always begin by rephrasing the user's goal.\n- Outline a structured plan detailing each logical step.\n- Narrate each step succinctly as you execute it.\n- Finish by summarizing completed work.\n</tool_preambles>\n",
            );
        }
        if reasoning.has(ReasoningStrategy::ChainOfThought) {
            out.push_str("- Think step-by-step. Explain your logic clearly for each decision.\n");
        }
        if reasoning.has(ReasoningStrategy::PlanningEnforcement) {
            out.push_str(
                "- Remember, you are an agent. Keep going until the user's query is completely resolved.\n- Do not stop after completing only part of the request.\n- Only terminate your turn when you are sure that the problem is solved.\n",
            );
        }
    }

    out.push('\n');
    out
}

/// Truncates content to a short display snippet, appending `...` when
/// anything was cut. Counts grapheme clusters so multi-byte text is
/// never split mid-character.
fn snippet(content: &str) -> String {
    let mut iter = content.grapheme_indices(true);
    match iter.nth(SNIPPET_LEN) {
        Some((byte_idx, _)) => format!("{}...", &content[..byte_idx]),
        None => content.to_string(),
    }
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([^}]+)\}\}").unwrap_or_else(|_| unreachable!()))
}

/// Extracts `{{variable}}` names from text, trimmed, deduplicated, in
/// first-occurrence order.
#[must_use]
pub fn extract_variables(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for capture in placeholder_regex().captures_iter(text) {
        if let Some(name) = capture.get(1) {
            let name = name.as_str().trim().to_string();
            if !name.is_empty() && !seen.contains(&name) {
                seen.push(name);
            }
        }
    }
    seen
}

/// Replaces `{{key}}` with its value for every variable with a
/// non-empty value. Empty values leave the placeholder visible so
/// missing inputs are obvious in the output.
#[must_use]
pub fn substitute(text: &str, variables: &BTreeMap<String, String>) -> String {
    let mut out = text.to_string();
    for (key, value) in variables {
        if !value.is_empty() {
            out = out.replace(&format!("{{{{{key}}}}}"), value);
        }
    }
    out
}
