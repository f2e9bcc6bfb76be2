use serde::{Deserialize, Serialize};

/// A scoped instruction block attached to a prompt.
///
/// Topics group domain guidance (instructions) and the tool actions the
/// agent may take while the topic applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Stable identifier, e.g. `topic_pedagogy`.
    pub id: String,
    /// Short display title.
    pub title: String,
    /// What the topic covers.
    #[serde(default)]
    pub description: String,
    /// When the topic applies.
    #[serde(default)]
    pub scope: String,
    /// Ordered instruction lines.
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Names of actions available under this topic.
    #[serde(default)]
    pub actions: Vec<String>,
}

impl Topic {
    /// Creates a topic with an id derived from the title
    /// (`topic_` prefix, lowercased, whitespace collapsed to `_`).
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let slug: String = title
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        Self {
            id: format!("topic_{slug}"),
            title,
            description: String::new(),
            scope: String::new(),
            instructions: Vec::new(),
            actions: Vec::new(),
        }
    }
}

/// The built-in topic set, served when the store holds no topics.
#[must_use]
pub fn builtin_topics() -> Vec<Topic> {
    vec![
        Topic {
            id: "topic_presentation_design".to_string(),
            title: "Presentation Design".to_string(),
            description: "Guidelines for creating visually appealing and effective slides."
                .to_string(),
            scope: "Applies to all slide deck generation tasks.".to_string(),
            instructions: vec![
                "Keep text minimal (max 6 bullets per slide).".to_string(),
                "Use high-contrast colors.".to_string(),
                "Ensure fonts are legible (min 24pt).".to_string(),
                "Include visual descriptions for every slide.".to_string(),
            ],
            actions: vec!["GenerateImage".to_string(), "FormatSlide".to_string()],
        },
        Topic {
            id: "topic_academic_research".to_string(),
            title: "Academic Research".to_string(),
            description: "Standards for conducting and citing academic research.".to_string(),
            scope: "Applies to research summaries and literature reviews.".to_string(),
            instructions: vec![
                "Prioritize peer-reviewed sources.".to_string(),
                "Use neutral, objective tone.".to_string(),
                "Cite all claims using APA format.".to_string(),
                "Distinguish between consensus and minority views.".to_string(),
            ],
            actions: vec!["SearchScholar".to_string(), "CiteSource".to_string()],
        },
        Topic {
            id: "topic_pedagogy".to_string(),
            title: "Pedagogy".to_string(),
            description: "Instructional strategies for effective teaching.".to_string(),
            scope: "Applies to tutoring and educational content.".to_string(),
            instructions: vec![
                "Use the Socratic method (ask questions).".to_string(),
                "Scaffold learning from simple to complex.".to_string(),
                "Provide positive reinforcement.".to_string(),
                "Check for understanding frequently.".to_string(),
            ],
            actions: vec!["CreateQuiz".to_string(), "ExplainConcept".to_string()],
        },
    ]
}
