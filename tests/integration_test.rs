//! Integration tests for Promptforge.

#![allow(clippy::expect_used)]

use promptforge::core::Document;
use promptforge::prompt::{PromptForm, ReasoningConfig, ReasoningEffort, ReasoningStrategy};
use promptforge::retrieval::{RetrievalConfig, retrieve};
use promptforge::store::{JsonStore, RecordStore, load_templates, save_templates};
use promptforge::{PromptTemplate, chunk_text};
use tempfile::TempDir;

fn knowledge_base() -> Vec<Document> {
    vec![
        Document::from_text(
            "astronomy",
            "The sky appears blue because of Rayleigh scattering. At sunset the sky turns red and orange.",
        ),
        Document::from_text(
            "orchard",
            "Apples are harvested in autumn. Ripe apples are red or green depending on the variety.",
        ),
        Document::from_text(
            "bakery",
            "Banana bread needs very ripe bananas. Apple pie needs firm, tart apples for the filling.",
        ),
    ]
}

#[test]
fn test_chunk_then_retrieve_pipeline() {
    let content = "Rust favors explicit error handling. ".repeat(40);
    let chunks = chunk_text(&content, 500, 50);
    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.len() <= 500);
    }

    let docs = vec![Document::from_text("doc", content)];
    let results = retrieve("error handling", &docs, &RetrievalConfig::default());
    assert!(!results.is_empty());
    assert!(results.len() <= 3);
    assert!(results[0].score > 0.0);
}

#[test]
fn test_retrieve_ranks_most_relevant_document_first() {
    let results = retrieve(
        "apples for a pie",
        &knowledge_base(),
        &RetrievalConfig::default(),
    );
    assert!(!results.is_empty());
    assert_eq!(results[0].source_name, "bakery");
}

#[test]
fn test_render_full_prompt() {
    let mut form = PromptForm::new("Explain {{concept}} simply.");
    form.role = "Patient Tutor".to_string();
    form.goal = "Explain complex concepts in simple terms.".to_string();
    form.knowledge = knowledge_base();
    form.examples = vec![promptforge::Example {
        input: "What is gravity?".to_string(),
        output: "Gravity pulls things together.".to_string(),
    }];
    form.reasoning = Some(ReasoningConfig {
        effort: ReasoningEffort::High,
        strategies: vec![ReasoningStrategy::ChainOfThought],
    });
    form.variables
        .insert("concept".to_string(), "Rayleigh scattering".to_string());

    let text = form.render();

    // Section order is fixed.
    let role = text.find("Role:\nPatient Tutor").expect("role section");
    let knowledge = text.find("Knowledge Sources").expect("knowledge section");
    let examples = text.find("Few-Shot Examples:").expect("examples section");
    let reasoning = text
        .find("Reasoning Configuration:")
        .expect("reasoning section");
    let instructions = text.find("Instructions:").expect("instructions section");
    assert!(role < knowledge);
    assert!(knowledge < examples);
    assert!(examples < reasoning);
    assert!(reasoning < instructions);

    // The variable was substituted everywhere.
    assert!(text.ends_with("Instructions:\nExplain Rayleigh scattering simply."));
    assert!(!text.contains("{{concept}}"));
}

#[test]
fn test_render_prompt_without_optional_sections() {
    let form = PromptForm::new("Just do it.");
    assert_eq!(form.render(), "Instructions:\nJust do it.");
}

#[test]
fn test_store_round_trip_through_files() {
    let temp_dir = TempDir::new().expect("temp dir");
    let store = JsonStore::new(temp_dir.path());

    // Empty store serves builtins.
    let templates = load_templates(&store).expect("load");
    assert_eq!(templates.len(), 7);

    // Saving persists; a fresh store instance sees the same data.
    let custom = vec![PromptTemplate::new("Ad Writer", "Sell {{product}}.")];
    save_templates(&store, &custom).expect("save");

    let reopened = JsonStore::new(temp_dir.path());
    let loaded = load_templates(&reopened).expect("reload");
    assert_eq!(loaded, custom);
    assert!(temp_dir.path().join("templates.json").exists());
}

#[test]
fn test_store_raw_record_access() {
    let temp_dir = TempDir::new().expect("temp dir");
    let store = JsonStore::new(temp_dir.path());

    assert!(store.get("templates").expect("get").is_empty());
    store
        .save("templates", &[serde_json::json!({"name": "x", "content": "y"})])
        .expect("save");
    assert_eq!(store.get("templates").expect("get").len(), 1);
}

/// Property tests for the chunking and scoring invariants.
mod property_tests {
    use promptforge::core::Document;
    use promptforge::retrieval::{RetrievalConfig, calculate_score, retrieve};
    use promptforge::chunk_text;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn chunks_never_exceed_chunk_size(
            text in "[a-zA-Z \n]{0,2000}",
            chunk_size in 100usize..600,
        ) {
            for chunk in chunk_text(&text, chunk_size, 50) {
                prop_assert!(chunk.len() <= chunk_size);
            }
        }

        #[test]
        fn short_text_passes_through(text in "[a-z ]{1,100}") {
            let chunks = chunk_text(&text, 500, 50);
            prop_assert_eq!(chunks, vec![text]);
        }

        #[test]
        fn chunking_always_terminates(
            text in "\\PC{0,500}",
            chunk_size in 1usize..50,
            overlap in 0usize..100,
        ) {
            // Any overlap, even >= chunk_size, must not hang or panic.
            let chunks = chunk_text(&text, chunk_size, overlap);
            prop_assert!(text.is_empty() || !chunks.is_empty());
        }

        #[test]
        fn scores_are_never_negative(
            query in "[a-z ]{0,50}",
            chunk in "[a-z ]{0,200}",
        ) {
            prop_assert!(calculate_score(&query, &chunk) >= 0.0);
        }

        #[test]
        fn results_respect_top_k(top_k in 1usize..10) {
            let docs: Vec<Document> = (0..20)
                .map(|i| Document::from_text(format!("doc-{i}"), "apples everywhere"))
                .collect();
            let config = RetrievalConfig::new().with_top_k(top_k);
            let results = retrieve("apples", &docs, &config);
            prop_assert!(results.len() <= top_k);
        }

        #[test]
        fn results_sorted_and_positive(query in "[a-z]{3,10}") {
            let docs = vec![
                Document::from_text("a", format!("{query} once")),
                Document::from_text("b", format!("{query} and {query} twice")),
                Document::from_text("c", "nothing relevant"),
            ];
            let results = retrieve(&query, &docs, &RetrievalConfig::default());
            for pair in results.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
            for chunk in &results {
                prop_assert!(chunk.score > 0.0);
            }
        }

        #[test]
        fn retrieval_is_deterministic(query in "[a-z ]{1,30}") {
            let docs = vec![
                Document::from_text("x", "apples bananas cherries dates"),
                Document::from_text("y", "elderberries figs grapes"),
            ];
            let config = RetrievalConfig::default();
            prop_assert_eq!(
                retrieve(&query, &docs, &config),
                retrieve(&query, &docs, &config)
            );
        }
    }
}

/// CLI command integration tests.
mod cli_tests {
    use promptforge::cli::commands::execute;
    use promptforge::cli::parser::{Cli, Commands, TemplateCommands, TopicCommands};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Helper to create a CLI struct with a custom store directory.
    fn make_cli(store_dir: PathBuf, command: Commands) -> Cli {
        Cli {
            store_dir: Some(store_dir),
            verbose: false,
            format: "text".to_string(),
            command,
        }
    }

    /// Helper to create a CLI struct with JSON format.
    fn make_cli_json(store_dir: PathBuf, command: Commands) -> Cli {
        Cli {
            store_dir: Some(store_dir),
            verbose: false,
            format: "json".to_string(),
            command,
        }
    }

    fn write_knowledge_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).expect("write knowledge file");
        path
    }

    #[test]
    fn test_cmd_chunk() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = write_knowledge_file(
            temp_dir.path(),
            "long.txt",
            &"word ".repeat(300),
        );

        let cli = make_cli(
            temp_dir.path().join("store"),
            Commands::Chunk {
                file,
                chunk_size: 500,
                overlap: 50,
                out_dir: None,
                prefix: "chunk".to_string(),
            },
        );
        let output = execute(&cli).expect("chunk");
        assert!(output.contains("chunks:"));
    }

    #[test]
    fn test_cmd_chunk_writes_files() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = write_knowledge_file(
            temp_dir.path(),
            "long.txt",
            &"word ".repeat(300),
        );
        let out_dir = temp_dir.path().join("dump");

        let cli = make_cli(
            temp_dir.path().join("store"),
            Commands::Chunk {
                file,
                chunk_size: 500,
                overlap: 50,
                out_dir: Some(out_dir.clone()),
                prefix: "part".to_string(),
            },
        );
        let output = execute(&cli).expect("chunk");
        assert!(output.starts_with("Wrote "));

        let first = std::fs::read_to_string(out_dir.join("part_0000.txt")).expect("read chunk");
        assert!(first.starts_with("word"));
        assert!(first.len() <= 500);
        assert!(out_dir.join("part_0001.txt").exists());
    }

    #[test]
    fn test_cmd_chunk_rejects_bad_overlap() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = write_knowledge_file(temp_dir.path(), "t.txt", "text");

        let cli = make_cli(
            temp_dir.path().join("store"),
            Commands::Chunk {
                file,
                chunk_size: 100,
                overlap: 100,
                out_dir: None,
                prefix: "chunk".to_string(),
            },
        );
        assert!(execute(&cli).is_err());
    }

    #[test]
    fn test_cmd_chunk_missing_file() {
        let temp_dir = TempDir::new().expect("temp dir");
        let cli = make_cli(
            temp_dir.path().join("store"),
            Commands::Chunk {
                file: temp_dir.path().join("missing.txt"),
                chunk_size: 500,
                overlap: 50,
                out_dir: None,
                prefix: "chunk".to_string(),
            },
        );
        assert!(execute(&cli).is_err());
    }

    #[test]
    fn test_cmd_retrieve() {
        let temp_dir = TempDir::new().expect("temp dir");
        let fruit = write_knowledge_file(temp_dir.path(), "fruit.txt", "Apples are red.");
        let sky = write_knowledge_file(temp_dir.path(), "sky.txt", "The sky is blue.");

        let cli = make_cli(
            temp_dir.path().join("store"),
            Commands::Retrieve {
                query: "red apples".to_string(),
                files: vec![fruit, sky],
                top_k: 1,
                chunk_size: 500,
            },
        );
        let output = execute(&cli).expect("retrieve");
        assert!(output.contains("[Source: fruit.txt]"));
        assert!(!output.contains("sky.txt"));
    }

    #[test]
    fn test_cmd_retrieve_no_match() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = write_knowledge_file(temp_dir.path(), "fruit.txt", "Apples are red.");

        let cli = make_cli(
            temp_dir.path().join("store"),
            Commands::Retrieve {
                query: "quantum chromodynamics".to_string(),
                files: vec![file],
                top_k: 3,
                chunk_size: 500,
            },
        );
        let output = execute(&cli).expect("retrieve");
        assert!(output.contains("No relevant chunks found"));
    }

    #[test]
    fn test_cmd_retrieve_json() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = write_knowledge_file(temp_dir.path(), "fruit.txt", "Apples are red.");

        let cli = make_cli_json(
            temp_dir.path().join("store"),
            Commands::Retrieve {
                query: "apples".to_string(),
                files: vec![file],
                top_k: 3,
                chunk_size: 500,
            },
        );
        let output = execute(&cli).expect("retrieve");
        assert!(output.contains("\"source_name\": \"fruit.txt\""));
        assert!(output.contains("\"score\""));
    }

    fn render_command(instructions: &str) -> Commands {
        Commands::Render {
            instructions: Some(instructions.to_string()),
            template: None,
            file: None,
            form: None,
            role: None,
            goal: None,
            topics: Vec::new(),
            knowledge: Vec::new(),
            set: Vec::new(),
            no_retrieval: false,
            top_k: None,
            chunk_size: None,
            effort: None,
            strategies: Vec::new(),
            output: None,
        }
    }

    #[test]
    fn test_cmd_render_inline() {
        let temp_dir = TempDir::new().expect("temp dir");
        let cli = make_cli(
            temp_dir.path().join("store"),
            render_command("Summarize the report."),
        );
        let output = execute(&cli).expect("render");
        assert_eq!(output, "Instructions:\nSummarize the report.\n");
    }

    #[test]
    fn test_cmd_render_with_variables_and_identity() {
        let temp_dir = TempDir::new().expect("temp dir");
        let mut command = render_command("Greet {{name}}.");
        if let Commands::Render { role, set, .. } = &mut command {
            *role = Some("Greeter".to_string());
            *set = vec!["name=Ada".to_string()];
        }
        let cli = make_cli(temp_dir.path().join("store"), command);
        let output = execute(&cli).expect("render");
        assert!(output.starts_with("Role:\nGreeter\n\n"));
        assert!(output.contains("Instructions:\nGreet Ada."));
    }

    #[test]
    fn test_cmd_render_unset_variable_stays_visible() {
        let temp_dir = TempDir::new().expect("temp dir");
        let cli = make_cli(
            temp_dir.path().join("store"),
            render_command("Greet {{name}}."),
        );
        let output = execute(&cli).expect("render");
        assert!(output.contains("Greet {{name}}."));
    }

    #[test]
    fn test_cmd_render_builtin_template_with_topic() {
        let temp_dir = TempDir::new().expect("temp dir");
        let mut command = render_command("");
        if let Commands::Render {
            instructions,
            template,
            topics,
            ..
        } = &mut command
        {
            *instructions = None;
            *template = Some("Learning Assistant".to_string());
            *topics = vec!["Pedagogy".to_string()];
        }
        let cli = make_cli(temp_dir.path().join("store"), command);
        let output = execute(&cli).expect("render");
        assert!(output.contains("Role:\nPatient Tutor"));
        assert!(output.contains("Topics:\n- Pedagogy"));
        assert!(output.contains("Explain the concept of {{concept}}"));
    }

    #[test]
    fn test_cmd_render_knowledge_retrieval() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = write_knowledge_file(
            temp_dir.path(),
            "facts.txt",
            "Apples are red. Bananas are yellow.",
        );

        let mut command = render_command("Describe apples.");
        if let Commands::Render { knowledge, .. } = &mut command {
            *knowledge = vec![file];
        }
        let cli = make_cli(temp_dir.path().join("store"), command);
        let output = execute(&cli).expect("render");
        assert!(output.contains("Knowledge Sources (Retrieved):"));
        assert!(output.contains("[Source: facts.txt]"));
    }

    #[test]
    fn test_cmd_render_no_retrieval_lists_sources() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = write_knowledge_file(temp_dir.path(), "facts.txt", "Apples are red.");

        let mut command = render_command("Describe apples.");
        if let Commands::Render {
            knowledge,
            no_retrieval,
            ..
        } = &mut command
        {
            *knowledge = vec![file];
            *no_retrieval = true;
        }
        let cli = make_cli(temp_dir.path().join("store"), command);
        let output = execute(&cli).expect("render");
        assert!(output.contains("- facts.txt (Text)"));
        assert!(output.contains("Content Snippet: Apples are red."));
    }

    #[test]
    fn test_cmd_render_to_output_file() {
        let temp_dir = TempDir::new().expect("temp dir");
        let out_path = temp_dir.path().join("prompt.txt");

        let mut command = render_command("Do the thing.");
        if let Commands::Render { output, .. } = &mut command {
            *output = Some(out_path.clone());
        }
        let cli = make_cli(temp_dir.path().join("store"), command);
        let message = execute(&cli).expect("render");
        assert!(message.contains("Wrote prompt to"));
        let written = std::fs::read_to_string(&out_path).expect("read output");
        assert_eq!(written, "Instructions:\nDo the thing.");
    }

    #[test]
    fn test_cmd_render_form_file() {
        let temp_dir = TempDir::new().expect("temp dir");
        let form_json = r#"{
            "instructions": "Answer questions about {{topic}}.",
            "role": "Historian",
            "examples": [
                {"input": "Who wrote the first program?", "output": "Ada Lovelace."}
            ],
            "reasoning": {"effort": "high", "strategies": ["chain_of_thought"]},
            "variables": {"topic": "early computing"}
        }"#;
        let form_path = write_knowledge_file(temp_dir.path(), "form.json", form_json);

        let mut command = render_command("");
        if let Commands::Render {
            instructions, form, ..
        } = &mut command
        {
            *instructions = None;
            *form = Some(form_path);
        }
        let cli = make_cli(temp_dir.path().join("store"), command);
        let output = execute(&cli).expect("render");
        assert!(output.starts_with("Role:\nHistorian\n\n"));
        assert!(output.contains("Few-Shot Examples:"));
        assert!(output.contains("Example 1:\nUser: Who wrote the first program?"));
        assert!(output.contains("Assistant: Ada Lovelace."));
        assert!(output.contains("Reasoning Configuration:\n[Reasoning Effort: High]"));
        assert!(output.contains("Think step-by-step."));
        assert!(output.contains("Instructions:\nAnswer questions about early computing."));
    }

    #[test]
    fn test_cmd_render_form_flags_override() {
        let temp_dir = TempDir::new().expect("temp dir");
        let form_json = r#"{"instructions": "Do the work.", "role": "Scribe"}"#;
        let form_path = write_knowledge_file(temp_dir.path(), "form.json", form_json);

        let mut command = render_command("");
        if let Commands::Render {
            instructions,
            form,
            role,
            set,
            ..
        } = &mut command
        {
            *instructions = None;
            *form = Some(form_path);
            *role = Some("Archivist".to_string());
            *set = vec!["topic=ledgers".to_string()];
        }
        let cli = make_cli(temp_dir.path().join("store"), command);
        let output = execute(&cli).expect("render");
        assert!(output.starts_with("Role:\nArchivist\n\n"));
        assert!(output.contains("Instructions:\nDo the work."));
    }

    #[test]
    fn test_cmd_render_requires_instructions() {
        let temp_dir = TempDir::new().expect("temp dir");
        let mut command = render_command("");
        if let Commands::Render { instructions, .. } = &mut command {
            *instructions = None;
        }
        let cli = make_cli(temp_dir.path().join("store"), command);
        assert!(execute(&cli).is_err());
    }

    #[test]
    fn test_cmd_vars() {
        let temp_dir = TempDir::new().expect("temp dir");
        let cli = make_cli(
            temp_dir.path().join("store"),
            Commands::Vars {
                instructions: Some("{{a}} and {{b}} and {{a}}".to_string()),
                template: None,
                file: None,
            },
        );
        let output = execute(&cli).expect("vars");
        assert!(output.contains("2 variables:"));
        assert!(output.contains("{{a}}"));
        assert!(output.contains("{{b}}"));
    }

    #[test]
    fn test_cmd_template_lifecycle() {
        let temp_dir = TempDir::new().expect("temp dir");
        let store_dir = temp_dir.path().join("store");

        // Builtins are listed before anything is saved.
        let cli = make_cli(store_dir.clone(), Commands::Template(TemplateCommands::List));
        let output = execute(&cli).expect("list");
        assert!(output.contains("Customer Support Agent"));

        // Save a new template.
        let cli = make_cli(
            store_dir.clone(),
            Commands::Template(TemplateCommands::Save {
                name: "Ad Writer".to_string(),
                content: Some("Sell {{product}}.".to_string()),
                file: None,
                role: "Copywriter".to_string(),
                goal: String::new(),
            }),
        );
        execute(&cli).expect("save");

        // Show it back.
        let cli = make_cli(
            store_dir.clone(),
            Commands::Template(TemplateCommands::Show {
                name: "Ad Writer".to_string(),
            }),
        );
        let output = execute(&cli).expect("show");
        assert!(output.contains("Role: Copywriter"));
        assert!(output.contains("Sell {{product}}."));

        // Saving materialized the builtins alongside it.
        let cli = make_cli(store_dir.clone(), Commands::Template(TemplateCommands::List));
        let output = execute(&cli).expect("list");
        assert!(output.contains("Ad Writer"));
        assert!(output.contains("Code Reviewer"));

        // Delete it.
        let cli = make_cli(
            store_dir.clone(),
            Commands::Template(TemplateCommands::Delete {
                name: "Ad Writer".to_string(),
            }),
        );
        execute(&cli).expect("delete");

        let cli = make_cli(
            store_dir,
            Commands::Template(TemplateCommands::Show {
                name: "Ad Writer".to_string(),
            }),
        );
        assert!(execute(&cli).is_err());
    }

    #[test]
    fn test_cmd_template_delete_missing() {
        let temp_dir = TempDir::new().expect("temp dir");
        let cli = make_cli(
            temp_dir.path().join("store"),
            Commands::Template(TemplateCommands::Delete {
                name: "Nonexistent".to_string(),
            }),
        );
        assert!(execute(&cli).is_err());
    }

    #[test]
    fn test_cmd_template_list_json() {
        let temp_dir = TempDir::new().expect("temp dir");
        let cli = make_cli_json(
            temp_dir.path().join("store"),
            Commands::Template(TemplateCommands::List),
        );
        let output = execute(&cli).expect("list");
        assert!(output.contains("\"name\": \"Customer Support Agent\""));
    }

    #[test]
    fn test_cmd_topic_lifecycle() {
        let temp_dir = TempDir::new().expect("temp dir");
        let store_dir = temp_dir.path().join("store");

        let cli = make_cli(store_dir.clone(), Commands::Topic(TopicCommands::List));
        let output = execute(&cli).expect("list");
        assert!(output.contains("topic_pedagogy"));

        let cli = make_cli(
            store_dir.clone(),
            Commands::Topic(TopicCommands::Add {
                title: "Legal Review".to_string(),
                description: "Contract review standards.".to_string(),
                scope: "Applies to legal documents.".to_string(),
                instructions: vec!["Flag ambiguous clauses.".to_string()],
                actions: vec!["CiteClause".to_string()],
            }),
        );
        let output = execute(&cli).expect("add");
        assert!(output.contains("topic_legal_review"));

        let cli = make_cli(
            store_dir.clone(),
            Commands::Topic(TopicCommands::Show {
                topic: "Legal Review".to_string(),
            }),
        );
        let output = execute(&cli).expect("show");
        assert!(output.contains("Flag ambiguous clauses."));
        assert!(output.contains("Actions: CiteClause"));

        let cli = make_cli(
            store_dir.clone(),
            Commands::Topic(TopicCommands::Delete {
                topic: "topic_legal_review".to_string(),
            }),
        );
        execute(&cli).expect("delete");

        let cli = make_cli(
            store_dir,
            Commands::Topic(TopicCommands::Show {
                topic: "Legal Review".to_string(),
            }),
        );
        assert!(execute(&cli).is_err());
    }
}
