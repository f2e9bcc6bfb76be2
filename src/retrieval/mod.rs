//! Lexical retrieval over in-memory knowledge documents.
//!
//! Given a free-text query and a set of documents, splits each document
//! into overlapping chunks, scores every chunk against the query using
//! token overlap with a small frequency boost, and returns the top-K
//! highest-scoring chunks.
//!
//! There is no index and no persistence: chunking and scoring are
//! recomputed from scratch on every call, so results always reflect the
//! documents as supplied. Scoring is deliberately simplistic (no TF-IDF,
//! no length normalization) and must stay that way for behavioral
//! compatibility with downstream consumers of the scores.

use crate::chunking::{DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
use crate::core::Document;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default number of chunks to return.
pub const DEFAULT_TOP_K: usize = 3;

/// Maximum `top_k` accepted by [`RetrievalConfig::clamped`].
pub const MAX_TOP_K: usize = 10;

/// Minimum token length; shorter tokens are discarded as noise.
const MIN_TOKEN_LEN: usize = 3;

/// Weight added per extra in-chunk occurrence of a matched query token.
const FREQUENCY_BOOST: f64 = 0.2;

/// A scored chunk returned by [`retrieve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Name of the document the chunk came from.
    pub source_name: String,
    /// The chunk text, trimmed of surrounding whitespace.
    pub content: String,
    /// Relevance score; always strictly positive in returned results.
    pub score: f64,
}

/// Per-call retrieval configuration.
///
/// The core does not validate these values; callers that accept user
/// input should apply [`RetrievalConfig::clamped`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum number of chunks to return.
    pub top_k: usize,
    /// Chunk size in bytes used when splitting documents.
    pub chunk_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl RetrievalConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the top-k limit.
    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Sets the chunk size.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Returns a copy with both fields clamped to their accepted ranges
    /// (`top_k` in 1..=10, `chunk_size` in 100..=2000).
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            top_k: self.top_k.clamp(1, MAX_TOP_K),
            chunk_size: self.chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE),
        }
    }
}

/// Retrieves the most relevant chunks for a query from a set of documents.
///
/// Documents with empty content are skipped. Results are filtered to
/// strictly positive scores, sorted by score descending (ties keep
/// generation order: document order, then chunk order within a document),
/// and truncated to `config.top_k` entries.
///
/// An empty query or an empty document set yields an empty result, not an
/// error. The call is pure: no caching, no mutation of its inputs.
///
/// # Examples
///
/// ```
/// use promptforge::core::Document;
/// use promptforge::retrieval::{RetrievalConfig, retrieve};
///
/// let docs = vec![Document::from_text("colors", "Apples are red.")];
/// let results = retrieve("red apples", &docs, &RetrievalConfig::default());
/// assert_eq!(results[0].source_name, "colors");
/// ```
#[must_use]
pub fn retrieve(query: &str, documents: &[Document], config: &RetrievalConfig) -> Vec<ScoredChunk> {
    if query.is_empty() || documents.is_empty() {
        return Vec::new();
    }

    let candidates: Vec<(&str, String)> = documents
        .iter()
        .filter(|doc| !doc.content.is_empty())
        .flat_map(|doc| {
            crate::chunking::chunk_text(&doc.content, config.chunk_size, DEFAULT_OVERLAP)
                .into_iter()
                .map(move |chunk| (doc.name.as_str(), chunk))
        })
        .collect();

    // Scoring is pure per chunk; the parallel map preserves candidate
    // order, so the stable sort below keeps generation order on ties.
    let mut scored: Vec<ScoredChunk> = candidates
        .into_par_iter()
        .map(|(source_name, content)| {
            let score = calculate_score(query, &content);
            ScoredChunk {
                source_name: source_name.to_string(),
                content,
                score,
            }
        })
        .collect();

    scored.retain(|chunk| chunk.score > 0.0);
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(config.top_k);
    scored
}

/// Scores a chunk's relevance to a query.
///
/// Every query token present in the chunk adds 1 (query-side duplicates
/// count each time). Each distinct query token occurring more than once
/// in the chunk adds `(count - 1) * 0.2` on top. The score is not
/// normalized by chunk or document length.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_score(query: &str, chunk: &str) -> f64 {
    let query_tokens = tokenize(query);
    let chunk_tokens = tokenize(chunk);

    if query_tokens.is_empty() || chunk_tokens.is_empty() {
        return 0.0;
    }

    let chunk_set: HashSet<&str> = chunk_tokens.iter().map(String::as_str).collect();

    // Exact keyword overlap, counting query-side repeats.
    let mut score = query_tokens
        .iter()
        .filter(|token| chunk_set.contains(token.as_str()))
        .count() as f64;

    // Frequency boost for tokens that repeat within the chunk, applied
    // once per distinct query token to avoid over-boosting.
    let distinct: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();
    for token in distinct {
        let count = chunk_tokens.iter().filter(|t| t.as_str() == token).count();
        if count > 1 {
            score += (count - 1) as f64 * FREQUENCY_BOOST;
        }
    }

    score
}

/// Tokenizes text for scoring.
///
/// Lowercases, strips everything that is not an ASCII word character or
/// whitespace, splits on whitespace runs, and drops tokens of two
/// characters or fewer. Duplicates are retained in order.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| word.len() >= MIN_TOKEN_LEN)
        .map(ToString::to_string)
        .collect()
}
