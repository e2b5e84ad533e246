//! In-memory chunk index ranking by embedding similarity or keyword overlap.
//!
//! Each chunk is embedded once, in order, at build time. A query whose own embedding is
//! non-empty is ranked by cosine similarity; otherwise ranking falls back to the share of
//! distinct query tokens present in the chunk. The index is read-only after [`HybridIndex::build`].

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::embedding::Embedder;

use super::types::{IndexError, Snippet};

/// Number of snippets returned when the caller does not ask for a specific count.
pub const DEFAULT_TOP_K: usize = 5;

/// Built index over an ordered chunk sequence.
#[derive(Debug)]
pub struct HybridIndex {
    chunks: Vec<String>,
    vectors: Vec<Vec<f32>>,
    embedder: Embedder,
}

/// Ranking path taken for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingMode {
    /// Cosine similarity over embeddings.
    Embedding,
    /// Token overlap.
    Keyword,
}

impl HybridIndex {
    /// Embed every chunk sequentially. A failing provider aborts the build.
    pub async fn build(chunks: Vec<String>, embedder: Embedder) -> Result<Self, IndexError> {
        let mut vectors = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            vectors.push(embedder.embed(chunk).await?);
        }
        debug_assert_eq!(chunks.len(), vectors.len());

        tracing::info!(
            chunks = chunks.len(),
            embedded = vectors.iter().filter(|vector| !vector.is_empty()).count(),
            embeddings_enabled = embedder.is_enabled(),
            "Built resume index"
        );
        Ok(Self {
            chunks,
            vectors,
            embedder,
        })
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Whether chunks are ranked through a configured embedding provider.
    pub fn embeddings_enabled(&self) -> bool {
        self.embedder.is_enabled()
    }

    /// Return at most `k` chunks ranked for `question`, best first.
    pub async fn query(&self, question: &str, k: usize) -> Result<Vec<Snippet>, IndexError> {
        let query_vector = self.embedder.embed(question).await?;
        let mode = if query_vector.is_empty() {
            RankingMode::Keyword
        } else {
            RankingMode::Embedding
        };
        tracing::debug!(k, mode = ?mode, "Querying resume index");

        let mut scored: Vec<Snippet> = match mode {
            RankingMode::Embedding => self
                .chunks
                .iter()
                .zip(&self.vectors)
                .map(|(chunk, vector)| Snippet {
                    text: chunk.clone(),
                    score: cosine_similarity(&query_vector, vector),
                })
                .collect(),
            RankingMode::Keyword => {
                let query_tokens = tokenize(question);
                self.chunks
                    .iter()
                    .map(|chunk| Snippet {
                        text: chunk.clone(),
                        score: keyword_overlap(&query_tokens, &tokenize(chunk)),
                    })
                    .collect()
            }
        };

        // Stable sort keeps chunk order among equal scores.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Cosine similarity; zero when either vector is empty, the lengths differ, or a norm is zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Lower-cased ASCII alphanumeric runs; everything else separates tokens.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// `|Q ∩ C| / max(1, |Q|)`, bounded in `[0, 1]`.
pub fn keyword_overlap(query: &HashSet<String>, chunk: &HashSet<String>) -> f64 {
    let overlap = query.intersection(chunk).count();
    overlap as f64 / query.len().max(1) as f64
}
