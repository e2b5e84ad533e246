//! Résumé service tying extraction, sectioning, indexing, and the latest-role heuristic together.

use crate::{
    config::get_config,
    embedding::Embedder,
    metrics::{MetricsSnapshot, QueryMetrics},
    resume::{
        chunks::build_chunks,
        extract::extract_text,
        index::{DEFAULT_TOP_K, HybridIndex},
        latest_role::extract_latest_role,
        sections::parse_text,
        types::{Answer, IndexError, LatestRole, ParsedDocument, Section, ServiceError, Snippet},
    },
};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static LATEST_ROLE_QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)latest.*(role|job|title)").expect("question pattern compiles")
});

/// Loaded résumé plus its index.
///
/// Built once at startup; everything after [`ResumeService::load`] is read-only, so a single
/// instance can be shared through an `Arc` by the HTTP and MCP surfaces.
pub struct ResumeService {
    document: ParsedDocument,
    index: HybridIndex,
    metrics: QueryMetrics,
}

/// Abstraction over the résumé service used by external surfaces (HTTP, MCP).
#[async_trait]
pub trait ResumeApi: Send + Sync {
    /// Rank chunks for `question`; `k = None` means the default of five.
    async fn search(&self, question: &str, k: Option<usize>) -> Result<Vec<Snippet>, IndexError>;

    /// Direct answer for latest-role questions, ranked snippets otherwise.
    async fn answer(&self, question: &str) -> Result<Answer, IndexError>;

    /// Number of indexed chunks.
    fn chunk_count(&self) -> usize;

    /// Whether chunks were embedded by a provider.
    fn embeddings_enabled(&self) -> bool;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl ResumeService {
    /// Parse and index the résumé named by the global configuration.
    pub async fn from_config() -> Result<Self, ServiceError> {
        let config = get_config();
        tracing::info!(provider = config.embedding_label(), "Initializing embedding client");
        let embedder = Embedder::from_config(config)?;
        Self::load(&config.resume_path, embedder).await
    }

    /// Parse the document at `path` and build its index.
    pub async fn load(path: &Path, embedder: Embedder) -> Result<Self, ServiceError> {
        let raw = extract_text(path).await?;
        Self::from_text(&raw, embedder).await
    }

    /// Build the service from already-extracted text.
    pub async fn from_text(raw: &str, embedder: Embedder) -> Result<Self, ServiceError> {
        let document = parse_text(raw);
        let index = HybridIndex::build(build_chunks(&document), embedder).await?;
        tracing::info!(
            sections = document.sections.len(),
            chunks = index.len(),
            "Resume ready"
        );
        Ok(Self {
            document,
            index,
            metrics: QueryMetrics::new(),
        })
    }

    /// Markdown rendering of the résumé.
    pub fn markdown(&self) -> &str {
        &self.document.markdown
    }

    /// Sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.document.sections
    }

    /// Run the latest-role heuristic over the canonical text.
    pub fn latest_role(&self) -> Option<LatestRole> {
        let role = extract_latest_role(&self.document.text);
        if role.is_none() {
            tracing::debug!("Latest-role heuristic found no match");
        }
        role
    }
}

#[async_trait]
impl ResumeApi for ResumeService {
    async fn search(&self, question: &str, k: Option<usize>) -> Result<Vec<Snippet>, IndexError> {
        let hits = self
            .index
            .query(question, k.unwrap_or(DEFAULT_TOP_K))
            .await?;
        self.metrics.record_search();
        Ok(hits)
    }

    async fn answer(&self, question: &str) -> Result<Answer, IndexError> {
        if LATEST_ROLE_QUESTION.is_match(question) {
            if let Some(LatestRole { sentence, evidence }) = self.latest_role() {
                self.metrics.record_answer(true);
                return Ok(Answer::Synthesized {
                    answer: sentence,
                    evidence,
                });
            }
        }
        let snippets = self.search(question, None).await?;
        self.metrics.record_answer(false);
        Ok(Answer::Snippets {
            answer: None,
            snippets,
        })
    }

    fn chunk_count(&self) -> usize {
        self.index.len()
    }

    fn embeddings_enabled(&self) -> bool {
        self.index.embeddings_enabled()
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
