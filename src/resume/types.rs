//! Core data types and error definitions for the résumé pipeline.

use crate::embedding::EmbeddingClientError;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while turning a file into raw text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Source file does not exist.
    #[error(
        "Resume not found at \"{}\". Put your file in data/resume.pdf (or .docx/.txt/.md) or set RESUME_PATH.",
        path.display()
    )]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },
    /// File extension is not one of the accepted formats.
    #[error("Unsupported resume type \"{extension}\". Use .pdf (text-based), .docx, .txt, or .md.")]
    UnsupportedFormat {
        /// Lower-cased extension including the leading dot, or empty when absent.
        extension: String,
    },
    /// PDF has no usable text layer (most likely a scan).
    #[error(
        "Your PDF appears to have no extractable text (probably scanned). Export a text-based PDF or provide a .docx/.txt/.md instead."
    )]
    NoExtractableText,
    /// Reading the file failed.
    #[error("Failed to read resume: {0}")]
    Io(#[from] std::io::Error),
    /// PDF reader rejected the document.
    #[error("Failed to extract PDF text: {0}")]
    Pdf(String),
    /// DOCX archive could not be read.
    #[error("Failed to extract DOCX text: {0}")]
    Docx(String),
}

/// Errors raised while building or querying the index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A configured embedding provider failed.
    #[error("Embedding provider failure: {0}")]
    Embedding(#[from] EmbeddingClientError),
}

/// Errors surfaced by [`crate::resume::ResumeService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Extraction of the source document failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// Index construction or a query failed.
    #[error(transparent)]
    Index(#[from] IndexError),
    /// Embedding capability could not be set up.
    #[error(transparent)]
    Embedding(#[from] EmbeddingClientError),
}

/// One titled block of the résumé.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Whitespace-normalized heading line.
    pub title: String,
    /// Whitespace-normalized body up to the next heading.
    pub content: String,
}

impl Section {
    /// Searchable chunk text for this section.
    pub fn to_chunk(&self) -> String {
        format!("{}\n{}", self.title, self.content)
    }
}

/// Parsed form of the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    /// Canonical lines joined with newlines.
    pub text: String,
    /// Markdown rendering: a header followed by one bullet per line.
    pub markdown: String,
    /// Sections in document order.
    pub sections: Vec<Section>,
}

/// Ranked query result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snippet {
    /// Chunk text.
    pub text: String,
    /// Cosine similarity or keyword overlap, depending on the ranking path.
    pub score: f64,
}

/// Evidence behind a latest-role answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleEvidence {
    /// Job title line.
    pub title: String,
    /// Company line.
    pub company: String,
    /// Date range line.
    pub dates: String,
    /// Index of the date line in the canonical line sequence.
    pub idx: usize,
}

/// Answer produced by the latest-role heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestRole {
    /// Rendered answer.
    pub sentence: String,
    /// Extracted fields.
    pub evidence: RoleEvidence,
}

/// Result of [`crate::resume::ResumeService::answer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    /// Heuristic answer with evidence.
    Synthesized {
        /// Rendered sentence.
        answer: String,
        /// Fields behind the sentence.
        evidence: RoleEvidence,
    },
    /// No direct answer; top-ranked snippets instead.
    Snippets {
        /// Always `None`; serialized as `null`.
        answer: Option<String>,
        /// Ranked chunks.
        snippets: Vec<Snippet>,
    },
}
