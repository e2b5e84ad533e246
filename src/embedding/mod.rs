//! Embedding client abstraction and adapters.
//!
//! The résumé index consumes embeddings through [`Embedder`], which is decided once at startup:
//! either a configured provider or `Disabled`, in which case every text maps to the empty
//! vector and ranking falls back to keyword overlap.

mod ollama;
mod openai;

use crate::config::{Config, EmbeddingProvider};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use ollama::OllamaEmbeddingClient;
pub use openai::OpenAiEmbeddingClient;

/// Errors raised by embedding providers.
#[derive(Debug, Error)]
pub enum EmbeddingClientError {
    /// Provider was unable to produce embeddings for the supplied input.
    #[error("Failed to generate embeddings: {0}")]
    GenerationFailed(String),
    /// Provider could not be reached or could not be set up.
    #[error("Embedding provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider response could not be parsed.
    #[error("Malformed embedding response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by embedding backends.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Produce an embedding vector for each supplied chunk of text.
    async fn generate_embeddings(
        &self,
        texts: Vec<String>,
    ) -> Result<Vec<Vec<f32>>, EmbeddingClientError>;
}

/// Embedding capability handed to the index: a provider, or nothing at all.
#[derive(Clone, Default)]
pub enum Embedder {
    /// No provider configured; every text embeds to the empty vector without network access.
    #[default]
    Disabled,
    /// Configured provider; failures propagate to the caller.
    Provider(Arc<dyn EmbeddingClient>),
}

impl Embedder {
    /// Wrap a concrete client.
    pub fn provider(client: impl EmbeddingClient + 'static) -> Self {
        Self::Provider(Arc::new(client))
    }

    /// Build the capability described by the configuration.
    pub fn from_config(config: &Config) -> Result<Self, EmbeddingClientError> {
        match config.embedding_provider {
            None => Ok(Self::Disabled),
            Some(EmbeddingProvider::OpenAI) => {
                let api_key = config.openai_api_key.clone().ok_or_else(|| {
                    EmbeddingClientError::ProviderUnavailable("OPENAI_API_KEY is not set".into())
                })?;
                Ok(Self::provider(OpenAiEmbeddingClient::new(
                    &config.openai_base_url,
                    &api_key,
                    &config.embedding_model,
                )?))
            }
            Some(EmbeddingProvider::Ollama) => Ok(Self::provider(OllamaEmbeddingClient::new(
                &config.ollama_url,
                &config.embedding_model,
            )?)),
        }
    }

    /// Whether a provider is configured.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Provider(_))
    }

    /// Embed a single text. `Disabled` yields the empty vector.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingClientError> {
        match self {
            Self::Disabled => Ok(Vec::new()),
            Self::Provider(client) => client
                .generate_embeddings(vec![text.to_string()])
                .await?
                .pop()
                .ok_or_else(|| {
                    EmbeddingClientError::InvalidResponse("provider returned no vectors".into())
                }),
        }
    }
}

impl std::fmt::Debug for Embedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => f.write_str("Embedder::Disabled"),
            Self::Provider(_) => f.write_str("Embedder::Provider"),
        }
    }
}
