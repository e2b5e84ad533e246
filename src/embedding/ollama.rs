//! Ollama embeddings client issuing HTTP requests directly to the runtime.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{EmbeddingClient, EmbeddingClientError};

/// Async client for Ollama's `/api/embeddings` endpoint.
pub struct OllamaEmbeddingClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaEmbeddingClient {
    /// Build a client for the runtime at `base_url`.
    pub fn new(base_url: &str, model: &str) -> Result<Self, EmbeddingClientError> {
        let http = Client::builder()
            .user_agent("cvmcp/embeddings")
            .build()
            .map_err(|error| {
                EmbeddingClientError::ProviderUnavailable(format!(
                    "failed to build HTTP client: {error}"
                ))
            })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/embeddings", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingClient for OllamaEmbeddingClient {
    async fn generate_embeddings(
        &self,
        texts: Vec<String>,
    ) -> Result<Vec<Vec<f32>>, EmbeddingClientError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            let payload = json!({
                "model": self.model,
                "prompt": text,
            });

            let response = self
                .http
                .post(self.endpoint())
                .json(&payload)
                .send()
                .await
                .map_err(|error| {
                    EmbeddingClientError::ProviderUnavailable(format!(
                        "failed to reach Ollama at {}: {error}",
                        self.base_url
                    ))
                })?;

            if response.status() == StatusCode::NOT_FOUND {
                return Err(EmbeddingClientError::ProviderUnavailable(format!(
                    "Ollama endpoint {} returned 404",
                    self.endpoint()
                )));
            }

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(EmbeddingClientError::GenerationFailed(format!(
                    "Ollama returned {status}: {body}"
                )));
            }

            let body: OllamaResponse = response.json().await.map_err(|error| {
                EmbeddingClientError::InvalidResponse(format!(
                    "failed to decode Ollama response: {error}"
                ))
            })?;
            embeddings.push(body.embedding);
        }

        Ok(embeddings)
    }
}
