//! OpenAI-compatible embeddings client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{EmbeddingClient, EmbeddingClientError};

/// Inputs longer than this many characters are truncated before submission.
const MAX_INPUT_CHARS: usize = 8000;

/// Async client for the `/embeddings` endpoint of an OpenAI-compatible API.
pub struct OpenAiEmbeddingClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbeddingClient {
    /// Build a client for `base_url` (for example `https://api.openai.com/v1`).
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self, EmbeddingClientError> {
        if api_key.trim().is_empty() {
            return Err(EmbeddingClientError::ProviderUnavailable(
                "missing OpenAI API key".into(),
            ));
        }
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
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
        })
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiEmbeddingClient {
    async fn generate_embeddings(
        &self,
        texts: Vec<String>,
    ) -> Result<Vec<Vec<f32>>, EmbeddingClientError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in &texts {
            let request = EmbeddingRequest {
                model: &self.model,
                input: truncate_chars(text, MAX_INPUT_CHARS),
            };
            let response = self
                .http
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|error| {
                    EmbeddingClientError::ProviderUnavailable(format!(
                        "failed to reach {}: {error}",
                        self.endpoint
                    ))
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(EmbeddingClientError::GenerationFailed(format!(
                    "OpenAI returned {status}: {body}"
                )));
            }

            let body: EmbeddingResponse = response.json().await.map_err(|error| {
                EmbeddingClientError::InvalidResponse(format!(
                    "failed to decode OpenAI response: {error}"
                ))
            })?;
            let vector = body.data.into_iter().next().ok_or_else(|| {
                EmbeddingClientError::InvalidResponse("OpenAI response had no data".into())
            })?;
            embeddings.push(vector.embedding);
        }

        tracing::debug!(model = %self.model, count = embeddings.len(), "Generated embeddings");
        Ok(embeddings)
    }
}
