//! HTTP embedding provider client (Ollama or OpenAI-compatible APIs).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::EmbeddingConfig;

/// Maximum characters to send per text to the embedding API.
/// nomic-embed-text has an 8 192-token context; dense text tokenises at
/// up to ~2.3 tokens/char, so 3 000 chars stays safely under the limit.
const MAX_EMBED_CHARS: usize = 3_000;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("embedding request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("embedding API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("no embedding returned")]
    Missing,
    #[error("unknown embedding provider: {0}")]
    UnknownProvider(String),
}

/// Text-to-vector service. Implementations must map every transport or
/// provider failure into `EmbedError` so callers can branch on it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Provider client backed by an Ollama or OpenAI-compatible HTTP API,
/// with a bounded per-request timeout.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    config: EmbeddingConfig,
}

impl HttpEmbeddingProvider {
    pub fn new(client: reqwest::Client, config: EmbeddingConfig) -> Self {
        Self { client, config }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    async fn embed_ollama(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let url = format!("{}/api/embed", self.config.base_url);
        let req = OllamaEmbedRequest {
            model: self.config.model.clone(),
            input: vec![text.to_string()],
            truncate: true,
        };

        let resp = self
            .client
            .post(&url)
            .timeout(self.timeout())
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(EmbedError::Api { status, body });
        }

        let body: OllamaEmbedResponse = resp.json().await?;
        body.embeddings.into_iter().next().ok_or(EmbedError::Missing)
    }

    async fn embed_openai(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let url = format!("{}/v1/embeddings", self.config.base_url);
        let api_key = self.config.api_key.as_deref().unwrap_or_default();
        let req = OpenAiEmbedRequest {
            model: self.config.model.clone(),
            input: vec![text.to_string()],
        };

        let resp = self
            .client
            .post(&url)
            .timeout(self.timeout())
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(EmbedError::Api { status, body });
        }

        let body: OpenAiEmbedResponse = resp.json().await?;
        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(EmbedError::Missing)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let text = truncate_for_embedding(text);
        match self.config.provider.as_str() {
            "ollama" => self.embed_ollama(text).await,
            "openai" => self.embed_openai(text).await,
            other => Err(EmbedError::UnknownProvider(other.to_string())),
        }
    }
}

/// Truncate `text` to at most `MAX_EMBED_CHARS`, splitting on a UTF-8
/// char boundary.
fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= MAX_EMBED_CHARS {
        return text;
    }
    let mut end = MAX_EMBED_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaEmbedRequest {
    model: String,
    input: Vec<String>,
    /// Ask Ollama to silently truncate inputs that exceed the model's
    /// context length instead of returning a 400 error.
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiEmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct OpenAiEmbedResponse {
    data: Vec<OpenAiEmbedData>,
}

#[derive(Deserialize)]
struct OpenAiEmbedData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let short = "hello";
        assert_eq!(truncate_for_embedding(short), short);

        let long = "é".repeat(MAX_EMBED_CHARS); // 2 bytes per char
        let truncated = truncate_for_embedding(&long);
        assert!(truncated.len() <= MAX_EMBED_CHARS);
        assert!(truncated.chars().all(|c| c == 'é'));
    }
}
