//! HTTP client for the text-embedding endpoint
//!
//! Speaks the Ollama `/api/embeddings` protocol: one prompt in, one vector out.
//! Failures are reported, never retried here; callers decide whether to skip or abort.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::EmbeddingConfig;
use crate::error::{Result, ShiciError};

/// Turns text into a fixed-length vector
#[async_trait]
pub trait EmbeddingService: Send + Sync {
  async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
  model: &'a str,
  prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
  embedding: Option<Vec<f32>>,
}

pub struct OllamaEmbeddingClient {
  client: Client,
  config: EmbeddingConfig,
}

impl OllamaEmbeddingClient {
  pub fn new(config: EmbeddingConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| ShiciError::embedding_request(format!("failed to create HTTP client: {e}")))?;

    Ok(Self { client, config })
  }

  pub fn model(&self) -> &str {
    &self.config.model
  }

  fn endpoint(&self) -> String {
    format!("{}/api/embeddings", self.config.base_url)
  }
}

#[async_trait]
impl EmbeddingService for OllamaEmbeddingClient {
  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    let request = EmbeddingRequest { model: &self.config.model, prompt: text };

    let response = self
      .client
      .post(self.endpoint())
      .json(&request)
      .send()
      .await
      .map_err(|e| ShiciError::embedding_request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let error_text = response.text().await.unwrap_or_default();
      return Err(ShiciError::embedding_request(format!("HTTP {status}: {error_text}")));
    }

    let body: EmbeddingResponse = response
      .json()
      .await
      .map_err(|e| ShiciError::embedding_request(format!("invalid response body: {e}")))?;

    match body.embedding {
      Some(embedding) if !embedding.is_empty() => {
        tracing::debug!(dimension = embedding.len(), "embedding generated");
        Ok(embedding)
      }
      Some(_) => Err(ShiciError::embedding_request("response carried an empty embedding")),
      None => Err(ShiciError::embedding_request("response has no 'embedding' field")),
    }
  }
}
