//! OpenAI-compatible embeddings client
//!
//! Uses a long-lived reqwest::Client for connection pooling.
//! Never retries; one request per `embed` call.

use crate::embedding::EmbeddingProvider;
use crate::error::AdvisorError;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedder {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into().trim().to_string(),
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.into(),
            dimension,
        })
    }

    /// Newer models accept a `dimensions` override; legacy ones reject it.
    fn requested_dimensions(&self) -> Option<usize> {
        self.model
            .starts_with("text-embedding-3")
            .then_some(self.dimension)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.api_key.is_empty() {
            return Err(AdvisorError::EmbeddingUnavailable(
                "OPENAI_API_KEY not configured".to_string(),
            ));
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
            dimensions: self.requested_dimensions(),
        };

        debug!(model = %self.model, chars = text.len(), "Calling embeddings API");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Embeddings request failed: {}", e);
                AdvisorError::EmbeddingUnavailable(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Embeddings API error response: {}", body);
            return Err(AdvisorError::EmbeddingUnavailable(format!(
                "embeddings API returned {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            AdvisorError::EmbeddingUnavailable(format!("invalid embeddings response: {}", e))
        })?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .ok_or_else(|| {
                AdvisorError::EmbeddingUnavailable("embeddings API returned no data".to_string())
            })?;

        if embedding.len() != self.dimension {
            return Err(AdvisorError::EmbeddingUnavailable(format!(
                "expected {} dimensions, got {}",
                self.dimension,
                embedding.len()
            )));
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = EmbeddingRequest {
            model: "text-embedding-3-small",
            input: "Annual income: $50000.",
            dimensions: Some(1536),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("Annual income"));
        assert!(json.contains("\"dimensions\":1536"));

        let legacy = EmbeddingRequest {
            model: "text-embedding-ada-002",
            input: "x",
            dimensions: None,
        };
        assert!(!serde_json::to_string(&legacy).unwrap().contains("dimensions"));
    }

    #[test]
    fn test_dimensions_only_for_v3_models() {
        let v3 = OpenAiEmbedder::new("k", "https://example.test/v1/", "text-embedding-3-large", 3072)
            .unwrap();
        assert_eq!(v3.requested_dimensions(), Some(3072));
        assert_eq!(v3.endpoint, "https://example.test/v1/embeddings");

        let ada = OpenAiEmbedder::new("k", "https://example.test/v1", "text-embedding-ada-002", 1536)
            .unwrap();
        assert_eq!(ada.requested_dimensions(), None);
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let embedder =
            OpenAiEmbedder::new("", "https://example.test/v1", "text-embedding-3-small", 8).unwrap();
        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(err, AdvisorError::EmbeddingUnavailable(_)));
        assert!(err.to_string().to_lowercase().contains("api_key"));
    }
}
