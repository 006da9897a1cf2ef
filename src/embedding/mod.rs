//! Text embedding seam
//!
//! The pipeline only needs `text -> Vec<f32>` of a fixed dimension.
//! Any failure is reported as `EmbeddingUnavailable`; the pipeline decides
//! what to do about it.

use crate::Result;
use async_trait::async_trait;

pub mod fallback;
pub mod openai;

pub use fallback::random_query_vector;
pub use openai::OpenAiEmbedder;

/// Trait for embedding backends
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed `text` into a vector of length `dimension()`.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn dimension(&self) -> usize;
}
