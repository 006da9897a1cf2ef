//! Vector retrieval over the card corpus
//!
//! Retrievers return `CardRecord`s, which have no vector field. Stores keep
//! embeddings on their own document type and must project them out.

use crate::models::CardRecord;
use crate::Result;
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCardStore;
pub use postgres::PgCardStore;

/// Similarity search against a card store.
#[async_trait]
pub trait VectorRetriever: Send + Sync {
    /// Up to `limit` cards, most similar first, in the order the store
    /// reports them. Fails with `RetrievalUnavailable`.
    async fn retrieve(&self, query: &[f32], limit: usize) -> Result<Vec<CardRecord>>;
}
