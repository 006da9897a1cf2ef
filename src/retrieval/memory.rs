//! In-process card store with cosine ranking

use crate::error::AdvisorError;
use crate::models::{CardDocument, CardRecord};
use crate::retrieval::VectorRetriever;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

/// Card corpus held in memory, in insertion order.
pub struct InMemoryCardStore {
    documents: Vec<CardDocument>,
    dimension: usize,
}

impl InMemoryCardStore {
    /// All documents must share one non-zero dimension.
    pub fn new(documents: Vec<CardDocument>) -> Result<Self> {
        let dimension = documents.first().map(|d| d.embedding.len()).unwrap_or(0);

        if let Some(bad) = documents
            .iter()
            .find(|d| d.embedding.is_empty() || d.embedding.len() != dimension)
        {
            return Err(AdvisorError::Config(format!(
                "card '{}' has a {}-dimension embedding, corpus expects {}",
                bad.card.card_id,
                bad.embedding.len(),
                dimension
            )));
        }

        Ok(Self {
            documents,
            dimension,
        })
    }

    /// Load a JSON array of card documents.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let documents: Vec<CardDocument> = serde_json::from_str(&raw)?;

        info!(
            path = %path.display(),
            cards = documents.len(),
            "Loaded card corpus"
        );

        Self::new(documents)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

#[async_trait]
impl VectorRetriever for InMemoryCardStore {
    async fn retrieve(&self, query: &[f32], limit: usize) -> Result<Vec<CardRecord>> {
        if self.documents.is_empty() {
            return Ok(Vec::new());
        }

        if query.len() != self.dimension {
            return Err(AdvisorError::RetrievalUnavailable(format!(
                "query has {} dimensions, store has {}",
                query.len(),
                self.dimension
            )));
        }

        let mut scored: Vec<(&CardDocument, f32)> = self
            .documents
            .iter()
            .map(|doc| (doc, cosine_similarity(query, &doc.embedding)))
            .collect();

        // Stable: equal scores keep insertion order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        debug!(candidates = scored.len(), limit, "In-memory similarity search");

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(doc, _)| doc.card.clone())
            .collect())
    }
}

/// Zero-norm vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    fn doc(id: &str, embedding: Vec<f32>) -> CardDocument {
        CardDocument {
            card: CardRecord {
                card_id: id.to_string(),
                issuer: "Acme Bank".to_string(),
                name: format!("Card {}", id),
                annual_fee: 0.0,
                min_credit_score: Some(650),
                min_income: Some(20_000.0),
                reward_rates: BTreeMap::new(),
                benefits: BTreeSet::new(),
            },
            embedding,
        }
    }

    #[tokio::test]
    async fn test_ranks_by_similarity() {
        let store = InMemoryCardStore::new(vec![
            doc("far", vec![0.0, 1.0]),
            doc("near", vec![1.0, 0.1]),
            doc("mid", vec![1.0, 1.0]),
        ])
        .unwrap();

        let ids: Vec<_> = store
            .retrieve(&[1.0, 0.0], 10)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.card_id)
            .collect();

        assert_eq!(ids, vec!["near", "mid", "far"]);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order_and_limit() {
        let store = InMemoryCardStore::new(vec![
            doc("a", vec![1.0, 0.0]),
            doc("b", vec![2.0, 0.0]),
            doc("c", vec![3.0, 0.0]),
        ])
        .unwrap();

        let ids: Vec<_> = store
            .retrieve(&[1.0, 0.0], 2)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.card_id)
            .collect();

        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_dimension_mismatch() {
        let store = InMemoryCardStore::new(vec![doc("a", vec![1.0, 0.0])]).unwrap();
        let err = store.retrieve(&[1.0, 0.0, 0.0], 5).await.unwrap_err();
        assert!(matches!(err, AdvisorError::RetrievalUnavailable(_)));
    }

    #[test]
    fn test_rejects_mixed_dimensions() {
        let result = InMemoryCardStore::new(vec![doc("a", vec![1.0]), doc("b", vec![1.0, 2.0])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cosine_zero_norm() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
