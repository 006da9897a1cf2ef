//! Profile → vector → cards
//!
//! VALIDATE → ENCODE → EMBED (or FALLBACK) → RETRIEVE → DEDUPE
//!
//! Stateless and re-entrant: collaborators are shared behind `Arc`, nothing
//! is mutated per request.

use crate::config::Settings;
use crate::embedding::{random_query_vector, EmbeddingProvider, OpenAiEmbedder};
use crate::error::AdvisorError;
use crate::models::{FinancialProfile, RecommendationMode, RecommendationResult};
use crate::profile::{self, ProfileTextEncoder};
use crate::retrieval::{InMemoryCardStore, PgCardStore, VectorRetriever};
use crate::Result;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub default_limit: usize,
    pub request_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_limit: crate::config::DEFAULT_RECOMMENDATION_LIMIT,
            request_timeout: Duration::from_secs(20),
        }
    }
}

pub struct RecommendationPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    retriever: Arc<dyn VectorRetriever>,
    config: PipelineConfig,
}

impl RecommendationPipeline {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, retriever: Arc<dyn VectorRetriever>) -> Self {
        Self::with_config(embedder, retriever, PipelineConfig::default())
    }

    pub fn with_config(
        embedder: Arc<dyn EmbeddingProvider>,
        retriever: Arc<dyn VectorRetriever>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            embedder,
            retriever,
            config,
        }
    }

    /// Build collaborators from settings.
    ///
    /// Postgres is preferred when a database url is set; the pool is lazy so
    /// an unreachable store surfaces on the first request, not here. Without
    /// a database the JSON corpus at `card_corpus_path` is loaded.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let embedder = OpenAiEmbedder::new(
            settings.openai_api_key.clone().unwrap_or_default(),
            &settings.embedding_base_url,
            settings.embedding_model.clone(),
            settings.embedding_dimension,
        )?;

        let retriever: Arc<dyn VectorRetriever> = match (
            settings.database_url.as_deref(),
            settings.card_corpus_path.as_ref(),
        ) {
            (Some(url), _) => Arc::new(PgCardStore::connect_lazy(url, &settings.card_table)?),
            (None, Some(path)) => {
                let store = InMemoryCardStore::load(path).await?;
                if !store.is_empty() && store.dimension() != settings.embedding_dimension {
                    return Err(AdvisorError::Config(format!(
                        "card corpus has {} dimensions, EMBEDDING_DIMENSION is {}",
                        store.dimension(),
                        settings.embedding_dimension
                    )));
                }
                Arc::new(store)
            }
            (None, None) => {
                return Err(AdvisorError::Config(
                    "either DATABASE_URL or CARD_CORPUS_PATH is required".to_string(),
                ))
            }
        };

        Ok(Self::with_config(
            Arc::new(embedder),
            retriever,
            PipelineConfig {
                default_limit: settings.recommendation_limit,
                request_timeout: settings.recommendation_timeout,
            },
        ))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Recommend with the configured limit and timeout.
    pub async fn recommend_default(
        &self,
        profile: &FinancialProfile,
    ) -> Result<RecommendationResult> {
        self.recommend_within(profile, self.config.default_limit, self.config.request_timeout)
            .await
    }

    /// Like [`recommend`](Self::recommend), bounded by `timeout`.
    pub async fn recommend_within(
        &self,
        profile: &FinancialProfile,
        limit: usize,
        timeout: Duration,
    ) -> Result<RecommendationResult> {
        match tokio::time::timeout(timeout, self.recommend(profile, limit)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    profile_id = %profile.profile_id,
                    timeout_ms = timeout.as_millis() as u64,
                    "Recommendation request timed out"
                );
                Err(AdvisorError::RecommendationUnavailable(format!(
                    "timed out after {}ms",
                    timeout.as_millis()
                )))
            }
        }
    }

    pub async fn recommend(
        &self,
        profile: &FinancialProfile,
        limit: usize,
    ) -> Result<RecommendationResult> {
        profile::validate(profile)?;

        let limit = limit.clamp(1, MAX_LIMIT);
        let text = ProfileTextEncoder::encode(profile);
        let query_fingerprint = profile::fingerprint(&text);
        let dimension = self.embedder.dimension();

        let (vector, mode) = match self.embedder.embed(&text).await {
            Ok(vector) if vector.len() == dimension => (vector, RecommendationMode::Semantic),
            Ok(vector) => {
                warn!(
                    profile_id = %profile.profile_id,
                    expected = dimension,
                    got = vector.len(),
                    "Embedding dimension mismatch, using fallback vector"
                );
                (random_query_vector(dimension), RecommendationMode::Degraded)
            }
            Err(e) => {
                warn!(
                    profile_id = %profile.profile_id,
                    "Embedding failed, using fallback vector: {}",
                    e
                );
                (random_query_vector(dimension), RecommendationMode::Degraded)
            }
        };

        let candidates = self
            .retriever
            .retrieve(&vector, limit)
            .await
            .map_err(|e| AdvisorError::RecommendationUnavailable(e.to_string()))?;

        let returned = candidates.len();
        let mut seen = HashSet::with_capacity(returned);
        let cards: Vec<_> = candidates
            .into_iter()
            .filter(|card| card.has_eligibility_data())
            .filter(|card| seen.insert(card.card_id.clone()))
            .take(limit)
            .collect();

        if cards.len() < returned {
            debug!(
                dropped = returned - cards.len(),
                "Dropped duplicate or incomplete card records"
            );
        }

        info!(
            profile_id = %profile.profile_id,
            mode = ?mode,
            cards = cards.len(),
            limit,
            "Recommendations ready"
        );

        Ok(RecommendationResult {
            profile_id: profile.profile_id,
            cards,
            mode,
            query_fingerprint,
            limit,
            generated_at: Utc::now(),
        })
    }
}
