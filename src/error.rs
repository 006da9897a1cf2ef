//! Error types for the card advisor core

use thiserror::Error;

/// Result type alias for advisor operations
pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {

    // =============================
    // Recommendation Pipeline Errors
    // =============================

    /// Embedding service failed; recovered by the fallback vector.
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// Vector store unreachable or rejected the query.
    #[error("Retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    /// Fatal to a recommendation request.
    #[error("Recommendations temporarily unavailable: {0}")]
    RecommendationUnavailable(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    // =============================
    // Chat Session Errors
    // =============================

    #[error("Chat session not found: {0}")]
    SessionNotFound(uuid::Uuid),

    #[error("Prefetch failed: {0}")]
    PrefetchFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AdvisorError {
    /// Whether the caller should show a "temporarily unavailable" signal.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            AdvisorError::RecommendationUnavailable(_) | AdvisorError::RetrievalUnavailable(_)
        )
    }
}
