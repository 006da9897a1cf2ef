//! Card Advisor
//!
//! Core of a credit-card recommendation assistant:
//! - Turns a financial profile into a semantic query and retrieves the
//!   closest cards from a vector store
//! - Degrades to random-vector retrieval when embeddings are unavailable
//! - Classifies recent chat turns into flight / hotel / shopping intents
//! - Routes each chat session to the matching panel and fires prefetches
//!
//! RECOMMEND:  VALIDATE → ENCODE → EMBED | FALLBACK → RETRIEVE
//! CHAT:       MESSAGE → CLASSIFY → ROUTE → PREFETCH?

pub mod classifier;
pub mod config;
pub mod embedding;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod prefetch;
pub mod profile;
pub mod retrieval;
pub mod router;
pub mod session;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use classifier::IntentClassifier;
pub use pipeline::RecommendationPipeline;
pub use router::InterfaceRouter;
pub use session::SessionRegistry;
