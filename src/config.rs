//! Environment-driven settings
//!
//! The binary loads `.env` first; everything here reads plain env vars.

use crate::error::AdvisorError;
use crate::models::Domain;
use crate::Result;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_EMBEDDING_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 15;
pub const DEFAULT_INTENT_WINDOW: usize = 5;

#[derive(Debug, Clone)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub embedding_base_url: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub database_url: Option<String>,
    pub card_table: String,
    pub card_corpus_path: Option<PathBuf>,
    pub recommendation_limit: usize,
    pub recommendation_timeout: Duration,
    pub intent_window: usize,
    pub intent_priority: Vec<Domain>,
    pub prefetch_base_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            embedding_base_url: DEFAULT_EMBEDDING_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dimension: DEFAULT_EMBEDDING_DIMENSION,
            database_url: None,
            card_table: "cards".to_string(),
            card_corpus_path: None,
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            recommendation_timeout: Duration::from_secs(20),
            intent_window: DEFAULT_INTENT_WINDOW,
            intent_priority: Domain::ALL.to_vec(),
            prefetch_base_url: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            embedding_base_url: non_empty_var("EMBEDDING_BASE_URL")
                .unwrap_or(defaults.embedding_base_url),
            embedding_model: non_empty_var("EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            embedding_dimension: parsed_var("EMBEDDING_DIMENSION")?
                .unwrap_or(defaults.embedding_dimension),
            database_url: non_empty_var("POSTGRES_URL").or_else(|| non_empty_var("DATABASE_URL")),
            card_table: non_empty_var("CARD_TABLE").unwrap_or(defaults.card_table),
            card_corpus_path: non_empty_var("CARD_CORPUS_PATH").map(PathBuf::from),
            recommendation_limit: parsed_var("RECOMMENDATION_LIMIT")?
                .unwrap_or(defaults.recommendation_limit),
            recommendation_timeout: parsed_var::<u64>("RECOMMENDATION_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.recommendation_timeout),
            intent_window: parsed_var("INTENT_WINDOW")?.unwrap_or(defaults.intent_window),
            intent_priority: match non_empty_var("INTENT_PRIORITY") {
                Some(raw) => parse_priority(&raw)?,
                None => defaults.intent_priority,
            },
            prefetch_base_url: non_empty_var("PREFETCH_BASE_URL"),
        })
    }

    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| AdvisorError::Config("DATABASE_URL is required".to_string()))
    }
}

/// Parse a comma-separated domain order such as `hotel,flight,shopping`.
///
/// Domains left out keep their default relative order after the listed ones.
pub fn parse_priority(raw: &str) -> Result<Vec<Domain>> {
    let mut order = Vec::with_capacity(Domain::ALL.len());

    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let domain = Domain::parse(part).ok_or_else(|| {
            AdvisorError::Config(format!("INTENT_PRIORITY: unknown domain '{}'", part))
        })?;
        if !order.contains(&domain) {
            order.push(domain);
        }
    }

    for domain in Domain::ALL {
        if !order.contains(&domain) {
            order.push(domain);
        }
    }

    Ok(order)
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty_var(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| AdvisorError::Config(format!("{}: {}", key, e))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_priority_fills_missing_domains() {
        let order = parse_priority("shopping, hotel").unwrap();
        assert_eq!(order, vec![Domain::Shopping, Domain::Hotel, Domain::Flight]);
    }

    #[test]
    fn test_parse_priority_rejects_unknown() {
        let err = parse_priority("flight,cars").unwrap_err();
        assert!(err.to_string().contains("cars"));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.recommendation_limit, 15);
        assert_eq!(settings.intent_window, 5);
        assert_eq!(settings.intent_priority, Domain::ALL.to_vec());
        assert!(settings.require_database_url().is_err());
    }
}
