//! pgvector-backed card store
//!
//! The pool connects lazily and the schema probe runs on first use. A failed
//! probe leaves the cell empty, so the next request tries again.

use crate::error::AdvisorError;
use crate::models::CardRecord;
use crate::retrieval::VectorRetriever;
use crate::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

pub struct PgCardStore {
    pool: PgPool,
    table: String,
    schema_ready: Arc<OnceCell<()>>,
}

impl PgCardStore {
    /// Build the store without touching the network.
    pub fn connect_lazy(database_url: &str, table: &str) -> Result<Self> {
        let table = qualified_table(table)?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)
            .map_err(|e| AdvisorError::Config(format!("invalid database url: {}", e)))?;

        info!(table = %table, "Card store backend: postgres (lazy)");

        Ok(Self {
            pool,
            table,
            schema_ready: Arc::new(OnceCell::new()),
        })
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.schema_ready
            .get_or_try_init(|| async {
                let has_vector: Option<(i32,)> =
                    sqlx::query_as("SELECT 1 FROM pg_extension WHERE extname = 'vector'")
                        .fetch_optional(&self.pool)
                        .await?;

                if has_vector.is_none() {
                    return Err(AdvisorError::RetrievalUnavailable(
                        "pgvector extension is not installed".to_string(),
                    ));
                }

                let (exists,): (bool,) =
                    sqlx::query_as("SELECT to_regclass($1) IS NOT NULL")
                        .bind(&self.table)
                        .fetch_one(&self.pool)
                        .await?;

                if !exists {
                    return Err(AdvisorError::RetrievalUnavailable(format!(
                        "card table {} does not exist",
                        self.table
                    )));
                }

                Ok::<(), AdvisorError>(())
            })
            .await
            .map_err(|e| match e {
                AdvisorError::DatabaseError(db) => {
                    warn!("Card store schema probe failed: {}", db);
                    AdvisorError::RetrievalUnavailable(format!("card store unreachable: {}", db))
                }
                other => other,
            })?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct CardRow {
    card_id: String,
    issuer: String,
    name: String,
    annual_fee: f64,
    min_credit_score: Option<i32>,
    min_income: Option<f64>,
    reward_rates: Option<Json<BTreeMap<String, f64>>>,
    benefits: Option<Vec<String>>,
}

impl From<CardRow> for CardRecord {
    fn from(row: CardRow) -> Self {
        CardRecord {
            card_id: row.card_id,
            issuer: row.issuer,
            name: row.name,
            annual_fee: row.annual_fee,
            // Out-of-range scores are treated as missing.
            min_credit_score: row.min_credit_score.and_then(|s| u16::try_from(s).ok()),
            min_income: row.min_income,
            reward_rates: row.reward_rates.map(|j| j.0).unwrap_or_default(),
            benefits: row
                .benefits
                .unwrap_or_default()
                .into_iter()
                .collect::<BTreeSet<_>>(),
        }
    }
}

#[async_trait]
impl VectorRetriever for PgCardStore {
    async fn retrieve(&self, query: &[f32], limit: usize) -> Result<Vec<CardRecord>> {
        self.ensure_schema().await?;

        // Projection never names the embedding column.
        let sql = format!(
            "SELECT card_id, issuer, name, annual_fee, min_credit_score, min_income, \
             reward_rates, benefits \
             FROM {} \
             ORDER BY embedding <=> $1::vector \
             LIMIT $2",
            self.table
        );

        let rows: Vec<CardRow> = sqlx::query_as(&sql)
            .bind(vector_literal(query))
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!("Card similarity query failed: {}", e);
                AdvisorError::RetrievalUnavailable(format!("similarity query failed: {}", e))
            })?;

        debug!(rows = rows.len(), limit, "pgvector similarity search");

        Ok(rows.into_iter().map(CardRecord::from).collect())
    }
}

/// pgvector text input format: `[0.1,0.2,...]`.
pub fn vector_literal(values: &[f32]) -> String {
    let mut out = String::with_capacity(values.len() * 10 + 2);
    out.push('[');
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", v);
    }
    out.push(']');
    out
}

/// Quote `schema.table` or `table`; only identifier characters are allowed.
fn qualified_table(raw: &str) -> Result<String> {
    let parts: Vec<&str> = raw.trim().split('.').collect();

    let valid = !parts.is_empty()
        && parts.len() <= 2
        && parts.iter().all(|p| {
            !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });

    if !valid {
        return Err(AdvisorError::Config(format!("invalid card table name '{}'", raw)));
    }

    Ok(parts
        .iter()
        .map(|p| format!("\"{}\"", p))
        .collect::<Vec<_>>()
        .join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_literal() {
        assert_eq!(vector_literal(&[0.5, -0.25, 1.0]), "[0.5,-0.25,1]");
        assert_eq!(vector_literal(&[]), "[]");
    }

    #[test]
    fn test_qualified_table() {
        assert_eq!(qualified_table("cards").unwrap(), "\"cards\"");
        assert_eq!(qualified_table("public.cards").unwrap(), "\"public\".\"cards\"");
        assert!(qualified_table("cards; DROP TABLE x").is_err());
        assert!(qualified_table("a.b.c").is_err());
        assert!(qualified_table("").is_err());
    }

    #[test]
    fn test_row_conversion_drops_bad_score() {
        let row = CardRow {
            card_id: "c".to_string(),
            issuer: "i".to_string(),
            name: "n".to_string(),
            annual_fee: 0.0,
            min_credit_score: Some(-1),
            min_income: Some(1.0),
            reward_rates: None,
            benefits: Some(vec!["lounge".to_string()]),
        };
        let card = CardRecord::from(row);
        assert_eq!(card.min_credit_score, None);
        assert!(!card.has_eligibility_data());
        assert!(card.benefits.contains("lounge"));
    }

    #[tokio::test]
    async fn test_connect_lazy_does_not_connect() {
        let store = PgCardStore::connect_lazy("postgres://user:pw@127.0.0.1:1/cards", "cards");
        assert!(store.is_ok());
    }
}
