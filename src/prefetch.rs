//! Panel data prefetch
//!
//! Idempotent listing fetches fired when a panel becomes active. Callers
//! dispatch these fire-and-forget; a failure only degrades that panel.

use crate::error::AdvisorError;
use crate::models::Domain;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

#[async_trait]
pub trait Prefetcher: Send + Sync {
    async fn prefetch(&self, session_id: Uuid, domain: Domain) -> Result<()>;
}

/// Listing path per domain.
pub fn listing_path(domain: Domain) -> &'static str {
    match domain {
        Domain::Flight => "/api/flights",
        Domain::Hotel => "/api/hotels",
        Domain::Shopping => "/api/shopping",
    }
}

/// HTTP listing service client.
#[derive(Clone)]
pub struct HttpPrefetcher {
    client: Client,
    base_url: String,
}

impl HttpPrefetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, domain: Domain) -> String {
        format!("{}{}", self.base_url, listing_path(domain))
    }
}

#[async_trait]
impl Prefetcher for HttpPrefetcher {
    async fn prefetch(&self, session_id: Uuid, domain: Domain) -> Result<()> {
        let url = self.url_for(domain);

        let response = self
            .client
            .get(&url)
            .header("x-session-id", session_id.to_string())
            .send()
            .await
            .map_err(|e| {
                AdvisorError::PrefetchFailed(format!("{} listing request failed: {}", domain, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::PrefetchFailed(format!(
                "{} listing returned {}",
                domain, status
            )));
        }

        debug!(%session_id, %domain, "Prefetched panel data");
        Ok(())
    }
}

/// For deployments without a listing service.
pub struct NoopPrefetcher;

#[async_trait]
impl Prefetcher for NoopPrefetcher {
    async fn prefetch(&self, session_id: Uuid, domain: Domain) -> Result<()> {
        info!(%session_id, %domain, "Prefetch skipped (no listing service configured)");
        Ok(())
    }
}
