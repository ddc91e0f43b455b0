//! AdGuard Home API client

use aghamon_common::{AdguardConfig, ClientsResponse, StatsResponse};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client for the AdGuard Home control API.
///
/// Holds the immutable connection settings and a pooled HTTP client.
/// Every dashboard request triggers a fresh fetch; nothing is cached.
pub struct AdguardClient {
    http: reqwest::Client,
    config: AdguardConfig,
}

/// Errors from talking to the appliance
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to AdGuard Home failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to decode AdGuard Home response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AdguardClient {
    pub fn new(config: AdguardConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch the client list from `GET /control/clients`
    pub async fn fetch_clients(&self) -> Result<ClientsResponse, FetchError> {
        self.fetch("clients").await
    }

    /// Fetch aggregate statistics from `GET /control/stats`
    pub async fn fetch_stats(&self) -> Result<StatsResponse, FetchError> {
        self.fetch("stats").await
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, FetchError> {
        let url = self.control_url(endpoint);
        debug!("Fetching {}", url);

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(
                reqwest::header::REFERER,
                format!("{}/", self.config.server_url),
            )
            .send()
            .await?;

        // The status code is deliberately not checked: a non-JSON error
        // body surfaces as a decode failure below.
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn control_url(&self, endpoint: &str) -> String {
        format!("{}/control/{}", self.config.server_url, endpoint)
    }
}
