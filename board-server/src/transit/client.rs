//! Transit backend HTTP client.

use serde::de::DeserializeOwned;

use crate::domain::{FeedId, StationId};

use super::error::TransitError;
use super::source::DepartureSource;
use super::types::{StopDeparture, TrainDeparture};

/// Default base URL of the transit backend.
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Configuration for the transit client.
#[derive(Debug, Clone)]
pub struct TransitConfig {
    /// Base URL for the backend
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TransitConfig {
    /// Create a config pointing at the default local backend.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Transit backend client.
#[derive(Debug, Clone)]
pub struct TransitClient {
    http: reqwest::Client,
    base_url: String,
}

impl TransitClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TransitConfig) -> Result<Self, TransitError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with `query` and decode a JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TransitError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            let what = query
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&");
            return Err(TransitError::NotFound(what));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransitError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TransitError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl DepartureSource for TransitClient {
    async fn stop_departures(&self, feed: &FeedId) -> Result<Vec<StopDeparture>, TransitError> {
        self.get_json("/departures", &[("stopId", feed.as_str())])
            .await
    }

    async fn train_departures(
        &self,
        station: &StationId,
    ) -> Result<Vec<TrainDeparture>, TransitError> {
        self.get_json("/train/departures", &[("station", station.as_str())])
            .await
    }
}
