//! MBTA v3 HTTP client.
//!
//! Provides async methods for the `/predictions` and `/schedules`
//! endpoints. Handles the optional API key, bounds concurrent requests,
//! and unwraps the JSON:API envelope.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use crate::board::TransitClient;
use crate::domain::DirectionId;

use super::error::MbtaError;
use super::types::{Candidate, CandidateResponse};

/// Default base URL for the MBTA v3 API.
pub(crate) const DEFAULT_BASE_URL: &str = "https://api-v3.mbta.com";

/// Default maximum concurrent requests.
pub(crate) const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default request timeout. A hung upstream must not stall a request.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Records requested per call. The board shows at most three.
const PAGE_LIMIT: &str = "10";

const PREDICTIONS_PATH: &str = "predictions";
const SCHEDULES_PATH: &str = "schedules";

/// Configuration for the MBTA client.
#[derive(Debug, Clone)]
pub struct MbtaConfig {
    /// API key sent as `x-api-key`. The API works without one, at a lower
    /// rate limit.
    pub api_key: Option<String>,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MbtaConfig {
    /// Create a config pointing at production with no API key.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for MbtaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// MBTA v3 API client.
///
/// Cheap to clone; clones share the connection pool and request limiter.
#[derive(Debug, Clone)]
pub struct MbtaClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl MbtaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: MbtaConfig) -> Result<Self, MbtaError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| MbtaError::NotConfigured("invalid API key format".to_string()))?;
            headers.insert(HeaderName::from_static("x-api-key"), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Fetch records from one endpoint, filtered to a route/stop/direction.
    ///
    /// Returns the `data` array of the response.
    async fn fetch(
        &self,
        path: &str,
        route_id: &str,
        stop_id: &str,
        direction: DirectionId,
    ) -> Result<Vec<Candidate>, MbtaError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| MbtaError::Transport("request limiter closed".to_string()))?;

        let url = format!("{}/{}", self.base_url, path);
        let direction = direction.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("filter[route]", route_id),
                ("filter[stop]", stop_id),
                ("filter[direction_id]", direction.as_str()),
                ("sort", "arrival_time"),
                ("page[limit]", PAGE_LIMIT),
            ])
            .send()
            .await
            .map_err(|e| {
                error!(%url, error = %e, "MBTA request failed");
                MbtaError::from(e)
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MbtaError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(200).collect();
            warn!(%url, status = status.as_u16(), %body, "MBTA returned an error status");
            return Err(MbtaError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;

        let parsed: CandidateResponse =
            serde_json::from_str(&body).map_err(|e| MbtaError::Json {
                message: e.to_string(),
            })?;

        debug!(%url, records = parsed.data.len(), "MBTA response");
        Ok(parsed.data)
    }
}

impl TransitClient for MbtaClient {
    fn fetch_predictions(
        &self,
        route_id: &str,
        stop_id: &str,
        direction: DirectionId,
    ) -> impl Future<Output = Result<Vec<Candidate>, MbtaError>> + Send {
        self.fetch(PREDICTIONS_PATH, route_id, stop_id, direction)
    }

    fn fetch_schedules(
        &self,
        route_id: &str,
        stop_id: &str,
        direction: DirectionId,
    ) -> impl Future<Output = Result<Vec<Candidate>, MbtaError>> + Send {
        self.fetch(SCHEDULES_PATH, route_id, stop_id, direction)
    }
}
