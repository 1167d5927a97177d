use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;
use url::Url;

use crate::external::coins_fetcher::{CoinsFetcher, FetchError};
use crate::models::{Coin, CoinsResponse, TimeRange};
use crate::services::schema::validate_coins_response;

const MAX_RETRIES: u32 = 2;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// HTTP client for `GET /api/coins`.
pub struct CoinsApiClient {
    client: reqwest::Client,
    endpoint: Url,
    retry_delay: Duration,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl CoinsApiClient {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base = Url::parse(base_url).map_err(|e| FetchError::Parse(e.to_string()))?;
        let endpoint = base
            .join("/api/coins")
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            retry_delay: RETRY_DELAY,
        })
    }

    pub fn from_env() -> Result<Self, FetchError> {
        let base_url = std::env::var("INSIGHTBOARD_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self::new(&base_url)
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    async fn fetch_once(&self, ids: &str, range: TimeRange) -> Result<Vec<Coin>, FetchError> {
        let resp = self
            .client
            .get(self.endpoint.clone())
            .query(&[("ids", ids), ("range", range.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            let message = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| {
                    format!(
                        "HTTP {}: {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown error")
                    )
                });
            return Err(FetchError::Api { status: status.as_u16(), message });
        }

        let body: CoinsResponse = resp
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;
        validate_coins_response(&body).map_err(|e| FetchError::Validation(e.to_string()))?;
        Ok(body.coins)
    }
}

#[async_trait]
impl CoinsFetcher for CoinsApiClient {
    async fn fetch_coins(&self, ids: &[String], range: TimeRange) -> Result<Vec<Coin>, FetchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids.join(",");

        let mut retry_count = 0;
        loop {
            match self.fetch_once(&joined, range).await {
                Err(FetchError::RateLimited) if retry_count < MAX_RETRIES => {
                    retry_count += 1;
                    warn!(
                        "Rate limited fetching {}, retrying in {}ms (attempt {}/{})",
                        joined,
                        self.retry_delay.as_millis(),
                        retry_count,
                        MAX_RETRIES
                    );
                    sleep(self.retry_delay).await;
                }
                other => return other,
            }
        }
    }
}
