use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Coin, TimeRange};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("rate limited")]
    RateLimited,
}

/// Anything that can answer a `(ids, range)` coin query.
#[async_trait]
pub trait CoinsFetcher: Send + Sync {
    async fn fetch_coins(&self, ids: &[String], range: TimeRange) -> Result<Vec<Coin>, FetchError>;
}
