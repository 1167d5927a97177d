mod file;
mod market_store;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::MarketState;

pub use file::{FileStateRepository, MARKET_STATE_KEY};
pub use market_store::MarketStore;
pub use memory::InMemoryStateRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("market state io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("market state serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Where the market state lives between requests.
///
/// `load` returns `Ok(None)` when nothing usable is stored; implementations
/// decide what "usable" means for their medium.
#[async_trait]
pub trait StateRepository: Send + Sync {
    async fn load(&self) -> Result<Option<MarketState>, StoreError>;

    async fn save(&self, state: &MarketState) -> Result<(), StoreError>;

    async fn reset(&self) -> Result<(), StoreError>;
}
