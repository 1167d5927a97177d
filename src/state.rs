use std::sync::Arc;

use crate::store::MarketStore;

#[derive(Clone)]
pub struct AppState {
    pub market: Arc<MarketStore>,
}

impl AppState {
    pub fn new(market: MarketStore) -> Self {
        Self { market: Arc::new(market) }
    }
}
