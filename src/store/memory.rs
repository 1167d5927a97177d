use async_trait::async_trait;
use parking_lot::RwLock;

use crate::models::MarketState;
use crate::store::{StateRepository, StoreError};

/// Process-lifetime storage.
#[derive(Default)]
pub struct InMemoryStateRepository {
    state: RwLock<Option<MarketState>>,
}

impl InMemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateRepository for InMemoryStateRepository {
    async fn load(&self) -> Result<Option<MarketState>, StoreError> {
        Ok(self.state.read().clone())
    }

    async fn save(&self, state: &MarketState) -> Result<(), StoreError> {
        *self.state.write() = Some(state.clone());
        Ok(())
    }

    async fn reset(&self) -> Result<(), StoreError> {
        *self.state.write() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_reset() {
        let repo = InMemoryStateRepository::new();
        assert!(repo.load().await.unwrap().is_none());

        let state = MarketState::fresh(1_700_000_000_000);
        repo.save(&state).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(state));

        repo.reset().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());
    }
}
