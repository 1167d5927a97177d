use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::models::MarketState;
use crate::store::{StateRepository, StoreError};

/// Lazily created, shared market state.
///
/// Reads after the first one go through a short read lock on the cached
/// `Arc`. Creation and reset are serialized by `init_lock` so concurrent first
/// requests agree on a single state.
pub struct MarketStore {
    repository: Arc<dyn StateRepository>,
    clock: Arc<dyn Clock>,
    cached: RwLock<Option<Arc<MarketState>>>,
    init_lock: Mutex<()>,
}

impl MarketStore {
    pub fn new(repository: Arc<dyn StateRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            cached: RwLock::new(None),
            init_lock: Mutex::new(()),
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn is_initialized(&self) -> bool {
        self.cached.read().is_some()
    }

    pub async fn get_or_create(&self) -> Result<Arc<MarketState>, StoreError> {
        if let Some(state) = self.cached() {
            return Ok(state);
        }

        let _guard = self.init_lock.lock().await;
        if let Some(state) = self.cached() {
            return Ok(state);
        }

        let state = match self.repository.load().await? {
            Some(stored) => {
                info!("Loaded market state (seed {})", stored.seed);
                stored
            }
            None => {
                let fresh = MarketState::fresh(self.clock.now_ms());
                info!("Created market state (seed {})", fresh.seed);
                self.persist(&fresh).await;
                fresh
            }
        };

        let state = Arc::new(state);
        *self.cached.write() = Some(state.clone());
        Ok(state)
    }

    /// Replaces the state wholesale.
    pub async fn reset(&self) -> Result<Arc<MarketState>, StoreError> {
        let _guard = self.init_lock.lock().await;

        self.repository.reset().await?;
        let fresh = MarketState::fresh(self.clock.now_ms());
        info!("Reset market state (seed {})", fresh.seed);
        self.persist(&fresh).await;

        let state = Arc::new(fresh);
        *self.cached.write() = Some(state.clone());
        Ok(state)
    }

    fn cached(&self) -> Option<Arc<MarketState>> {
        self.cached.read().clone()
    }

    // A failed save only costs continuity across restarts.
    async fn persist(&self, state: &MarketState) {
        if let Err(e) = self.repository.save(state).await {
            warn!("Failed to save market state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::InMemoryStateRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NOW: i64 = 1_700_000_000_000;

    struct CountingRepository {
        inner: InMemoryStateRepository,
        loads: AtomicUsize,
        saves: AtomicUsize,
    }

    #[async_trait]
    impl StateRepository for CountingRepository {
        async fn load(&self) -> Result<Option<MarketState>, StoreError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            self.inner.load().await
        }

        async fn save(&self, state: &MarketState) -> Result<(), StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(state).await
        }

        async fn reset(&self) -> Result<(), StoreError> {
            self.inner.reset().await
        }
    }

    struct FailingSaveRepository;

    #[async_trait]
    impl StateRepository for FailingSaveRepository {
        async fn load(&self) -> Result<Option<MarketState>, StoreError> {
            Ok(None)
        }

        async fn save(&self, _state: &MarketState) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }

        async fn reset(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn store_with(repo: Arc<dyn StateRepository>, clock: Arc<FixedClock>) -> MarketStore {
        MarketStore::new(repo, clock)
    }

    #[tokio::test]
    async fn test_reuses_state_across_calls() {
        let clock = Arc::new(FixedClock::new(NOW));
        let store = store_with(Arc::new(InMemoryStateRepository::new()), clock.clone());

        assert!(!store.is_initialized());
        let first = store.get_or_create().await.unwrap();
        assert!(store.is_initialized());
        clock.advance(60_000);
        let second = store.get_or_create().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.start_time, NOW);
    }

    #[tokio::test]
    async fn test_reset_replaces_state() {
        let clock = Arc::new(FixedClock::new(NOW));
        let store = store_with(Arc::new(InMemoryStateRepository::new()), clock.clone());

        let first = store.get_or_create().await.unwrap();
        clock.advance(123_457);
        let reset = store.reset().await.unwrap();
        let after = store.get_or_create().await.unwrap();

        assert_ne!(first.start_time, reset.start_time);
        assert_eq!(reset, after);
    }

    #[tokio::test]
    async fn test_prefers_stored_state() {
        let repo = Arc::new(InMemoryStateRepository::new());
        let stored = MarketState::fresh(NOW - 3_600_000);
        repo.save(&stored).await.unwrap();

        let store = store_with(repo, Arc::new(FixedClock::new(NOW)));
        assert_eq!(*store.get_or_create().await.unwrap(), stored);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_requests_agree() {
        let repo = Arc::new(CountingRepository {
            inner: InMemoryStateRepository::new(),
            loads: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
        });
        let clock = Arc::new(FixedClock::new(NOW));
        let store = Arc::new(MarketStore::new(repo.clone(), clock.clone()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                let clock = clock.clone();
                tokio::spawn(async move {
                    clock.advance(i);
                    store.get_or_create().await.unwrap()
                })
            })
            .collect();

        let states = futures::future::join_all(handles).await;
        let first = states[0].as_ref().unwrap().clone();
        for state in &states {
            assert_eq!(*state.as_ref().unwrap(), first);
        }
        assert_eq!(repo.loads.load(Ordering::SeqCst), 1);
        assert_eq!(repo.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_save_failure_does_not_fail_creation() {
        let store = store_with(Arc::new(FailingSaveRepository), Arc::new(FixedClock::new(NOW)));
        let state = store.get_or_create().await.unwrap();
        assert_eq!(state.start_time, NOW);
    }
}
