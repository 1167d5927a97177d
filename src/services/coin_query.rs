//! Client-side coin query cache.
//!
//! `QueryClient` caches payloads per `(ids, range)` and coalesces identical
//! in-flight requests. `CoinsQuery` is the per-view handle: it keeps showing
//! the previous payload while a new key loads, so switching ranges never
//! flashes back to a loading state.

use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::external::coins_fetcher::{CoinsFetcher, FetchError};
use crate::models::{Coin, TimeRange};

pub type CoinsData = Arc<Vec<Coin>>;

type SharedFetch = Shared<BoxFuture<'static, Result<CoinsData, FetchError>>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub ids: Vec<String>,
    pub range: TimeRange,
}

impl QueryKey {
    pub fn new(ids: Vec<String>, range: TimeRange) -> Self {
        Self { ids, range }
    }
}

pub struct QueryClient {
    fetcher: Arc<dyn CoinsFetcher>,
    cache: DashMap<QueryKey, CoinsData>,
    in_flight: DashMap<QueryKey, SharedFetch>,
}

impl QueryClient {
    pub fn new(fetcher: Arc<dyn CoinsFetcher>) -> Self {
        Self {
            fetcher,
            cache: DashMap::new(),
            in_flight: DashMap::new(),
        }
    }

    pub fn cached(&self, key: &QueryKey) -> Option<CoinsData> {
        self.cache.get(key).map(|entry| entry.value().clone())
    }

    pub fn invalidate(&self, key: &QueryKey) {
        self.cache.remove(key);
    }

    /// Fetches `key`, joining a request already in flight for the same key.
    pub async fn fetch(&self, key: &QueryKey) -> Result<CoinsData, FetchError> {
        let shared = self.in_flight_for(key);
        let result = shared.clone().await;

        // Only the request we joined is cleared; a newer one may have replaced it.
        self.in_flight.remove_if(key, |_, pending| pending.ptr_eq(&shared));

        match &result {
            Ok(data) => {
                self.cache.insert(key.clone(), data.clone());
            }
            Err(e) => warn!("Coin query {:?} {} failed: {}", key.ids, key.range, e),
        }
        result
    }

    fn in_flight_for(&self, key: &QueryKey) -> SharedFetch {
        self.in_flight
            .entry(key.clone())
            .or_insert_with(|| {
                debug!("Starting coin query {:?} {}", key.ids, key.range);
                let fetcher = self.fetcher.clone();
                let key = key.clone();
                async move { fetcher.fetch_coins(&key.ids, key.range).await.map(Arc::new) }
                    .boxed()
                    .shared()
            })
            .value()
            .clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub data: Option<CoinsData>,
    pub is_loading: bool,
    pub is_fetching: bool,
    /// `data` belongs to a previous key and is shown while the current one loads.
    pub is_placeholder_data: bool,
    pub error: Option<FetchError>,
}

/// Per-view query handle keyed by `(ids, range)`.
pub struct CoinsQuery {
    client: Arc<QueryClient>,
    key: QueryKey,
    data: Option<CoinsData>,
    data_key: Option<QueryKey>,
    error: Option<FetchError>,
    needs_fetch: bool,
}

impl CoinsQuery {
    pub fn new(client: Arc<QueryClient>, ids: Vec<String>, range: TimeRange) -> Self {
        let mut query = Self {
            client,
            key: QueryKey::new(ids, range),
            data: None,
            data_key: None,
            error: None,
            needs_fetch: false,
        };
        query.sync_from_cache();
        query
    }

    /// An empty id list disables the query.
    pub fn is_enabled(&self) -> bool {
        !self.key.ids.is_empty()
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn set_params(&mut self, ids: Vec<String>, range: TimeRange) {
        let key = QueryKey::new(ids, range);
        if key == self.key {
            return;
        }
        self.key = key;
        self.error = None;
        self.sync_from_cache();
    }

    /// Loads the current key unless it is cached or disabled.
    pub async fn fetch(&mut self) -> QueryResult {
        if self.is_enabled() && self.needs_fetch {
            self.run().await;
        }
        self.result()
    }

    /// Loads the current key even when cached.
    pub async fn refetch(&mut self) -> QueryResult {
        if self.is_enabled() {
            self.run().await;
        }
        self.result()
    }

    pub fn result(&self) -> QueryResult {
        if !self.is_enabled() {
            return QueryResult {
                data: None,
                is_loading: false,
                is_fetching: false,
                is_placeholder_data: false,
                error: None,
            };
        }

        let is_fetching = self.needs_fetch;
        QueryResult {
            data: self.data.clone(),
            is_loading: is_fetching && self.data.is_none(),
            is_fetching,
            is_placeholder_data: self.data.is_some() && self.data_key.as_ref() != Some(&self.key),
            error: self.error.clone(),
        }
    }

    fn sync_from_cache(&mut self) {
        match self.client.cached(&self.key) {
            Some(data) => {
                self.data = Some(data);
                self.data_key = Some(self.key.clone());
                self.needs_fetch = false;
            }
            None => self.needs_fetch = self.is_enabled(),
        }
    }

    async fn run(&mut self) {
        match self.client.fetch(&self.key).await {
            Ok(data) => {
                self.data = Some(data);
                self.data_key = Some(self.key.clone());
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
        self.needs_fetch = false;
    }
}
