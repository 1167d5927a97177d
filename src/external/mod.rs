pub mod coins_api;
pub mod coins_fetcher;
