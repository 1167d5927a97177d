mod asset;
mod coin;
mod market_state;
mod time_range;

pub use asset::{find_asset, smoothing_factor_for_symbol, AssetMeta, KNOWN_ASSETS};
pub use coin::{Coin, CoinHistoryPoint, CoinsParams, CoinsResponse};
pub use market_state::{initial_base_prices, seed_from_string, seed_from_time, MarketState};
pub use time_range::{RangeConfig, TimeRange};
