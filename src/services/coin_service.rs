use tracing::info;

use crate::errors::AppError;
use crate::models::{
    seed_from_string, AssetMeta, Coin, CoinsResponse, MarketState, TimeRange, KNOWN_ASSETS,
};
use crate::services::price_generator;
use crate::services::schema::validate_coins_response;

/// Builds one coin against the shared market state.
pub fn build_coin(asset: &AssetMeta, market: &MarketState, range: TimeRange, now_ms: i64) -> Coin {
    let base = market.base_price(asset.id).unwrap_or(asset.base_price);
    let seed = seed_from_string(asset.id);

    let history = price_generator::generate_history(base, seed, market, range, now_ms);
    let current_price = price_generator::current_price(base, seed, market, range, now_ms);
    let market_cap = price_generator::market_cap(current_price, asset);

    Coin {
        id: asset.id.to_string(),
        symbol: asset.symbol.to_string(),
        name: asset.name.to_string(),
        current_price,
        price_change_24h: price_generator::change_24h(base, seed, market, range, now_ms),
        market_cap,
        total_volume: price_generator::total_volume(market_cap, asset, seed, market, now_ms),
        history,
    }
}

/// Coins for the requested ids, in catalogue order, schema-checked.
///
/// `ids` must already be trimmed and non-empty; unknown ids are skipped and
/// `NotFound` is returned only when none match.
pub fn get_coins(
    ids: &[String],
    market: &MarketState,
    range: TimeRange,
    now_ms: i64,
) -> Result<CoinsResponse, AppError> {
    let coins: Vec<Coin> = KNOWN_ASSETS
        .iter()
        .filter(|asset| ids.iter().any(|id| id == asset.id))
        .map(|asset| build_coin(asset, market, range, now_ms))
        .collect();

    if coins.is_empty() {
        return Err(AppError::NotFound(format!(
            "No coins found for IDs: {}",
            ids.join(", ")
        )));
    }

    let response = CoinsResponse { coins };
    validate_coins_response(&response)?;
    info!("Generated {} coins for range {}", response.coins.len(), range);
    Ok(response)
}
