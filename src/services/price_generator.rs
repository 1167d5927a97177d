//! Deterministic synthetic price curves.
//!
//! `price(t) = base * (1 + trend(t) + volatility(t) + noise(t))` with `t` in
//! hours since the market started. The trend is shared by every asset, the
//! volatility shape is per asset and scaled by the range, and the noise is a
//! hash of its inputs. Same inputs, same prices.

use std::f64::consts::TAU;

use crate::models::{AssetMeta, CoinHistoryPoint, MarketState, TimeRange};

const HOUR_MS: f64 = 3_600_000.0;
const DAY_MS: i64 = 24 * 3_600_000;

const TREND_SLOW_AMPLITUDE: f64 = 0.06;
const TREND_SLOW_PERIOD_HOURS: f64 = 720.0;
const TREND_FAST_AMPLITUDE: f64 = 0.03;
const TREND_FAST_PERIOD_HOURS: f64 = 168.0;

const NOISE_AMPLITUDE: f64 = 0.004;
const NOISE_BUCKET_MS: i64 = 60_000;
const VOLUME_BUCKET_MS: i64 = 3_600_000;

const MIN_PRICE: f64 = 0.01;

/// Upper bound of `|price / base - 1|` for the given range.
pub fn max_relative_swing(range: TimeRange) -> f64 {
    TREND_SLOW_AMPLITUDE + TREND_FAST_AMPLITUDE + range.config().amplitude + NOISE_AMPLITUDE
}

/// History for `range`, ending at `now_ms`, oldest first.
pub fn generate_history(
    base_price: f64,
    asset_seed: u32,
    market: &MarketState,
    range: TimeRange,
    now_ms: i64,
) -> Vec<CoinHistoryPoint> {
    let cfg = range.config();
    (0..cfg.points)
        .map(|i| {
            let timestamp = now_ms - (cfg.points - 1 - i) as i64 * cfg.step_ms;
            CoinHistoryPoint {
                timestamp,
                price: price_at(base_price, asset_seed, market, range, timestamp),
            }
        })
        .collect()
}

/// Price at an arbitrary instant, rounded to the cent.
pub fn price_at(
    base_price: f64,
    asset_seed: u32,
    market: &MarketState,
    range: TimeRange,
    timestamp: i64,
) -> f64 {
    let raw = raw_price_at(base_price, asset_seed, market, range, timestamp);
    round_cents(raw).max(MIN_PRICE)
}

pub fn current_price(
    base_price: f64,
    asset_seed: u32,
    market: &MarketState,
    range: TimeRange,
    now_ms: i64,
) -> f64 {
    price_at(base_price, asset_seed, market, range, now_ms)
}

/// Percent change between `now - 24h` and `now`, two decimals.
pub fn change_24h(
    base_price: f64,
    asset_seed: u32,
    market: &MarketState,
    range: TimeRange,
    now_ms: i64,
) -> f64 {
    let now = price_at(base_price, asset_seed, market, range, now_ms);
    let day_ago = price_at(base_price, asset_seed, market, range, now_ms - DAY_MS);
    round_cents((now - day_ago) / day_ago * 100.0)
}

pub fn market_cap(price: f64, asset: &AssetMeta) -> f64 {
    (price * asset.circulating_supply).round()
}

/// 24h volume: a fixed share of market cap, wobbling +/-15% hour to hour.
pub fn total_volume(
    market_cap: f64,
    asset: &AssetMeta,
    asset_seed: u32,
    market: &MarketState,
    now_ms: i64,
) -> f64 {
    let bucket = now_ms.div_euclid(VOLUME_BUCKET_MS);
    let wobble = 0.85 + 0.3 * unit_hash(market.seed, asset_seed.wrapping_add(1), bucket);
    (market_cap * asset.volume_ratio * wobble).round()
}

fn raw_price_at(
    base_price: f64,
    asset_seed: u32,
    market: &MarketState,
    range: TimeRange,
    timestamp: i64,
) -> f64 {
    let t = (timestamp - market.start_time) as f64 / HOUR_MS;
    let amplitude = range.config().amplitude;
    let factor = 1.0
        + trend(t, market.seed)
        + volatility(t, asset_seed, amplitude)
        + noise(market.seed, asset_seed, timestamp);
    base_price * factor
}

fn phase(seed: u32) -> f64 {
    (seed % 1000) as f64 / 1000.0 * TAU
}

// Market-wide drift; identical for every asset.
fn trend(t: f64, market_seed: u32) -> f64 {
    let phi = phase(market_seed);
    TREND_SLOW_AMPLITUDE * (TAU * t / TREND_SLOW_PERIOD_HOURS + phi).sin()
        + TREND_FAST_AMPLITUDE * (TAU * t / TREND_FAST_PERIOD_HOURS + 1.7 * phi).sin()
}

// Weights sum to 1 so the term stays within `amplitude`.
fn volatility(t: f64, asset_seed: u32, amplitude: f64) -> f64 {
    let phi = phase(asset_seed);
    amplitude
        * (0.6 * (0.9 * t + phi).sin()
            + 0.3 * (2.3 * t + 1.3 * phi).sin()
            + 0.1 * (5.1 * t + 0.7 * phi).sin())
}

fn noise(market_seed: u32, asset_seed: u32, timestamp: i64) -> f64 {
    let bucket = timestamp.div_euclid(NOISE_BUCKET_MS);
    NOISE_AMPLITUDE * (2.0 * unit_hash(market_seed, asset_seed, bucket) - 1.0)
}

/// Uniform value in `[0, 1)` from splitmix64 over the packed inputs.
fn unit_hash(market_seed: u32, asset_seed: u32, bucket: i64) -> f64 {
    let packed = ((market_seed as u64) << 32) | asset_seed as u64;
    let h = splitmix64(packed ^ (bucket as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    (h >> 11) as f64 / (1u64 << 53) as f64
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
