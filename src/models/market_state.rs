use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::asset::KNOWN_ASSETS;

/// Market-wide generator inputs shared by every coin.
///
/// Created once and treated as immutable until an explicit reset, so repeated
/// requests see one continuously evolving market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketState {
    pub seed: u32,
    pub start_time: i64,
    pub base_prices: BTreeMap<String, f64>,
}

impl MarketState {
    /// Fresh state anchored at `now_ms`, seeded from the clock.
    pub fn fresh(now_ms: i64) -> Self {
        Self {
            seed: seed_from_time(now_ms),
            start_time: now_ms,
            base_prices: initial_base_prices(),
        }
    }

    pub fn base_price(&self, asset_id: &str) -> Option<f64> {
        self.base_prices.get(asset_id).copied()
    }

    /// Checks a state loaded from storage before it is trusted.
    pub fn validate(&self) -> Result<(), String> {
        if self.start_time <= 0 {
            return Err(format!("invalid startTime {}", self.start_time));
        }
        if self.base_prices.is_empty() {
            return Err("basePrices is empty".to_string());
        }
        for (id, price) in &self.base_prices {
            if !price.is_finite() || *price <= 0.0 {
                return Err(format!("invalid base price {} for {}", price, id));
            }
        }
        Ok(())
    }
}

pub fn initial_base_prices() -> BTreeMap<String, f64> {
    KNOWN_ASSETS
        .iter()
        .map(|asset| (asset.id.to_string(), asset.base_price))
        .collect()
}

/// Clock-derived seed in `[0, 1_000_000)`. Deterministic for a given instant.
pub fn seed_from_time(now_ms: i64) -> u32 {
    let now = now_ms.unsigned_abs();
    let seed = (now % 1_000_000) * 7 + (now / 1_000_000) * 13;
    (seed % 1_000_000) as u32
}

/// 32-bit rolling string hash (`h * 31 + c`), folded into `[0, 1_000_000)`.
pub fn seed_from_string(value: &str) -> u32 {
    let hash = value
        .encode_utf16()
        .fold(0i32, |h, c| h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32));
    hash.unsigned_abs() % 1_000_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_from_time_is_deterministic_and_bounded() {
        let now = 1_700_000_000_123;
        assert_eq!(seed_from_time(now), seed_from_time(now));
        assert!(seed_from_time(now) < 1_000_000);
        assert_ne!(seed_from_time(now), seed_from_time(now + 1));
    }

    #[test]
    fn test_seed_from_string_matches_rolling_hash() {
        // "ab" -> 97 * 31 + 98
        assert_eq!(seed_from_string("ab"), 3105);
        assert_eq!(seed_from_string(""), 0);
        assert_eq!(seed_from_string("bitcoin"), seed_from_string("bitcoin"));
        assert_ne!(seed_from_string("bitcoin"), seed_from_string("ethereum"));
    }

    #[test]
    fn test_fresh_state_uses_initial_table() {
        let state = MarketState::fresh(1_700_000_000_000);
        assert_eq!(state.start_time, 1_700_000_000_000);
        assert_eq!(state.base_price("bitcoin"), Some(43250.5));
        assert_eq!(state.base_price("cardano"), Some(0.485));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_prices() {
        let mut state = MarketState::fresh(1_700_000_000_000);
        state.base_prices.insert("bitcoin".into(), -1.0);
        assert!(state.validate().is_err());

        let mut empty = MarketState::fresh(1_700_000_000_000);
        empty.base_prices.clear();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_serde_field_names() {
        let state = MarketState::fresh(1_700_000_000_000);
        let value = serde_json::to_value(&state).unwrap();
        assert!(value.get("startTime").is_some());
        assert!(value.get("basePrices").is_some());
        assert!(value.get("seed").is_some());
    }
}
