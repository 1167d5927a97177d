/// Static per-asset metadata. Everything time-dependent comes from the generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetMeta {
    pub id: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    pub base_price: f64,
    pub circulating_supply: f64,
    /// 24h volume as a fraction of market cap.
    pub volume_ratio: f64,
    /// Chart smoothing multiplier; larger caps read smoother.
    pub smoothing_factor: f64,
}

pub const KNOWN_ASSETS: [AssetMeta; 3] = [
    AssetMeta {
        id: "bitcoin",
        symbol: "BTC",
        name: "Bitcoin",
        base_price: 43250.5,
        circulating_supply: 19_650_000.0,
        volume_ratio: 0.0294,
        smoothing_factor: 1.4,
    },
    AssetMeta {
        id: "ethereum",
        symbol: "ETH",
        name: "Ethereum",
        base_price: 2650.75,
        circulating_supply: 120_700_000.0,
        volume_ratio: 0.0469,
        smoothing_factor: 1.1,
    },
    AssetMeta {
        id: "cardano",
        symbol: "ADA",
        name: "Cardano",
        base_price: 0.485,
        circulating_supply: 35_050_000_000.0,
        volume_ratio: 0.0294,
        smoothing_factor: 0.9,
    },
];

pub fn find_asset(id: &str) -> Option<&'static AssetMeta> {
    KNOWN_ASSETS.iter().find(|asset| asset.id == id)
}

/// Smoothing factor by ticker symbol; unknown symbols are not scaled.
pub fn smoothing_factor_for_symbol(symbol: &str) -> f64 {
    KNOWN_ASSETS
        .iter()
        .find(|asset| asset.symbol == symbol)
        .map(|asset| asset.smoothing_factor)
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_asset() {
        assert_eq!(find_asset("ethereum").map(|a| a.symbol), Some("ETH"));
        assert!(find_asset("bogus").is_none());
    }

    #[test]
    fn test_smoothing_factor_defaults_to_one() {
        assert_eq!(smoothing_factor_for_symbol("BTC"), 1.4);
        assert_eq!(smoothing_factor_for_symbol("DOGE"), 1.0);
    }
}
