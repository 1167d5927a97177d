use serde::{Deserialize, Serialize};

/// One sample of a coin's price history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinHistoryPoint {
    pub timestamp: i64, // epoch ms
    pub price: f64,
}

// Fresh value per request, derived from the market state and asset metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub price_change_24h: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub history: Vec<CoinHistoryPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinsResponse {
    pub coins: Vec<Coin>,
}

#[derive(Debug, Default)]
pub struct CoinsParams {
    pub ids: Option<String>,
    pub range: Option<String>,
}

impl CoinsParams {
    /// Comma-separated ids, trimmed, blanks dropped.
    pub fn parsed_ids(&self) -> Vec<String> {
        self.ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_serializes_camel_case() {
        let coin = Coin {
            id: "bitcoin".into(),
            symbol: "BTC".into(),
            name: "Bitcoin".into(),
            current_price: 1.0,
            price_change_24h: 0.5,
            market_cap: 2.0,
            total_volume: 3.0,
            history: vec![CoinHistoryPoint { timestamp: 1, price: 1.0 }],
        };
        let value = serde_json::to_value(&coin).unwrap();
        assert!(value.get("currentPrice").is_some());
        assert!(value.get("priceChange24h").is_some());
        assert!(value.get("totalVolume").is_some());
        assert_eq!(value["history"][0]["timestamp"], 1);
    }

    #[test]
    fn test_parsed_ids_drops_blanks() {
        let query = CoinsParams { ids: Some(" bitcoin, ,ethereum,,".into()), range: None };
        assert_eq!(query.parsed_ids(), vec!["bitcoin", "ethereum"]);

        let blank = CoinsParams { ids: Some(" , ".into()), range: None };
        assert!(blank.parsed_ids().is_empty());
    }
}
