//! Runtime shape checks for `/api/coins` payloads, used on both sides of the wire.

use std::fmt;
use thiserror::Error;

use crate::models::{Coin, CoinsResponse};

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaIssue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Response validation failed: {}", join_issues(.issues))]
pub struct SchemaError {
    pub issues: Vec<SchemaIssue>,
}

fn join_issues(issues: &[SchemaIssue]) -> String {
    issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

pub fn validate_coins_response(response: &CoinsResponse) -> Result<(), SchemaError> {
    let mut issues = Vec::new();
    for (i, coin) in response.coins.iter().enumerate() {
        check_coin(&format!("coins[{}]", i), coin, &mut issues);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { issues })
    }
}

fn check_coin(path: &str, coin: &Coin, issues: &mut Vec<SchemaIssue>) {
    let mut push = |field: &str, message: &str| {
        issues.push(SchemaIssue {
            path: format!("{}.{}", path, field),
            message: message.to_string(),
        })
    };

    for (field, value) in [("id", &coin.id), ("symbol", &coin.symbol), ("name", &coin.name)] {
        if value.is_empty() {
            push(field, "must not be empty");
        }
    }
    for (field, value) in [
        ("currentPrice", coin.current_price),
        ("marketCap", coin.market_cap),
        ("totalVolume", coin.total_volume),
    ] {
        if !is_positive(value) {
            push(field, "must be a positive number");
        }
    }
    if !coin.price_change_24h.is_finite() {
        push("priceChange24h", "must be a finite number");
    }
    for (j, point) in coin.history.iter().enumerate() {
        if !is_positive(point.price) {
            push(&format!("history[{}].price", j), "must be a positive number");
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
