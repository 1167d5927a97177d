use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::MarketState;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/state", get(get_market_state))
        .route("/reset", post(reset_market))
}

/// GET /api/market/state
pub async fn get_market_state(State(state): State<AppState>) -> Result<Json<MarketState>, AppError> {
    info!("GET /api/market/state - Getting market state");
    let market = state.market.get_or_create().await?;
    Ok(Json(market.as_ref().clone()))
}

/// POST /api/market/reset
///
/// Starts a new synthetic market; every later request evolves from it.
pub async fn reset_market(State(state): State<AppState>) -> Result<Json<MarketState>, AppError> {
    info!("POST /api/market/reset - Resetting market state");
    let market = state.market.reset().await?;
    Ok(Json(market.as_ref().clone()))
}
