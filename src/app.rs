use axum::Router;
use tower_http::cors::CorsLayer;

use crate::logging::http_trace_layer;
use crate::routes::{coins, health, market};
use crate::state::AppState;

pub fn create_app(state: AppState, cors: CorsLayer) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/coins", coins::router())
        .nest("/api/market", market::router())
        .layer(http_trace_layer())
        .layer(cors)
        .with_state(state)
}
