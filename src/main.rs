use std::sync::Arc;
use tokio::net::TcpListener;

use insightboard_backend::app;
use insightboard_backend::clock::SystemClock;
use insightboard_backend::config::AppConfig;
use insightboard_backend::logging::{init_logging, LoggingConfig};
use insightboard_backend::state::AppState;
use insightboard_backend::store::MarketStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env()).map_err(|e| anyhow::anyhow!("{}", e))?;

    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;
    config.validate().map_err(anyhow::Error::msg)?;

    let repository = config.state_repository().map_err(anyhow::Error::msg)?;
    tracing::info!("📦 Market state store: {}", config.store);

    let state = AppState::new(MarketStore::new(repository, Arc::new(SystemClock)));
    let app = app::create_app(state, config.cors_layer());

    let addr = config.socket_addr().map_err(anyhow::Error::msg)?;
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 InsightBoard backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
