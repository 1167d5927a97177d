use axum::extract::{Path, RawQuery, State};
use axum::routing::get;
use axum::{Json, Router};
use std::collections::HashMap;
use tracing::info;

use crate::errors::AppError;
use crate::models::{find_asset, CoinsParams, CoinsResponse, TimeRange};
use crate::routes::first_query_values;
use crate::services::chart::{nearest_point, ChartView, PriceChart};
use crate::services::coin_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_coins))
        .route("/:id/chart", get(get_chart))
}

/// GET /api/coins?ids=bitcoin,ethereum&range=1D
pub async fn get_coins(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<CoinsResponse>, AppError> {
    let mut values = first_query_values(raw.as_deref());
    let query = CoinsParams { ids: values.remove("ids"), range: values.remove("range") };
    info!("GET /api/coins - ids={:?} range={:?}", query.ids, query.range);

    if query.ids.as_deref().map_or(true, str::is_empty) {
        return Err(AppError::MissingParameter("Missing ids parameter".to_string()));
    }
    let ids = query.parsed_ids();
    if ids.is_empty() {
        return Err(AppError::MissingParameter("No valid coin IDs provided".to_string()));
    }
    let range = TimeRange::parse_or_default(query.range.as_deref());

    let market = state.market.get_or_create().await?;
    let response = coin_service::get_coins(&ids, &market, range, state.market.now_ms())?;
    Ok(Json(response))
}

#[derive(Debug, Default, PartialEq)]
pub struct ChartQuery {
    pub range: Option<String>,
    /// Timestamp where the drag started.
    pub anchor: Option<i64>,
    /// Timestamp the pointer is currently over.
    pub current: Option<i64>,
}

impl ChartQuery {
    pub fn from_raw(raw: Option<&str>) -> Result<Self, AppError> {
        let mut values = first_query_values(raw);
        Ok(Self {
            anchor: timestamp_param(&mut values, "anchor")?,
            current: timestamp_param(&mut values, "current")?,
            range: values.remove("range"),
        })
    }
}

// Blank counts as absent.
fn timestamp_param(
    values: &mut HashMap<String, String>,
    name: &'static str,
) -> Result<Option<i64>, AppError> {
    match values.remove(name) {
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::InvalidParameter { name, value }),
        None => Ok(None),
    }
}

/// GET /api/coins/:id/chart?range=7D&anchor=..&current=..
pub async fn get_chart(
    Path(id): Path<String>,
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ChartView>, AppError> {
    let query = ChartQuery::from_raw(raw.as_deref())?;
    info!("GET /api/coins/{}/chart - range={:?}", id, query.range);

    let asset = find_asset(&id)
        .ok_or_else(|| AppError::NotFound(format!("No coins found for IDs: {}", id)))?;
    let range = TimeRange::parse_or_default(query.range.as_deref());

    let market = state.market.get_or_create().await?;
    let coin = coin_service::build_coin(asset, &market, range, state.market.now_ms());

    let mut chart = PriceChart::new(range, asset.symbol);
    if let Some(anchor) = query.anchor {
        let display = chart.display_data(&coin.history);
        let snap = |ts: i64| nearest_point(&display, ts);
        if let Some(start) = snap(anchor) {
            chart.selection_mut().press(start);
            if let Some(end) = query.current.and_then(snap) {
                chart.selection_mut().drag_to(end);
            }
        }
    }

    Ok(Json(chart.render(&coin.history)))
}
