//! Price chart display model: smoothing, Y domain and drag-to-compare.
//!
//! The chart only ever derives new vectors from the history it is given;
//! callers keep the raw values.

use serde::Serialize;

use crate::models::{smoothing_factor_for_symbol, CoinHistoryPoint, TimeRange};
use crate::services::format::{format_percent_delta, format_usd_delta, format_usd_price};
use crate::services::smoothing::{estimate_step_ms, moving_average, smoothing_window};

pub const UP_STROKE: &str = "#16a34a";
pub const DOWN_STROKE: &str = "#dc2626";
pub const UP_FILL: &str = "rgba(22, 163, 74, 0.14)";
pub const DOWN_FILL: &str = "rgba(220, 38, 38, 0.14)";

const NO_DATA: &str = "No data available";
const DOMAIN_LOW: f64 = 0.98;
const DOMAIN_HIGH: f64 = 1.02;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub timestamp: i64,
    pub price: f64,
    /// Set only for points inside the compared interval.
    pub highlight_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub older: CoinHistoryPoint,
    pub newer: CoinHistoryPoint,
    pub delta: f64,
    pub percent: f64,
    pub is_up: bool,
    pub stroke: &'static str,
    pub fill: &'static str,
}

impl Comparison {
    /// Order-independent: the chronologically earlier point is always `older`.
    pub fn between(a: CoinHistoryPoint, b: CoinHistoryPoint) -> Self {
        let (older, newer) = if a.timestamp <= b.timestamp { (a, b) } else { (b, a) };
        let delta = newer.price - older.price;
        let percent = if older.price == 0.0 { 0.0 } else { delta / older.price * 100.0 };
        let is_up = delta >= 0.0;

        Self {
            older,
            newer,
            delta,
            percent,
            is_up,
            stroke: if is_up { UP_STROKE } else { DOWN_STROKE },
            fill: if is_up { UP_FILL } else { DOWN_FILL },
        }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.older.timestamp && timestamp <= self.newer.timestamp
    }

    pub fn label(&self) -> ComparisonLabel {
        ComparisonLabel {
            price: format_usd_price(self.newer.price),
            delta: format_usd_delta(self.delta),
            percent: format_percent_delta(self.percent),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonLabel {
    pub price: String,
    pub delta: String,
    pub percent: String,
}

/// Press-drag-release gesture state.
#[derive(Debug, Clone, Default)]
pub struct DragSelection {
    anchor: Option<CoinHistoryPoint>,
    current: Option<CoinHistoryPoint>,
    dragging: bool,
}

impl DragSelection {
    pub fn press(&mut self, point: CoinHistoryPoint) {
        self.dragging = true;
        self.anchor = Some(point);
        self.current = Some(point);
    }

    pub fn drag_to(&mut self, point: CoinHistoryPoint) {
        if self.dragging {
            self.current = Some(point);
        }
    }

    pub fn release(&mut self) {
        self.clear();
    }

    pub fn leave(&mut self) {
        self.clear();
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn comparison(&self) -> Option<Comparison> {
        match (self.anchor, self.current) {
            (Some(anchor), Some(current)) => Some(Comparison::between(anchor, current)),
            _ => None,
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub range: TimeRange,
    pub symbol: String,
    pub window: usize,
    pub step_ms: i64,
    pub y_domain: [f64; 2],
    pub points: Vec<ChartPoint>,
    pub comparison: Option<Comparison>,
    pub comparison_label: Option<ComparisonLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChartView {
    Placeholder { message: String },
    Series(ChartSeries),
}

/// One chart on screen: a range, a symbol and the user's current selection.
#[derive(Debug, Clone)]
pub struct PriceChart {
    range: TimeRange,
    symbol: String,
    selection: DragSelection,
}

impl PriceChart {
    pub fn new(range: TimeRange, symbol: impl Into<String>) -> Self {
        Self {
            range,
            symbol: symbol.into(),
            selection: DragSelection::default(),
        }
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// Switching ranges cancels any comparison in progress.
    pub fn set_range(&mut self, range: TimeRange) {
        if range != self.range {
            self.range = range;
            self.selection.clear();
        }
    }

    pub fn selection(&self) -> &DragSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut DragSelection {
        &mut self.selection
    }

    pub fn window_for(&self, data: &[CoinHistoryPoint]) -> (usize, i64) {
        let step_ms = estimate_step_ms(data);
        let factor = smoothing_factor_for_symbol(&self.symbol);
        (smoothing_window(self.range, step_ms, factor, data.len()), step_ms)
    }

    /// The smoothed series that is actually drawn.
    pub fn display_data(&self, data: &[CoinHistoryPoint]) -> Vec<CoinHistoryPoint> {
        let (window, _) = self.window_for(data);
        moving_average(data, window)
    }

    pub fn render(&self, data: &[CoinHistoryPoint]) -> ChartView {
        if data.is_empty() {
            return ChartView::Placeholder { message: NO_DATA.to_string() };
        }

        let (window, step_ms) = self.window_for(data);
        let display = moving_average(data, window);
        let comparison = self.selection.comparison();

        let points = display
            .iter()
            .map(|p| ChartPoint {
                timestamp: p.timestamp,
                price: p.price,
                highlight_price: comparison
                    .as_ref()
                    .filter(|c| c.contains(p.timestamp))
                    .map(|_| p.price),
            })
            .collect();

        // The label floats over the chart only while the pointer is held.
        let comparison_label = comparison
            .as_ref()
            .filter(|_| self.selection.is_dragging())
            .map(Comparison::label);

        ChartView::Series(ChartSeries {
            range: self.range,
            symbol: self.symbol.clone(),
            window,
            step_ms,
            y_domain: y_domain(&display),
            points,
            comparison,
            comparison_label,
        })
    }
}

/// `[min * 0.98, max * 1.02]` of the given prices.
pub fn y_domain(points: &[CoinHistoryPoint]) -> [f64; 2] {
    let (min, max) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.price), hi.max(p.price))
    });
    if points.is_empty() {
        return [0.0, 0.0];
    }
    [min * DOMAIN_LOW, max * DOMAIN_HIGH]
}

/// Displayed point closest in time to `timestamp`; ties go to the earlier one.
pub fn nearest_point(points: &[CoinHistoryPoint], timestamp: i64) -> Option<CoinHistoryPoint> {
    points
        .iter()
        .min_by_key(|p| p.timestamp.abs_diff(timestamp))
        .copied()
}
