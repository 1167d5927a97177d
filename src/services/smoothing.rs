//! Display-only smoothing for price charts. Inputs are never modified.

use crate::models::{CoinHistoryPoint, TimeRange};
use crate::services::price_generator::round_cents;

const STEP_SAMPLE: usize = 20;

/// Centered moving average; the window shrinks near the edges instead of padding.
pub fn moving_average(data: &[CoinHistoryPoint], window: usize) -> Vec<CoinHistoryPoint> {
    if window <= 1 || data.is_empty() {
        return data.to_vec();
    }

    let half = window / 2;
    let last = data.len() - 1;
    data.iter()
        .enumerate()
        .map(|(i, point)| {
            let start = i.saturating_sub(half);
            let end = (i + half).min(last);
            let slice = &data[start..=end];
            let avg = slice.iter().map(|p| p.price).sum::<f64>() / slice.len() as f64;
            CoinHistoryPoint {
                timestamp: point.timestamp,
                price: round_cents(avg),
            }
        })
        .collect()
}

/// Median of the first few positive deltas; `1` when there is nothing to measure.
pub fn estimate_step_ms(data: &[CoinHistoryPoint]) -> i64 {
    if data.len() < 2 {
        return 1;
    }

    let sample = STEP_SAMPLE.min(data.len() - 1);
    let mut deltas: Vec<i64> = data[..=sample]
        .windows(2)
        .map(|w| w[1].timestamp - w[0].timestamp)
        .filter(|d| *d > 0)
        .collect();

    if deltas.is_empty() {
        return 1;
    }
    deltas.sort_unstable();
    deltas[deltas.len() / 2]
}

/// Window length for `range`, scaled by the asset's smoothing factor.
///
/// Always in `[1, len]` and odd unless capped by an even `len`.
pub fn smoothing_window(range: TimeRange, step_ms: i64, factor: f64, len: usize) -> usize {
    let target = range.smoothing_target_ms() as f64;
    let raw = ((target / step_ms.max(1) as f64) * factor).round().max(1.0) as usize;
    let capped = raw.min(len.max(1));
    if capped % 2 == 0 {
        (capped + 1).min(len)
    } else {
        capped
    }
}
