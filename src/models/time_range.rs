use serde::{Deserialize, Serialize};
use std::fmt;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Named time window shown by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "7D")]
    SevenDays,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "1Y")]
    OneYear,
}

/// Point density and swing size used by the generator for one range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeConfig {
    pub points: usize,
    pub step_ms: i64,
    pub amplitude: f64,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::OneDay,
        TimeRange::SevenDays,
        TimeRange::OneMonth,
        TimeRange::OneYear,
    ];

    /// Parse a range label. Accepts the current labels (`1D`, `7D`, `1M`, `1Y`)
    /// and the legacy ones (`24h`, `7d`, `30d`).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "1D" | "24h" => Some(TimeRange::OneDay),
            "7D" | "7d" => Some(TimeRange::SevenDays),
            "1M" | "30d" => Some(TimeRange::OneMonth),
            "1Y" => Some(TimeRange::OneYear),
            _ => None,
        }
    }

    /// Unknown or missing labels fall back to the default range.
    pub fn parse_or_default(label: Option<&str>) -> Self {
        label.and_then(Self::parse).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::OneDay => "1D",
            TimeRange::SevenDays => "7D",
            TimeRange::OneMonth => "1M",
            TimeRange::OneYear => "1Y",
        }
    }

    pub fn config(&self) -> RangeConfig {
        match self {
            TimeRange::OneDay => RangeConfig { points: 96, step_ms: 15 * MINUTE_MS, amplitude: 0.01 },
            TimeRange::SevenDays => RangeConfig { points: 168, step_ms: HOUR_MS, amplitude: 0.03 },
            TimeRange::OneMonth => RangeConfig { points: 120, step_ms: 6 * HOUR_MS, amplitude: 0.06 },
            TimeRange::OneYear => RangeConfig { points: 365, step_ms: DAY_MS, amplitude: 0.15 },
        }
    }

    /// How much time the chart averages over when smoothing this range.
    pub fn smoothing_target_ms(&self) -> i64 {
        match self {
            TimeRange::OneDay => HOUR_MS,
            TimeRange::SevenDays => 12 * HOUR_MS,
            TimeRange::OneMonth => 3 * DAY_MS,
            TimeRange::OneYear => 30 * DAY_MS,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
