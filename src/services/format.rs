use chrono::{DateTime, Utc};

use crate::models::TimeRange;

/// `$43,250.50`
pub fn format_usd_price(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", group_2dp(value.abs()))
    } else {
        format!("${}", group_2dp(value))
    }
}

/// `+$12.00` / `-$12.00`
pub fn format_usd_delta(value: f64) -> String {
    let sign = if value >= 0.0 { '+' } else { '-' };
    format!("{}${}", sign, group_2dp(value.abs()))
}

/// `+1.23%` / `-1.23%`
pub fn format_percent_delta(value: f64) -> String {
    let sign = if value >= 0.0 { '+' } else { '-' };
    format!("{}{:.2}%", sign, value.abs())
}

/// Whole number with thousands separators.
pub fn format_number0(value: f64) -> String {
    let rounded = value.round();
    let grouped = group_digits(&format!("{:.0}", rounded.abs()));
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Tooltip label for a chart timestamp, coarser for longer ranges.
pub fn format_timestamp(timestamp_ms: i64, range: TimeRange) -> String {
    let Some(date) = DateTime::<Utc>::from_timestamp_millis(timestamp_ms) else {
        return timestamp_ms.to_string();
    };
    let pattern = match range {
        TimeRange::OneDay => "%I:%M %p",
        TimeRange::SevenDays => "%b %-d, %I:%M %p",
        TimeRange::OneMonth => "%b %-d",
        TimeRange::OneYear => "%b %Y",
    };
    date.format(pattern).to_string()
}

fn group_2dp(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    match fixed.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_digits(int), frac),
        None => group_digits(&fixed),
    }
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    digits
        .chars()
        .enumerate()
        .fold(String::with_capacity(len + len / 3), |mut out, (i, c)| {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
            out
        })
}
