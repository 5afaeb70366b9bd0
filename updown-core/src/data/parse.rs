//! Alpha Vantage daily payload → [`Series`].
//!
//! Pure transform. The payload looks like:
//!
//! ```json
//! { "Time Series (Daily)": { "2024-03-01": { "4. close": "179.6600", ... }, ... } }
//! ```

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::{DayBar, Series};

pub const TIME_SERIES_KEY: &str = "Time Series (Daily)";
pub const CLOSE_KEY: &str = "4. close";
pub const ADJUSTED_CLOSE_KEY: &str = "5. adjusted close";

/// Parse the daily time series out of a raw payload.
///
/// Returns an empty series when the time-series key is missing or is not an
/// object. Days whose close and adjusted close are both unusable, and keys
/// that are not `YYYY-MM-DD` dates, are skipped.
pub fn parse_daily_series(payload: &Value) -> Series {
    let Some(days) = payload.get(TIME_SERIES_KEY).and_then(Value::as_object) else {
        return Series::empty();
    };

    let bars = days
        .iter()
        .filter_map(|(key, fields)| {
            let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()?;
            let close = resolve_close(fields)?;
            let bar = DayBar::new(date, close);
            bar.is_valid().then_some(bar)
        })
        .collect();

    Series::from_bars(bars)
}

/// Number of day entries in the payload before any filtering.
pub fn raw_day_count(payload: &Value) -> usize {
    payload
        .get(TIME_SERIES_KEY)
        .and_then(Value::as_object)
        .map_or(0, |days| days.len())
}

/// Close if it is a finite number, otherwise the adjusted close.
fn resolve_close(fields: &Value) -> Option<f64> {
    let finite = |key: &str| fields.get(key).and_then(numeric).filter(|v| v.is_finite());
    finite(CLOSE_KEY).or_else(|| finite(ADJUSTED_CLOSE_KEY))
}

/// Numbers arrive as strings (`"179.6600"`); accept bare JSON numbers too.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
