//! DayBar: one trading day's closing price.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closing price for a single symbol on a single trading day.
///
/// Only finite, non-negative closes make it into a [`crate::domain::Series`];
/// the parser drops everything else before a `DayBar` is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayBar {
    pub date: NaiveDate,
    pub close: f64,
}

impl DayBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// Returns true if the close is usable for play (finite and non-negative).
    pub fn is_valid(&self) -> bool {
        self.close.is_finite() && self.close >= 0.0
    }

    /// ISO `YYYY-MM-DD` label, as used on the chart axis.
    pub fn label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
