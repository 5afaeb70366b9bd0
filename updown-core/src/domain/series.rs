//! Series: daily bars for one symbol, latest first.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use super::DayBar;

/// Bars strictly descending by date with unique dates.
///
/// Index 0 is the most recent trading day. Higher indices walk back in time,
/// so "the next day" after `series[i]` is `series[i - 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<DayBar>", into = "Vec<DayBar>")]
pub struct Series {
    bars: Vec<DayBar>,
}

impl Series {
    /// Build a series from bars in any order.
    ///
    /// Sorts latest-first and drops repeated dates, keeping the first bar
    /// seen for each date.
    pub fn from_bars(mut bars: Vec<DayBar>) -> Self {
        bars.sort_by(|a, b| b.date.cmp(&a.date));
        bars.dedup_by_key(|b| b.date);
        Self { bars }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DayBar> {
        self.bars.get(index)
    }

    pub fn bars(&self) -> &[DayBar] {
        &self.bars
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DayBar> {
        self.bars.iter()
    }

    /// Most recent bar.
    pub fn latest(&self) -> Option<&DayBar> {
        self.bars.first()
    }

    /// Oldest bar.
    pub fn oldest(&self) -> Option<&DayBar> {
        self.bars.last()
    }

    /// Bars from `newest` back through `oldest` (inclusive, both clamped),
    /// returned ascending by date for display.
    pub fn window_ascending(&self, newest: usize, oldest: usize) -> Vec<DayBar> {
        if self.bars.is_empty() || newest >= self.bars.len() {
            return Vec::new();
        }
        let oldest = oldest.min(self.bars.len() - 1);
        if oldest < newest {
            return Vec::new();
        }
        self.bars[newest..=oldest].iter().rev().copied().collect()
    }
}

impl Index<usize> for Series {
    type Output = DayBar;

    fn index(&self, index: usize) -> &DayBar {
        &self.bars[index]
    }
}

impl From<Vec<DayBar>> for Series {
    fn from(bars: Vec<DayBar>) -> Self {
        Self::from_bars(bars)
    }
}

impl From<Series> for Vec<DayBar> {
    fn from(series: Series) -> Self {
        series.bars
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a DayBar;
    type IntoIter = std::slice::Iter<'a, DayBar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
