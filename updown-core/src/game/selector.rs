//! Round selection: pick a random "today" that has history behind it and at
//! least one later day in front of it, within a calendar window ending a week
//! ago.

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Series;

/// Calendar and lookback limits for choosing a start day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundRules {
    /// Start day must be at least this many calendar days before today.
    pub min_age_days: u32,
    /// Start day must be at most this many calendar days before today.
    pub max_age_days: u32,
    /// Bars shown before the start day on the initial chart.
    pub lookback_days: usize,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            min_age_days: 7,
            max_age_days: 100,
            lookback_days: 7,
        }
    }
}

impl RoundRules {
    /// Inclusive `(start_bound, end_bound)` date range for a start day.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let back = |days: u32| {
            today
                .checked_sub_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MIN)
        };
        (back(self.max_age_days), back(self.min_age_days))
    }

    /// Bars on the initial chart: the lookback plus the start day itself.
    pub fn window_len(&self) -> usize {
        self.lookback_days + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("Not enough data in the last {max_age_days} days to start a game. Try a different symbol.")]
    InsufficientHistory { max_age_days: u32, eligible: usize },
}

/// Uniform choice of a position in `0..len`.
pub trait IndexChooser {
    /// `len` is always non-zero.
    fn choose(&mut self, len: usize) -> usize;
}

impl IndexChooser for StdRng {
    fn choose(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Indices whose date falls inside the rules' calendar window.
pub fn eligible_indices(series: &Series, today: NaiveDate, rules: &RoundRules) -> Vec<usize> {
    let (start_bound, end_bound) = rules.bounds(today);
    series
        .iter()
        .enumerate()
        .filter(|(_, bar)| bar.date >= start_bound && bar.date <= end_bound)
        .map(|(i, _)| i)
        .collect()
}

/// Eligible indices that also have a later day to reveal and a full lookback.
pub fn candidate_indices(series: &Series, today: NaiveDate, rules: &RoundRules) -> Vec<usize> {
    eligible_indices(series, today, rules)
        .into_iter()
        .filter(|&i| i >= 1 && i + rules.lookback_days < series.len())
        .collect()
}

/// Pick a start index uniformly from the candidates.
pub fn select_start_index(
    series: &Series,
    today: NaiveDate,
    rules: &RoundRules,
    chooser: &mut dyn IndexChooser,
) -> Result<usize, SelectError> {
    let candidates = candidate_indices(series, today, rules);
    if candidates.is_empty() {
        return Err(SelectError::InsufficientHistory {
            max_age_days: rules.max_age_days,
            eligible: eligible_indices(series, today, rules).len(),
        });
    }
    let pick = chooser.choose(candidates.len()).min(candidates.len() - 1);
    Ok(candidates[pick])
}
