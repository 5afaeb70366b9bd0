//! Game state machine: single owner, no interior mutability.
//!
//! ```text
//! Idle ──begin_load──▶ Loading ──start──▶ Playing ──reveal/stop──▶ Ended
//!   ▲                     │                                          │
//!   └─────fail_load───────┘◀────────────────begin_load───────────────┘
//! ```
//!
//! The series is latest-first, so advancing one day toward the present means
//! *decrementing* `current_index`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::{DayBar, Series};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Loading,
    Playing,
    Ended,
}

/// Player's call for the next close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Guess {
    Up,
    Down,
}

impl Guess {
    pub fn is_up(self) -> bool {
        matches!(self, Guess::Up)
    }

    pub fn label(self) -> &'static str {
        match self {
            Guess::Up => "Up",
            Guess::Down => "Down",
        }
    }
}

/// One scored reveal.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub guess: Guess,
    pub correct: bool,
    /// Strictly higher close. An unchanged close counts as down.
    pub went_up: bool,
    pub today: DayBar,
    pub next: DayBar,
    /// Score after this round.
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// No later day left to reveal.
    Exhausted,
    /// Player stopped.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalSummary {
    pub ticker: String,
    pub score: u32,
    pub rounds: u32,
    pub reason: EndReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevealOutcome {
    /// A day was revealed. `finished` is set when that was the last one.
    Revealed {
        round: RoundResult,
        finished: Option<FinalSummary>,
    },
    /// Nothing left to reveal; the game is now over and the score unchanged.
    NoMoreDays(FinalSummary),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no game in progress (phase: {phase:?})")]
    NotPlaying { phase: Phase },

    #[error("cannot start a round while {phase:?}")]
    InvalidTransition { phase: Phase },

    #[error("start index {index} is outside a series of {len} bars")]
    InvalidStart { index: usize, len: usize },
}

#[derive(Debug, Clone)]
pub struct GameState {
    ticker: String,
    series: Series,
    current_index: usize,
    start_index: usize,
    score: u32,
    rounds: u32,
    phase: Phase,
    lookback_days: usize,
    summary: Option<FinalSummary>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(7)
    }
}

impl GameState {
    pub fn new(lookback_days: usize) -> Self {
        Self {
            ticker: String::new(),
            series: Series::empty(),
            current_index: 0,
            start_index: 0,
            score: 0,
            rounds: 0,
            phase: Phase::Idle,
            lookback_days,
            summary: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Index of the "today" bar, once a round has started.
    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Playing | Phase::Ended if !self.series.is_empty() => Some(self.current_index),
            _ => None,
        }
    }

    /// The "today" bar, once a round has started.
    pub fn today(&self) -> Option<&DayBar> {
        self.current_index().and_then(|i| self.series.get(i))
    }

    /// Days still available to reveal.
    pub fn remaining(&self) -> usize {
        match self.phase {
            Phase::Playing => self.current_index,
            _ => 0,
        }
    }

    /// Reset for a fresh load. Valid from any phase; supersedes a running game.
    pub fn begin_load(&mut self, ticker: &str) {
        debug!(ticker, from = ?self.phase, "begin load");
        self.ticker = ticker.to_string();
        self.series = Series::empty();
        self.current_index = 0;
        self.start_index = 0;
        self.score = 0;
        self.rounds = 0;
        self.summary = None;
        self.phase = Phase::Loading;
    }

    /// A load attempt failed: back to Idle with nothing loaded.
    pub fn fail_load(&mut self) {
        self.series = Series::empty();
        self.current_index = 0;
        self.start_index = 0;
        self.summary = None;
        self.phase = Phase::Idle;
    }

    /// Begin a round with `start_index` as "today".
    pub fn start(
        &mut self,
        ticker: &str,
        series: Series,
        start_index: usize,
    ) -> Result<(), GameError> {
        if self.phase == Phase::Playing {
            return Err(GameError::InvalidTransition { phase: self.phase });
        }
        if start_index >= series.len() {
            return Err(GameError::InvalidStart {
                index: start_index,
                len: series.len(),
            });
        }

        debug!(ticker, start_index, bars = series.len(), "round started");
        self.ticker = ticker.to_string();
        self.series = series;
        self.current_index = start_index;
        self.start_index = start_index;
        self.score = 0;
        self.rounds = 0;
        self.summary = None;
        self.phase = Phase::Playing;
        Ok(())
    }

    /// The opening chart: the start day and up to `lookback_days` bars before
    /// it, ascending by date.
    pub fn initial_window(&self) -> Vec<DayBar> {
        match self.current_index() {
            Some(_) => self
                .series
                .window_ascending(self.start_index, self.start_index + self.lookback_days),
            None => Vec::new(),
        }
    }

    /// Reveal the next day and score `guess` against it.
    pub fn reveal(&mut self, guess: Guess) -> Result<RevealOutcome, GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::NotPlaying { phase: self.phase });
        }

        if self.current_index == 0 {
            return Ok(RevealOutcome::NoMoreDays(self.finish(EndReason::Exhausted)));
        }

        let today = self.series[self.current_index];
        let next = self.series[self.current_index - 1];
        let went_up = next.close > today.close;
        let correct = guess.is_up() == went_up;
        if correct {
            self.score += 1;
        }
        self.rounds += 1;
        self.current_index -= 1;

        let round = RoundResult {
            guess,
            correct,
            went_up,
            today,
            next,
            score: self.score,
        };

        let finished = if self.current_index == 0 {
            Some(self.finish(EndReason::Exhausted))
        } else {
            None
        };

        Ok(RevealOutcome::Revealed { round, finished })
    }

    /// End the game now. Stopping an already ended game returns the same
    /// summary again and changes nothing.
    pub fn stop(&mut self) -> Result<FinalSummary, GameError> {
        match self.phase {
            Phase::Playing => Ok(self.finish(EndReason::Stopped)),
            Phase::Ended => self
                .summary
                .clone()
                .ok_or(GameError::NotPlaying { phase: self.phase }),
            phase => Err(GameError::NotPlaying { phase }),
        }
    }

    fn finish(&mut self, reason: EndReason) -> FinalSummary {
        let summary = FinalSummary {
            ticker: self.ticker.clone(),
            score: self.score,
            rounds: self.rounds,
            reason,
        };
        debug!(ticker = %self.ticker, score = self.score, ?reason, "game ended");
        self.phase = Phase::Ended;
        self.summary = Some(summary.clone());
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64) -> DayBar {
        DayBar::new(NaiveDate::from_ymd_opt(2024, 5, day).unwrap(), close)
    }

    /// Desc: d0 = May 3 (105), d1 = May 2 (100), d2 = May 1 (98).
    fn three_day_series() -> Series {
        Series::from_bars(vec![bar(3, 105.0), bar(2, 100.0), bar(1, 98.0)])
    }

    fn playing(series: Series, start: usize) -> GameState {
        let mut state = GameState::default();
        state.begin_load("TEST");
        state.start("TEST", series, start).unwrap();
        state
    }

    #[test]
    fn new_state_is_idle() {
        let state = GameState::default();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.current_index(), None);
        assert!(state.today().is_none());
        assert!(state.initial_window().is_empty());
    }

    #[test]
    fn start_sets_playing() {
        let state = playing(three_day_series(), 1);
        assert_eq!(state.phase(), Phase::Playing);
        assert_eq!(state.current_index(), Some(1));
        assert_eq!(state.today().unwrap().close, 100.0);
        assert_eq!(state.score(), 0);
        assert_eq!(state.remaining(), 1);
    }

    #[test]
    fn start_rejects_out_of_range_index() {
        let mut state = GameState::default();
        assert_eq!(
            state.start("TEST", three_day_series(), 3),
            Err(GameError::InvalidStart { index: 3, len: 3 })
        );
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn start_rejected_while_playing() {
        let mut state = playing(three_day_series(), 1);
        assert_eq!(
            state.start("TEST", three_day_series(), 2),
            Err(GameError::InvalidTransition { phase: Phase::Playing })
        );
        assert_eq!(state.current_index(), Some(1));
    }

    #[test]
    fn start_allowed_after_end() {
        let mut state = playing(three_day_series(), 1);
        state.stop().unwrap();
        assert!(state.start("TEST", three_day_series(), 2).is_ok());
        assert_eq!(state.phase(), Phase::Playing);
    }

    #[test]
    fn initial_window_is_eight_bars_ascending() {
        let bars: Vec<_> = (1..=12).map(|d| bar(d, d as f64)).collect();
        let state = playing(Series::from_bars(bars), 2);
        let window = state.initial_window();
        let closes: Vec<_> = window.iter().map(|b| b.close).collect();
        // Index 2 is May 10; seven earlier days are May 3..=9.
        assert_eq!(closes, [3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn scenario_guess_up_then_exhaust() {
        let mut state = playing(three_day_series(), 1);

        let outcome = state.reveal(Guess::Up).unwrap();
        match outcome {
            RevealOutcome::Revealed { round, finished } => {
                assert!(round.went_up);
                assert!(round.correct);
                assert_eq!(round.next.close, 105.0);
                assert_eq!(round.score, 1);
                let summary = finished.expect("last day revealed");
                assert_eq!(summary.score, 1);
                assert_eq!(summary.reason, EndReason::Exhausted);
            }
            other => panic!("expected Revealed, got {other:?}"),
        }
        assert_eq!(state.score(), 1);
        assert_eq!(state.current_index(), Some(0));
        assert_eq!(state.phase(), Phase::Ended);

        // Game is over: further reveals are rejected, score untouched.
        assert_eq!(
            state.reveal(Guess::Up),
            Err(GameError::NotPlaying { phase: Phase::Ended })
        );
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn scenario_tie_counts_as_down() {
        let series = Series::from_bars(vec![bar(3, 100.0), bar(2, 100.0), bar(1, 98.0)]);
        let mut state = playing(series, 1);
        match state.reveal(Guess::Down).unwrap() {
            RevealOutcome::Revealed { round, .. } => {
                assert!(!round.went_up);
                assert!(round.correct);
            }
            other => panic!("expected Revealed, got {other:?}"),
        }
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn tie_guessed_up_is_wrong() {
        let series = Series::from_bars(vec![bar(3, 100.0), bar(2, 100.0), bar(1, 98.0)]);
        let mut state = playing(series, 1);
        state.reveal(Guess::Up).unwrap();
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn reveal_at_index_zero_ends_without_scoring() {
        let mut state = playing(three_day_series(), 0);
        assert_eq!(
            state.reveal(Guess::Up),
            Ok(RevealOutcome::NoMoreDays(FinalSummary {
                ticker: "TEST".into(),
                score: 0,
                rounds: 0,
                reason: EndReason::Exhausted,
            }))
        );
        assert_eq!(state.phase(), Phase::Ended);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn wrong_guess_keeps_score_and_advances() {
        let mut state = playing(three_day_series(), 2);
        // May 1 (98) -> May 2 (100): up.
        match state.reveal(Guess::Down).unwrap() {
            RevealOutcome::Revealed { round, finished } => {
                assert!(round.went_up);
                assert!(!round.correct);
                assert!(finished.is_none());
            }
            other => panic!("expected Revealed, got {other:?}"),
        }
        assert_eq!(state.score(), 0);
        assert_eq!(state.current_index(), Some(1));
        assert_eq!(state.phase(), Phase::Playing);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut state = playing(three_day_series(), 2);
        state.reveal(Guess::Up).unwrap();
        let first = state.stop().unwrap();
        let second = state.stop().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.score, 1);
        assert_eq!(first.reason, EndReason::Stopped);
        assert_eq!(state.score(), 1);
        assert_eq!(state.phase(), Phase::Ended);
    }

    #[test]
    fn stop_requires_a_game() {
        let mut state = GameState::default();
        assert_eq!(state.stop(), Err(GameError::NotPlaying { phase: Phase::Idle }));
        state.begin_load("X");
        assert_eq!(state.stop(), Err(GameError::NotPlaying { phase: Phase::Loading }));
    }

    #[test]
    fn reveal_requires_playing() {
        let mut state = GameState::default();
        assert_eq!(
            state.reveal(Guess::Up),
            Err(GameError::NotPlaying { phase: Phase::Idle })
        );
    }

    #[test]
    fn begin_load_resets_everything() {
        let mut state = playing(three_day_series(), 2);
        state.reveal(Guess::Up).unwrap();
        state.begin_load("NEXT");
        assert_eq!(state.phase(), Phase::Loading);
        assert_eq!(state.ticker(), "NEXT");
        assert_eq!(state.score(), 0);
        assert!(state.series().is_empty());
        state.fail_load();
        assert_eq!(state.phase(), Phase::Idle);
    }
}
