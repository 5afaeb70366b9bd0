//! Game controller: owns the [`GameState`] and drives a [`Presenter`].
//!
//! Loading is split in two so the network call can run elsewhere:
//! [`GameController::submit_ticker`] hands out a [`LoadTicket`], and
//! [`GameController::complete_load`] takes the fetch result back. Only the
//! most recent ticket is honoured; anything older is dropped as stale.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::{FetchError, MarketDataProvider};
use crate::domain::Series;
use crate::format;
use crate::game::{
    select_start_index, Clock, FinalSummary, GameError, GameState, Guess, Phase,
    RevealOutcome, RoundRules, SelectError,
};
use crate::presenter::{Presenter, Tone};
use crate::rng::RngSource;

/// Identifies one load request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub ticker: String,
    pub generation: u64,
}

/// Everything that can end a load attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Please enter a stock ticker symbol.")]
    EmptyTicker,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Game(#[from] GameError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Started { ticket: LoadTicket, start_index: usize },
    Failed(LoadError),
    /// The ticket was superseded by a newer submission; nothing changed.
    Stale,
}

/// Trim and upper-case user input.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub struct GameController {
    state: GameState,
    rules: RoundRules,
    clock: Box<dyn Clock>,
    rng: RngSource,
    generation: u64,
    pending: Option<LoadTicket>,
}

impl GameController {
    pub fn new(rules: RoundRules, clock: Box<dyn Clock>, rng: RngSource) -> Self {
        Self {
            state: GameState::new(rules.lookback_days),
            rules,
            clock,
            rng,
            generation: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rules(&self) -> &RoundRules {
        &self.rules
    }

    /// The load currently awaiting a result, if any.
    pub fn pending(&self) -> Option<&LoadTicket> {
        self.pending.as_ref()
    }

    /// Start a load for `raw`. Blank input is rejected without touching the
    /// current game; anything else supersedes it.
    pub fn submit_ticker(
        &mut self,
        raw: &str,
        view: &mut dyn Presenter,
    ) -> Result<LoadTicket, LoadError> {
        let ticker = normalize_ticker(raw);
        if ticker.is_empty() {
            let err = LoadError::EmptyTicker;
            view.set_status(&err.to_string(), Tone::Negative);
            return Err(err);
        }

        self.generation += 1;
        let ticket = LoadTicket {
            ticker: ticker.clone(),
            generation: self.generation,
        };
        info!(ticker = %ticket.ticker, generation = ticket.generation, "load submitted");

        self.state.begin_load(&ticker);
        self.pending = Some(ticket.clone());

        view.reset();
        view.set_today(&ticker, None);
        view.set_score(0);
        view.set_round_result("", Tone::Neutral);
        view.set_status(format::LOADING, Tone::Neutral);
        Ok(ticket)
    }

    /// Accept the fetch result for `ticket` and start a round, or report why
    /// one could not start.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Series, FetchError>,
        view: &mut dyn Presenter,
    ) -> LoadOutcome {
        if self.pending.as_ref() != Some(ticket) {
            debug!(
                ticker = %ticket.ticker,
                generation = ticket.generation,
                current = self.generation,
                "dropping stale load result"
            );
            return LoadOutcome::Stale;
        }
        self.pending = None;

        match self.try_start(ticket, result) {
            Ok(start_index) => {
                self.present_start(view);
                LoadOutcome::Started {
                    ticket: ticket.clone(),
                    start_index,
                }
            }
            Err(err) => {
                warn!(ticker = %ticket.ticker, error = %err, "load failed");
                self.state.fail_load();
                view.reset();
                view.set_game_visible(false);
                view.set_status(&err.to_string(), Tone::Negative);
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Submit and complete in one go, fetching on the calling thread.
    pub fn load_with(
        &mut self,
        raw: &str,
        provider: &dyn MarketDataProvider,
        view: &mut dyn Presenter,
    ) -> LoadOutcome {
        let ticket = match self.submit_ticker(raw, view) {
            Ok(ticket) => ticket,
            Err(err) => return LoadOutcome::Failed(err),
        };
        let result = provider.fetch_daily(&ticket.ticker);
        self.complete_load(&ticket, result, view)
    }

    /// Score `guess` against the next day and show the result.
    pub fn guess(
        &mut self,
        guess: Guess,
        view: &mut dyn Presenter,
    ) -> Result<RevealOutcome, GameError> {
        let outcome = self.state.reveal(guess)?;
        match &outcome {
            RevealOutcome::Revealed { round, finished } => {
                debug!(guess = guess.label(), correct = round.correct, score = round.score, "round");
                view.append_point(&round.next);
                view.set_today(self.state.ticker(), self.state.today());
                view.set_score(round.score);
                let tone = if round.correct {
                    Tone::Positive
                } else {
                    Tone::Negative
                };
                view.set_round_result(&format::round_result_message(round), tone);
                if let Some(summary) = finished {
                    self.present_end(summary, view);
                }
            }
            RevealOutcome::NoMoreDays(summary) => {
                info!(ticker = %summary.ticker, score = summary.score, "no more days");
                view.set_controls_enabled(false);
                view.set_round_result(format::NO_MORE_DAYS, Tone::Negative);
            }
        }
        Ok(outcome)
    }

    /// End the game early. Repeated calls return the same summary.
    pub fn stop(&mut self, view: &mut dyn Presenter) -> Result<FinalSummary, GameError> {
        let was_playing = self.state.phase() == Phase::Playing;
        let summary = self.state.stop()?;
        if !was_playing {
            return Ok(summary);
        }
        info!(ticker = %summary.ticker, score = summary.score, rounds = summary.rounds, "game stopped");
        view.set_controls_enabled(false);
        view.set_round_result(&format::stopped_message(summary.score), Tone::Neutral);
        Ok(summary)
    }

    fn try_start(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Series, FetchError>,
    ) -> Result<usize, LoadError> {
        let series = result?;
        let today = self.clock.today();
        let mut rng = self.rng.rng_for(&ticket.ticker, ticket.generation);
        let start_index = select_start_index(&series, today, &self.rules, &mut rng)?;
        self.state.start(&ticket.ticker, series, start_index)?;
        info!(ticker = %ticket.ticker, start_index, "round ready");
        Ok(start_index)
    }

    fn present_start(&self, view: &mut dyn Presenter) {
        let ticker = self.state.ticker();
        view.set_game_visible(true);
        view.render(ticker, &self.state.initial_window());
        view.set_today(ticker, self.state.today());
        view.set_score(self.state.score());
        view.set_controls_enabled(true);
        view.set_round_result(format::PROMPT, Tone::Neutral);
        view.set_status(format::LOADED, Tone::Positive);
    }

    fn present_end(&self, summary: &FinalSummary, view: &mut dyn Presenter) {
        info!(ticker = %summary.ticker, score = summary.score, "series exhausted");
        view.set_controls_enabled(false);
        view.set_round_result(&format::game_over_message(summary.score), Tone::Negative);
    }
}
