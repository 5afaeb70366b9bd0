//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels;
//! the game itself lives in the [`GameController`], which talks to the
//! screen only through [`ViewState`].

use std::sync::mpsc::{Receiver, Sender};

use tracing::{debug, warn};

use updown_core::controller::{GameController, LoadOutcome};
use updown_core::data::FetchError;
use updown_core::domain::DayBar;
use updown_core::game::{Guess, RevealOutcome, RoundResult};
use updown_core::presenter::{Presenter, Tone};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Where keystrokes go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Typing a ticker symbol.
    Input,
    /// Up / Down / Stop keys.
    Game,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
}

/// Everything the game area shows. Written only through [`Presenter`].
#[derive(Debug, Default)]
pub struct ViewState {
    pub game_visible: bool,
    pub ticker: String,
    /// Chart points, ascending by date.
    pub chart: Vec<DayBar>,
    pub today: Option<DayBar>,
    pub score: u32,
    pub status: Option<(String, Tone)>,
    pub round_result: Option<(String, Tone)>,
    pub controls_enabled: bool,
}

impl Presenter for ViewState {
    fn reset(&mut self) {
        self.chart.clear();
        self.today = None;
        self.score = 0;
        self.round_result = None;
        self.controls_enabled = false;
    }

    fn set_game_visible(&mut self, visible: bool) {
        self.game_visible = visible;
    }

    fn render(&mut self, ticker: &str, window: &[DayBar]) {
        self.ticker = ticker.to_string();
        self.chart = window.to_vec();
    }

    fn append_point(&mut self, bar: &DayBar) {
        self.chart.push(*bar);
    }

    fn set_today(&mut self, ticker: &str, today: Option<&DayBar>) {
        self.ticker = ticker.to_string();
        self.today = today.copied();
    }

    fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    fn set_status(&mut self, message: &str, tone: Tone) {
        self.status = (!message.is_empty()).then(|| (message.to_string(), tone));
    }

    fn set_round_result(&mut self, message: &str, tone: Tone) {
        self.round_result = (!message.is_empty()).then(|| (message.to_string(), tone));
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub focus: Focus,
    pub overlay: Overlay,
    pub input: String,

    pub controller: GameController,
    pub view: ViewState,
    /// Rounds played in the current game, oldest first.
    pub history: Vec<RoundResult>,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
}

impl AppState {
    pub fn new(
        controller: GameController,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        let mut view = ViewState::default();
        view.set_status("Enter a ticker symbol and press Enter.", Tone::Neutral);
        Self {
            running: true,
            focus: Focus::Input,
            overlay: Overlay::None,
            input: String::new(),
            controller,
            view,
            history: Vec::new(),
            worker_tx,
            worker_rx,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.controller.pending().is_some()
    }

    /// Submit the input line as a ticker and queue its fetch.
    pub fn submit_input(&mut self) {
        let ticket = match self.controller.submit_ticker(&self.input, &mut self.view) {
            Ok(ticket) => ticket,
            Err(err) => {
                debug!(error = %err, "ticker rejected");
                return;
            }
        };

        self.input.clear();
        self.history.clear();
        if let Err(e) = self.worker_tx.send(WorkerCommand::Fetch {
            ticket: ticket.clone(),
        }) {
            warn!(error = %e, "worker unavailable");
            let result = Err(FetchError::Network("(worker unavailable)".into()));
            self.controller.complete_load(&ticket, result, &mut self.view);
        }
    }

    pub fn handle_worker_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Fetched { ticket, result } => {
                let outcome = self.controller.complete_load(&ticket, result, &mut self.view);
                if matches!(outcome, LoadOutcome::Started { .. }) {
                    self.focus = Focus::Game;
                }
            }
        }
    }

    pub fn guess(&mut self, guess: Guess) {
        match self.controller.guess(guess, &mut self.view) {
            Ok(RevealOutcome::Revealed { round, .. }) => self.history.push(round),
            Ok(RevealOutcome::NoMoreDays(_)) => {}
            Err(err) => debug!(error = %err, "guess ignored"),
        }
    }

    pub fn stop(&mut self) {
        if let Err(err) = self.controller.stop(&mut self.view) {
            debug!(error = %err, "stop ignored");
        }
    }

    /// Number of correct calls so far.
    pub fn correct_count(&self) -> usize {
        self.history.iter().filter(|r| r.correct).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use std::sync::mpsc;
    use updown_core::domain::Series;
    use updown_core::game::{FixedClock, Phase, RoundRules};
    use updown_core::rng::RngSource;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    /// Closes rise toward the present. The two newest days are too recent to
    /// start on, so every round has at least two reveals.
    fn rising_series() -> Series {
        Series::from_bars(
            (0..30u64)
                .map(|i| {
                    let age = if i < 2 { i } else { 6 + i };
                    DayBar::new(today() - Days::new(age), 200.0 - i as f64)
                })
                .collect(),
        )
    }

    fn app() -> (AppState, Receiver<WorkerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let controller = GameController::new(
            RoundRules::default(),
            Box::new(FixedClock(today())),
            RngSource::from_seed(Some(1)),
        );
        (AppState::new(controller, cmd_tx, resp_rx), cmd_rx)
    }

    fn load(app: &mut AppState, cmd_rx: &Receiver<WorkerCommand>, symbol: &str) {
        app.input = symbol.to_string();
        app.submit_input();
        let Ok(WorkerCommand::Fetch { ticket }) = cmd_rx.try_recv() else {
            panic!("expected a fetch command");
        };
        app.handle_worker_response(WorkerResponse::Fetched {
            ticket,
            result: Ok(rising_series()),
        });
    }

    #[test]
    fn view_state_follows_presenter_calls() {
        let mut view = ViewState::default();
        let bar = DayBar::new(today(), 12.5);
        view.render("IBM", &[bar]);
        view.append_point(&bar);
        view.set_score(3);
        view.set_controls_enabled(true);
        assert_eq!(view.chart.len(), 2);

        view.reset();
        assert!(view.chart.is_empty());
        assert_eq!(view.score, 0);
        assert!(!view.controls_enabled);

        view.set_round_result("", Tone::Neutral);
        assert!(view.round_result.is_none());
    }

    #[test]
    fn blank_input_does_not_fetch() {
        let (mut app, cmd_rx) = app();
        app.input = "   ".into();
        app.submit_input();
        assert!(cmd_rx.try_recv().is_err());
        assert!(!app.is_loading());
        assert_eq!(
            app.view.status,
            Some(("Please enter a stock ticker symbol.".into(), Tone::Negative))
        );
    }

    #[test]
    fn load_moves_focus_to_game() {
        let (mut app, cmd_rx) = app();
        app.input = "ibm".into();
        app.submit_input();
        assert!(app.is_loading());
        assert!(app.input.is_empty());
        assert_eq!(app.focus, Focus::Input);

        let Ok(WorkerCommand::Fetch { ticket }) = cmd_rx.try_recv() else {
            panic!("expected a fetch command");
        };
        assert_eq!(ticket.ticker, "IBM");
        app.handle_worker_response(WorkerResponse::Fetched {
            ticket,
            result: Ok(rising_series()),
        });
        assert_eq!(app.focus, Focus::Game);
        assert!(app.view.game_visible);
        assert!(app.view.controls_enabled);
        assert_eq!(app.view.chart.len(), 8);
    }

    #[test]
    fn guesses_build_history() {
        let (mut app, cmd_rx) = app();
        load(&mut app, &cmd_rx, "IBM");

        app.guess(Guess::Up);
        app.guess(Guess::Down);
        assert_eq!(app.history.len(), 2);
        assert_eq!(app.correct_count(), 1);
        assert_eq!(app.view.score, 1);

        app.stop();
        assert_eq!(app.controller.state().phase(), Phase::Ended);
        assert!(!app.view.controls_enabled);

        // Guesses after the game ended change nothing.
        app.guess(Guess::Up);
        assert_eq!(app.history.len(), 2);
    }

    #[test]
    fn failed_fetch_keeps_input_focus() {
        let (mut app, cmd_rx) = app();
        app.input = "ZZZZ".into();
        app.submit_input();
        let Ok(WorkerCommand::Fetch { ticket }) = cmd_rx.try_recv() else {
            panic!("expected a fetch command");
        };
        app.handle_worker_response(WorkerResponse::Fetched {
            ticket,
            result: Err(FetchError::RateLimited {
                detail: String::new(),
            }),
        });
        assert_eq!(app.focus, Focus::Input);
        assert!(!app.view.game_visible);
        assert_eq!(
            app.view.status,
            Some((
                "API limit reached. Please wait a minute and try again.".into(),
                Tone::Negative
            ))
        );
    }

    #[test]
    fn dead_worker_fails_load_instead_of_hanging() {
        let (mut app, cmd_rx) = app();
        drop(cmd_rx);
        app.input = "IBM".into();
        app.submit_input();
        assert!(!app.is_loading());
        let (msg, tone) = app.view.status.clone().unwrap();
        assert!(msg.starts_with("Network error"));
        assert_eq!(tone, Tone::Negative);
    }

    #[test]
    fn new_history_per_game() {
        let (mut app, cmd_rx) = app();
        load(&mut app, &cmd_rx, "IBM");
        app.guess(Guess::Up);
        load(&mut app, &cmd_rx, "MSFT");
        assert!(app.history.is_empty());
        assert_eq!(app.view.ticker, "MSFT");
    }
}
