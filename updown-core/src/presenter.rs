//! Presentation surface driven by the controller.
//!
//! The core only ever calls into a presenter; it never reads anything back.
//! The TUI view model and the CLI line printer are the two real
//! implementations.

use crate::domain::DayBar;

/// Emphasis for status and round-result text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Positive,
    Negative,
}

pub trait Presenter {
    /// Clear the chart, HUD and round result; disable controls.
    fn reset(&mut self);

    /// Show or hide the whole game area.
    fn set_game_visible(&mut self, visible: bool);

    /// Draw a fresh chart from bars ascending by date.
    fn render(&mut self, ticker: &str, window: &[DayBar]);

    /// Extend the chart by one newly revealed day.
    fn append_point(&mut self, bar: &DayBar);

    /// Update the HUD's ticker, "today" date and close.
    fn set_today(&mut self, ticker: &str, today: Option<&DayBar>);

    fn set_score(&mut self, score: u32);

    fn set_status(&mut self, message: &str, tone: Tone);

    fn set_round_result(&mut self, message: &str, tone: Tone);

    /// Enable or disable the Up / Down / Stop controls.
    fn set_controls_enabled(&mut self, enabled: bool);
}

/// One presenter call, as captured by [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Reset,
    GameVisible(bool),
    Render { ticker: String, window: Vec<DayBar> },
    AppendPoint(DayBar),
    Today { ticker: String, today: Option<DayBar> },
    Score(u32),
    Status(String, Tone),
    RoundResult(String, Tone),
    ControlsEnabled(bool),
}

/// Headless presenter that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub calls: Vec<PresenterCall>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent status message.
    pub fn last_status(&self) -> Option<(&str, Tone)> {
        self.calls.iter().rev().find_map(|c| match c {
            PresenterCall::Status(msg, tone) => Some((msg.as_str(), *tone)),
            _ => None,
        })
    }

    /// Most recent round-result message.
    pub fn last_round_result(&self) -> Option<(&str, Tone)> {
        self.calls.iter().rev().find_map(|c| match c {
            PresenterCall::RoundResult(msg, tone) => Some((msg.as_str(), *tone)),
            _ => None,
        })
    }

    pub fn last_score(&self) -> Option<u32> {
        self.calls.iter().rev().find_map(|c| match c {
            PresenterCall::Score(s) => Some(*s),
            _ => None,
        })
    }

    pub fn game_visible(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                PresenterCall::GameVisible(v) => Some(*v),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn controls_enabled(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                PresenterCall::ControlsEnabled(v) => Some(*v),
                PresenterCall::Reset => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Points on the chart: the last render plus everything appended since.
    pub fn chart_points(&self) -> Vec<DayBar> {
        let mut points = Vec::new();
        for call in &self.calls {
            match call {
                PresenterCall::Reset => points.clear(),
                PresenterCall::Render { window, .. } => points = window.clone(),
                PresenterCall::AppendPoint(bar) => points.push(*bar),
                _ => {}
            }
        }
        points
    }
}

impl Presenter for RecordingPresenter {
    fn reset(&mut self) {
        self.calls.push(PresenterCall::Reset);
    }

    fn set_game_visible(&mut self, visible: bool) {
        self.calls.push(PresenterCall::GameVisible(visible));
    }

    fn render(&mut self, ticker: &str, window: &[DayBar]) {
        self.calls.push(PresenterCall::Render {
            ticker: ticker.to_string(),
            window: window.to_vec(),
        });
    }

    fn append_point(&mut self, bar: &DayBar) {
        self.calls.push(PresenterCall::AppendPoint(*bar));
    }

    fn set_today(&mut self, ticker: &str, today: Option<&DayBar>) {
        self.calls.push(PresenterCall::Today {
            ticker: ticker.to_string(),
            today: today.copied(),
        });
    }

    fn set_score(&mut self, score: u32) {
        self.calls.push(PresenterCall::Score(score));
    }

    fn set_status(&mut self, message: &str, tone: Tone) {
        self.calls.push(PresenterCall::Status(message.to_string(), tone));
    }

    fn set_round_result(&mut self, message: &str, tone: Tone) {
        self.calls
            .push(PresenterCall::RoundResult(message.to_string(), tone));
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.calls.push(PresenterCall::ControlsEnabled(enabled));
    }
}
