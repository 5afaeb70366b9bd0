//! Top-level UI layout: input line, HUD, chart + history, round result, status bar.

pub mod chart_panel;
pub mod help_panel;
pub mod history_panel;
pub mod hud;
pub mod input_bar;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, Focus, Overlay};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    input_bar::render(f, chunks[0], app);

    if app.view.game_visible {
        draw_game(f, chunks[1], app);
    } else {
        draw_welcome(f, chunks[1]);
    }

    draw_round_result(f, chunks[2], app);
    status_bar::render(f, chunks[3], app);

    if app.overlay == Overlay::Help {
        help_panel::render(f, f.area());
    }
}

fn draw_game(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    hud::render(f, rows[0], app);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[1]);

    let focused = app.focus == Focus::Game;
    chart_panel::render(f, cols[0], app, focused);
    history_panel::render(f, cols[1], app);
}

fn draw_welcome(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" UpDown ")
        .title_style(theme::accent_bold());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Guess whether a stock closes higher or lower the next trading day.",
            theme::text(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  1. Type a ticker symbol (e.g. IBM) and press Enter",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  2. Press ↑ or k for Up, ↓ or j for Down",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  3. Press s to stop, ? for help",
            theme::muted(),
        )),
    ];

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

fn draw_round_result(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Result ")
        .title_style(theme::muted());

    let line = match &app.view.round_result {
        Some((msg, tone)) => Line::from(Span::styled(msg.as_str(), theme::tone(*tone))),
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line).block(block), area);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
