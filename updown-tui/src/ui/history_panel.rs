//! Guess history for the current game, newest first.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use updown_core::format::format_usd;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let title = format!(" History {}/{} ", app.correct_count(), app.history.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(title)
        .title_style(theme::muted());

    let visible = block.inner(area).height as usize;
    let lines: Vec<Line> = app
        .history
        .iter()
        .rev()
        .take(visible)
        .map(|round| {
            let mark = if round.correct {
                Span::styled("✓ ", theme::positive())
            } else {
                Span::styled("✗ ", theme::negative())
            };
            let arrow = if round.went_up { "▲" } else { "▼" };
            Line::from(vec![
                mark,
                Span::styled(round.next.label(), theme::muted()),
                Span::raw(" "),
                Span::styled(
                    format!("{arrow} ${}", format_usd(round.next.close)),
                    Style::default().fg(theme::direction_color(round.went_up)),
                ),
                Span::styled(format!("  ({})", round.guess.label()), theme::muted()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
