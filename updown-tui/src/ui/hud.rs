//! Heads-up display: ticker, "today", close and score.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use updown_core::format::format_usd;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let view = &app.view;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted());

    let (date, close) = match &view.today {
        Some(bar) => (bar.label(), format!("${}", format_usd(bar.close))),
        None => ("—".to_string(), "—".to_string()),
    };

    let controls = if view.controls_enabled {
        Span::styled("↑ Up  ↓ Down  s Stop", theme::accent())
    } else {
        Span::styled("↑ Up  ↓ Down  s Stop", theme::muted())
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", view.ticker), theme::accent_bold()),
        Span::styled("  Today ", theme::muted()),
        Span::styled(date, theme::text()),
        Span::styled("  Close ", theme::muted()),
        Span::styled(close, theme::text()),
        Span::styled("  Score ", theme::muted()),
        Span::styled(view.score.to_string(), theme::positive()),
        Span::raw("    "),
        controls,
    ]);

    f.render_widget(Paragraph::new(line).block(block), area);
}
