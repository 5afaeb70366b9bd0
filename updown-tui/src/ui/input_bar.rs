//! Ticker input line.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Focus};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.focus == Focus::Input;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(" Ticker ")
        .title_style(theme::panel_title(focused));

    let mut spans = vec![Span::styled("> ", theme::accent())];
    if app.input.is_empty() && !focused {
        spans.push(Span::styled("Esc to enter a new symbol", theme::muted()));
    } else {
        spans.push(Span::styled(app.input.as_str(), theme::text()));
    }
    if app.is_loading() {
        spans.push(Span::styled("  loading…", theme::warning()));
    }

    let inner = block.inner(area);
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);

    if focused && app.overlay == crate::app::Overlay::None {
        let x = inner.x + 2 + app.input.chars().count() as u16;
        f.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
    }
}
