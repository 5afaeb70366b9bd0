//! Bottom status bar: last status message and key hints.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Focus};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    let hints = match app.focus {
        Focus::Input => " Enter:Load  Esc:Game  ?:Help  Ctrl+C:Quit",
        Focus::Game => " ↑/k:Up  ↓/j:Down  s:Stop  Esc:New symbol  ?:Help  q:Quit",
    };
    spans.push(Span::styled(hints, theme::muted()));

    spans.push(Span::raw(" | "));

    if let Some((msg, tone)) = &app.view.status {
        spans.push(Span::styled(msg.as_str(), theme::tone(*tone)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
