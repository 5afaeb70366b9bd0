//! Help overlay: keyboard shortcuts and rules.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::theme;
use crate::ui::centered_rect;

pub fn render(f: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Help ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Keys");
    key(&mut lines, "Enter", "Load the typed ticker symbol");
    key(&mut lines, "↑ / k", "Guess up");
    key(&mut lines, "↓ / j", "Guess down");
    key(&mut lines, "s", "Stop the game");
    key(&mut lines, "Esc", "Switch between symbol input and game");
    key(&mut lines, "?", "Toggle this help");
    key(&mut lines, "q / Ctrl+C", "Quit (q only outside the input line)");
    lines.push(Line::from(""));

    section(&mut lines, "Rules");
    key(&mut lines, "", "A random day from the last 100 calendar days becomes \"today\".");
    key(&mut lines, "", "Call whether the next trading day closes Up or Down.");
    key(&mut lines, "", "An unchanged close counts as Down.");
    key(&mut lines, "", "One point per correct call; the game ends at the latest day.");

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>12}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
