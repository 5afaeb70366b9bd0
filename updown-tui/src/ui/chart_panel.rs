//! Closing-price line chart for the revealed days.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use updown_core::domain::DayBar;
use updown_core::format::format_usd;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, focused: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(format!(" {} Close ", app.view.ticker))
        .title_style(theme::panel_title(focused));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.view.chart.is_empty() {
        let hint = Line::from(Span::styled("No data yet.", theme::muted()));
        f.render_widget(Paragraph::new(hint), inner);
    } else {
        render_chart(f, inner, &app.view.ticker, &app.view.chart);
    }
}

/// Y-axis bounds with 5% padding; a flat series gets a band of ±1.
pub fn y_bounds(points: &[DayBar]) -> (f64, f64) {
    let min_y = points.iter().map(|b| b.close).fold(f64::INFINITY, f64::min);
    let max_y = points
        .iter()
        .map(|b| b.close)
        .fold(f64::NEG_INFINITY, f64::max);

    let span = max_y - min_y;
    let padding = if span > 0.0 { span * 0.05 } else { 1.0 };
    (min_y - padding, max_y + padding)
}

fn render_chart(f: &mut Frame, area: Rect, ticker: &str, points: &[DayBar]) {
    let (y_min, y_max) = y_bounds(points);
    let x_max = points.len().saturating_sub(1) as f64;

    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, bar)| (i as f64, bar.close))
        .collect();

    let dataset = Dataset::default()
        .name(format!("{ticker} Close"))
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(theme::ACCENT))
        .graph_type(GraphType::Line)
        .data(&data);

    let first = points.first().map(DayBar::label).unwrap_or_default();
    let last = points.last().map(DayBar::label).unwrap_or_default();

    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![
                    Span::styled(first, theme::muted()),
                    Span::styled(last, theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format_usd(y_min), theme::muted()),
                    Span::styled(format_usd(y_max), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
