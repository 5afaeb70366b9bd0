//! Parrot/neon theme tokens.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (primary highlights, focus)
//! - **Positive**: Neon green (correct calls, up days)
//! - **Negative**: Hot pink (wrong calls, down days, errors)
//! - **Warning**: Neon orange (loading, alerts)
//! - **Neutral**: Cool purple (prompts, secondary info)
//! - **Muted**: Steel blue (hints, disabled controls)

use ratatui::style::{Color, Modifier, Style};

use updown_core::presenter::Tone;

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn panel_border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(focused: bool) -> Style {
    if focused {
        accent_bold()
    } else {
        muted()
    }
}

/// Style for a message carrying a presenter tone.
pub fn tone(tone: Tone) -> Style {
    match tone {
        Tone::Neutral => neutral(),
        Tone::Positive => positive(),
        Tone::Negative => negative(),
    }
}

/// Green for a strictly higher close, pink otherwise.
pub fn direction_color(went_up: bool) -> Color {
    if went_up {
        POSITIVE
    } else {
        NEGATIVE
    }
}
