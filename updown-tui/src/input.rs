//! Keyboard input dispatch: global keys → overlays → focus-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use updown_core::game::Guess;

use crate::app::{AppState, Focus, Overlay};

/// Longest symbol the input line accepts.
pub const MAX_SYMBOL_LEN: usize = 12;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Ctrl+C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.running = false;
        return;
    }

    // 2. Overlays consume input first.
    if app.overlay == Overlay::Help {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            app.overlay = Overlay::None;
        }
        return;
    }

    if key.code == KeyCode::Char('?') {
        app.overlay = Overlay::Help;
        return;
    }

    // 3. Focus-specific keys.
    match app.focus {
        Focus::Input => handle_input_key(app, key),
        Focus::Game => handle_game_key(app, key),
    }
}

fn handle_input_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Esc => {
            if app.input.is_empty() && app.view.game_visible {
                app.focus = Focus::Game;
            } else {
                app.input.clear();
            }
        }
        KeyCode::Tab if app.view.game_visible => app.focus = Focus::Game,
        KeyCode::Char(c) if is_symbol_char(c) && app.input.len() < MAX_SYMBOL_LEN => {
            app.input.push(c.to_ascii_uppercase());
        }
        _ => {}
    }
}

fn handle_game_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Up | KeyCode::Char('k') => app.guess(Guess::Up),
        KeyCode::Down | KeyCode::Char('j') => app.guess(Guess::Down),
        KeyCode::Char('s') => app.stop(),
        KeyCode::Esc | KeyCode::Tab | KeyCode::Char('/') => app.focus = Focus::Input,
        _ => {}
    }
}

/// Characters that can appear in an exchange symbol (`BRK.B`, `RDS-A`).
fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-'
}
