//! Player-facing text: prices and game messages.

use crate::game::RoundResult;

pub const LOADING: &str = "Loading data…";
pub const LOADED: &str = "Loaded successfully.";
pub const PROMPT: &str = "Make a prediction: will the next day go Up or Down?";
pub const NO_MORE_DAYS: &str = "No more future days available. Game over.";

/// Two decimals with thousands separators: `1234.5` → `1,234.50`.
pub fn format_usd(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

pub fn direction_label(went_up: bool) -> &'static str {
    if went_up {
        "Up"
    } else {
        "Down"
    }
}

pub fn round_result_message(round: &RoundResult) -> String {
    let verdict = if round.correct { "Correct!" } else { "Wrong." };
    format!(
        "{verdict} Next close: ${} ({})",
        format_usd(round.next.close),
        direction_label(round.went_up)
    )
}

pub fn game_over_message(score: u32) -> String {
    format!("Game over. Final score: {score}. No more days to reveal.")
}

pub fn stopped_message(score: u32) -> String {
    format!("Game ended. Final score: {score}.")
}
