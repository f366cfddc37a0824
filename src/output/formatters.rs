//! Formatting utilities for terminal output

use crate::core::Guess;
use crate::driver::Activation;
use std::time::Duration;

/// `CRANE  -.X--  ⬜🟨🟩⬜⬜`
#[must_use]
pub fn guess_line(guess: &Guess) -> String {
    format!(
        "{}  {}  {}",
        guess.word.to_uppercase(),
        guess.result_code,
        guess.result_code.to_emoji()
    )
}

/// Offset relative to the start of typing, e.g. `+1000ms`
#[must_use]
pub fn format_offset(offset: Duration) -> String {
    format!("+{}ms", offset.as_millis())
}

/// One line of a key plan: `   +400ms  press a`
#[must_use]
pub fn activation_line(activation: &Activation) -> String {
    format!(
        "{:>9}  {}",
        format_offset(activation.offset),
        activation.action
    )
}

/// Proportional timeline marker, `█` at the activation's position
#[must_use]
pub fn timeline(offset: Duration, total: Duration, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let position = if total.is_zero() {
        0
    } else {
        // Cast is safe: the ratio is at most 1
        ((offset.as_secs_f64() / total.as_secs_f64()) * (width - 1) as f64).round() as usize
    };
    let position = position.min(width - 1);
    format!(
        "{}█{}",
        "░".repeat(position),
        "░".repeat(width - 1 - position)
    )
}
