//! Reference feedback rules
//!
//! Computes the evaluations the puzzle would reveal for a guess. The board
//! simulator uses this to paint tiles the way the real page does.

use super::Evaluation;
use rustc_hash::FxHashMap;

/// Evaluate `guess` against `answer`, tile by tile
///
/// Implements the puzzle's duplicate-letter rules:
/// 1. First pass: exact matches are correct and leave the answer's letter pool
/// 2. Second pass: remaining letters are present while the pool still has them
///
/// Comparison is case-insensitive. Tiles past the end of the answer are absent.
///
/// # Examples
/// ```
/// use wordle_pilot::core::{evaluate, Evaluation::*};
///
/// // ROBOT vs FLOOR: first O is misplaced, second O is in place
/// assert_eq!(
///     evaluate("robot", "floor"),
///     vec![Present, Present, Absent, Correct, Absent]
/// );
/// ```
#[must_use]
pub fn evaluate(guess: &str, answer: &str) -> Vec<Evaluation> {
    let guess: Vec<char> = guess.chars().flat_map(char::to_lowercase).collect();
    let answer: Vec<char> = answer.chars().flat_map(char::to_lowercase).collect();

    let mut result = vec![Evaluation::Absent; guess.len()];
    let mut available: FxHashMap<char, usize> = FxHashMap::default();
    for &letter in &answer {
        *available.entry(letter).or_insert(0) += 1;
    }

    // First pass: correct positions
    for (i, &letter) in guess.iter().enumerate() {
        if answer.get(i) == Some(&letter) {
            result[i] = Evaluation::Correct;
            if let Some(count) = available.get_mut(&letter) {
                *count = count.saturating_sub(1);
            }
        }
    }

    // Second pass: present elsewhere, from what is left
    for (i, &letter) in guess.iter().enumerate() {
        if result[i] == Evaluation::Correct {
            continue;
        }
        if let Some(count) = available.get_mut(&letter)
            && *count > 0
        {
            result[i] = Evaluation::Present;
            *count -= 1;
        }
    }

    result
}
