//! Puzzle state snapshots
//!
//! A [`PuzzleState`] is rebuilt from the page on every extraction and never
//! mutated afterwards. Its JSON form is the solver wire format:
//!
//! ```json
//! {"guesses":[{"word":"CRANE","results":"-.X--"}]}
//! ```

use super::ResultCode;
use crate::diagnostics::Diagnostic;
use serde::{Deserialize, Serialize};

/// One submitted row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    pub word: String,
    #[serde(rename = "results")]
    pub result_code: ResultCode,
}

impl Guess {
    /// # Panics
    /// Panics in debug mode if the code and word lengths differ
    #[must_use]
    pub fn new(word: impl Into<String>, result_code: ResultCode) -> Self {
        let word = word.into();
        debug_assert_eq!(
            word.chars().count(),
            result_code.len(),
            "result code must have one symbol per letter"
        );
        Self { word, result_code }
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.result_code.is_solved()
    }
}

/// Ordered guess history, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleState {
    pub guesses: Vec<Guess>,
    /// Non-fatal problems seen while reading the board
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

impl PuzzleState {
    #[must_use]
    pub const fn new(guesses: Vec<Guess>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            guesses,
            diagnostics,
        }
    }

    #[must_use]
    pub fn attempts(&self) -> usize {
        self.guesses.len()
    }

    /// The most recent row is all correct
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.guesses.last().is_some_and(Guess::is_solved)
    }

    #[must_use]
    pub fn last(&self) -> Option<&Guess> {
        self.guesses.last()
    }

    /// Serialize to the solver wire format
    ///
    /// # Errors
    /// Returns an error only if serialization itself fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guess(word: &str, code: &str) -> Guess {
        Guess::new(word, code.parse().unwrap())
    }

    #[test]
    fn empty_state() {
        let state = PuzzleState::default();
        assert_eq!(state.attempts(), 0);
        assert!(!state.is_solved());
        assert_eq!(state.to_json().unwrap(), r#"{"guesses":[]}"#);
    }

    #[test]
    fn solved_looks_at_last_row_only() {
        let state = PuzzleState::new(
            vec![guess("CRANE", "XXXXX"), guess("SLATE", "--X-X")],
            Vec::new(),
        );
        assert!(!state.is_solved());

        let state = PuzzleState::new(
            vec![guess("SLATE", "--X-X"), guess("CRANE", "XXXXX")],
            Vec::new(),
        );
        assert!(state.is_solved());
        assert_eq!(state.attempts(), 2);
    }

    #[test]
    fn wire_format_uses_results_key() {
        let state = PuzzleState::new(
            vec![guess("CRANE", "-.X--")],
            vec![Diagnostic::UnrecognizedEvaluation {
                row: 0,
                column: 0,
                value: None,
            }],
        );
        assert_eq!(
            state.to_json().unwrap(),
            r#"{"guesses":[{"word":"CRANE","results":"-.X--"}]}"#
        );
    }

    #[test]
    fn wire_format_round_trips_guesses() {
        let parsed: PuzzleState =
            serde_json::from_str(r#"{"guesses":[{"word":"rusty","results":"-X-.-"}]}"#).unwrap();
        assert_eq!(parsed.guesses, vec![guess("rusty", "-X-.-")]);
        assert!(parsed.diagnostics.is_empty());
    }
}
