//! Board state extraction
//!
//! Walks the component tree top to bottom and turns every submitted row into a
//! [`Guess`]. Rows fill sequentially, so the first row without a submitted word
//! ends the walk and later rows are never inspected.

use crate::core::{Evaluation, Guess, PuzzleState, ResultCode};
use crate::diagnostics::Diagnostic;
use crate::error::{ExtractError, StructureNotFound};
use crate::surface::{
    EVALUATION_ATTR, LETTERS_ATTR, NodeId, ROW_TAG, Selector, Surface, TILE_TAG, app_root,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What to do with a tile whose evaluation is not correct/present/absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    /// Encode the tile as `?`; the row keeps one symbol per letter
    #[default]
    Sentinel,
    /// Treat the row as not yet submitted and stop collecting
    AbortRow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub unknown_policy: UnknownPolicy,
}

/// Reads a [`PuzzleState`] off a [`Surface`]
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

enum RowOutcome {
    Submitted(Guess),
    /// Empty, still being typed, or not encodable: nothing below it counts
    Stop,
}

impl Extractor {
    #[must_use]
    pub const fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Snapshot the submitted guesses, oldest first
    ///
    /// Pure read: the surface is not modified. Unrecognized tile evaluations
    /// are reported in [`PuzzleState::diagnostics`] rather than failing.
    ///
    /// # Errors
    /// Returns `StructureNotFound` if the app element, its shadow root, or a
    /// submitted row's shadow root is missing.
    pub fn extract<S: Surface + ?Sized>(&self, surface: &S) -> Result<PuzzleState, ExtractError> {
        let root = app_root(surface)?;
        let mut guesses = Vec::new();
        let mut diagnostics = Vec::new();

        for (index, row) in surface
            .query_all(root, &Selector::tag(ROW_TAG))
            .into_iter()
            .enumerate()
        {
            match self.read_row(surface, index, row, &mut diagnostics)? {
                RowOutcome::Submitted(guess) => guesses.push(guess),
                RowOutcome::Stop => break,
            }
        }

        debug!(rows = guesses.len(), "extracted board");
        Ok(PuzzleState::new(guesses, diagnostics))
    }

    fn read_row<S: Surface + ?Sized>(
        &self,
        surface: &S,
        index: usize,
        row: NodeId,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<RowOutcome, ExtractError> {
        let word = match surface.attribute(row, LETTERS_ATTR) {
            Some(word) if !word.is_empty() => word,
            _ => return Ok(RowOutcome::Stop),
        };

        let shadow = surface
            .shadow_root(row)
            .ok_or_else(|| StructureNotFound::new(format!("{ROW_TAG} {index} shadow root")))?;
        let evaluations: Vec<Evaluation> = surface
            .query_all(shadow, &Selector::tag(TILE_TAG))
            .into_iter()
            .map(|tile| Evaluation::from_attribute(surface.attribute(tile, EVALUATION_ATTR)))
            .collect();

        if evaluations.len() != word.chars().count() {
            debug!(
                row = index,
                word,
                tiles = evaluations.len(),
                "tile count differs from word; row not submitted"
            );
            return Ok(RowOutcome::Stop);
        }
        // Typed but not yet revealed
        if evaluations.iter().all(|e| *e == Evaluation::Unknown(None)) {
            debug!(row = index, word, "row not evaluated yet");
            return Ok(RowOutcome::Stop);
        }

        let mut abort = false;
        for (column, evaluation) in evaluations.iter().enumerate() {
            if let Evaluation::Unknown(value) = evaluation {
                let diagnostic = Diagnostic::UnrecognizedEvaluation {
                    row: index,
                    column,
                    value: value.clone(),
                };
                warn!("{diagnostic}");
                diagnostics.push(diagnostic);
                abort |= self.config.unknown_policy == UnknownPolicy::AbortRow;
            }
        }
        if abort {
            return Ok(RowOutcome::Stop);
        }

        Ok(RowOutcome::Submitted(Guess::new(
            word,
            ResultCode::from_evaluations(&evaluations),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{APP_TAG, BoardSimulator, Dom, Element};

    fn element(tag: &str, attributes: &[(&str, &str)]) -> Element {
        Element {
            tag: tag.to_string(),
            attributes: attributes
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Element::default()
        }
    }

    fn row(word: &str, evaluations: &[Option<&str>]) -> Element {
        let tiles = evaluations
            .iter()
            .map(|e| match *e {
                Some(value) => element(TILE_TAG, &[(EVALUATION_ATTR, value)]),
                None => element(TILE_TAG, &[]),
            })
            .collect();
        Element {
            shadow: Some(tiles),
            ..element(ROW_TAG, &[(LETTERS_ATTR, word)])
        }
    }

    fn board(rows: Vec<Element>) -> Dom {
        Dom::from_elements(&[Element {
            shadow: Some(rows),
            ..element(APP_TAG, &[])
        }])
    }

    fn codes(state: &PuzzleState) -> Vec<(String, String)> {
        state
            .guesses
            .iter()
            .map(|g| (g.word.clone(), g.result_code.to_string()))
            .collect()
    }

    #[test]
    fn crane_scenario() {
        let dom = board(vec![
            row(
                "CRANE",
                &[
                    Some("absent"),
                    Some("present"),
                    Some("correct"),
                    Some("absent"),
                    Some("absent"),
                ],
            ),
            row("", &[None; 5]),
        ]);

        let state = Extractor::default().extract(&dom).unwrap();
        assert_eq!(codes(&state), vec![("CRANE".into(), "-.X--".into())]);
        assert!(state.diagnostics.is_empty());
    }

    #[test]
    fn empty_board_has_no_guesses() {
        let dom = board(vec![row("", &[None; 5]), row("", &[None; 5])]);
        let state = Extractor::default().extract(&dom).unwrap();
        assert!(state.guesses.is_empty());
    }

    #[test]
    fn board_without_rows_has_no_guesses() {
        let state = Extractor::default().extract(&board(Vec::new())).unwrap();
        assert_eq!(state, PuzzleState::default());
    }

    #[test]
    fn stops_at_first_empty_row() {
        // The row after the gap has no shadow root: reading it would fail
        let dom = board(vec![
            row("RUST", &[Some("correct"); 4]),
            row("", &[None; 4]),
            element(ROW_TAG, &[(LETTERS_ATTR, "GHOST")]),
        ]);

        let state = Extractor::default().extract(&dom).unwrap();
        assert_eq!(codes(&state), vec![("RUST".into(), "XXXX".into())]);
    }

    #[test]
    fn missing_letters_attribute_counts_as_empty() {
        let dom = board(vec![element(ROW_TAG, &[])]);
        assert!(Extractor::default().extract(&dom).unwrap().guesses.is_empty());
    }

    #[test]
    fn rows_are_oldest_first() {
        let dom = board(vec![
            row("SLATE", &[Some("absent"); 5]),
            row("CRONY", &[Some("present"); 5]),
        ]);
        let state = Extractor::default().extract(&dom).unwrap();
        assert_eq!(
            codes(&state),
            vec![
                ("SLATE".into(), "-----".into()),
                ("CRONY".into(), ".....".into())
            ]
        );
    }

    #[test]
    fn code_length_always_matches_word() {
        let dom = board(vec![
            row("ab", &[Some("correct"), Some("absent")]),
            row("abc", &[Some("present"), Some("weird"), None]),
        ]);
        let state = Extractor::default().extract(&dom).unwrap();
        for guess in &state.guesses {
            assert_eq!(guess.result_code.len(), guess.word.chars().count());
        }
        assert_eq!(state.guesses.len(), 2);
    }

    #[test]
    fn unknown_evaluation_uses_sentinel_and_reports() {
        let dom = board(vec![row(
            "CRANE",
            &[
                Some("absent"),
                Some("tbd"),
                Some("correct"),
                None,
                Some("absent"),
            ],
        )]);

        let state = Extractor::default().extract(&dom).unwrap();
        assert_eq!(codes(&state), vec![("CRANE".into(), "-?X?-".into())]);
        assert_eq!(
            state.diagnostics,
            vec![
                Diagnostic::UnrecognizedEvaluation {
                    row: 0,
                    column: 1,
                    value: Some("tbd".into())
                },
                Diagnostic::UnrecognizedEvaluation {
                    row: 0,
                    column: 3,
                    value: None
                },
            ]
        );
    }

    #[test]
    fn abort_row_policy_drops_row_and_stops() {
        let dom = board(vec![
            row("SLATE", &[Some("absent"); 5]),
            row("CRANE", &[Some("absent"), Some("flipping"), None, None, None]),
            row("NEVER", &[Some("correct"); 5]),
        ]);

        let extractor = Extractor::new(ExtractorConfig {
            unknown_policy: UnknownPolicy::AbortRow,
        });
        let state = extractor.extract(&dom).unwrap();
        assert_eq!(codes(&state), vec![("SLATE".into(), "-----".into())]);
        assert_eq!(state.diagnostics.len(), 4);
    }

    #[test]
    fn typed_but_unrevealed_row_is_not_a_guess() {
        let mut board = BoardSimulator::new("crane");
        for key in ["s", "l", "a", "t", "e"] {
            board.press(key);
        }
        let state = Extractor::default().extract(&board).unwrap();
        assert!(state.guesses.is_empty());
        assert!(state.diagnostics.is_empty());
    }

    #[test]
    fn short_row_is_not_a_guess() {
        let dom = board(vec![row("CRANE", &[Some("absent"); 3])]);
        assert!(Extractor::default().extract(&dom).unwrap().guesses.is_empty());
    }

    #[test]
    fn missing_app_is_structure_error() {
        let err = Extractor::default().extract(&Dom::new()).unwrap_err();
        assert_eq!(
            err,
            ExtractError::StructureNotFound(StructureNotFound::new("game-app"))
        );
    }

    #[test]
    fn missing_row_shadow_is_structure_error() {
        let dom = board(vec![element(ROW_TAG, &[(LETTERS_ATTR, "CRANE")])]);
        let err = Extractor::default().extract(&dom).unwrap_err();
        assert_eq!(
            err.to_string(),
            "page structure not found: game-row 0 shadow root"
        );
    }

    #[test]
    fn extraction_reads_simulated_game() {
        let mut board = BoardSimulator::new("slate");
        for key in ["c", "r", "a", "n", "e", "↵"] {
            board.press(key);
        }
        let state = Extractor::default().extract(&board).unwrap();
        assert_eq!(codes(&state), vec![("crane".into(), "--X-X".into())]);
    }
}
