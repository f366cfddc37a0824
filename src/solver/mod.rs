//! Solver boundary
//!
//! Choosing the next word is someone else's job. A [`Solver`] receives the
//! extracted [`PuzzleState`] and answers with a word, or with nothing when it
//! has no suggestion. [`perform_next_guess`] is the entry point a host trigger
//! calls once per guess cycle.

mod command;

pub use command::CommandSolver;

use crate::core::PuzzleState;
use crate::driver::{InputDriver, Typing};
use crate::error::{PilotError, SolverError};
use crate::schedule::Scheduler;
use crate::surface::Surface;
use std::collections::VecDeque;
use tracing::{info, warn};

/// Chooses the next guess from the board so far
pub trait Solver {
    /// `Ok(None)` means the solver has nothing to suggest
    ///
    /// # Errors
    /// Implementation-specific; see [`SolverError`].
    fn next_guess(&mut self, state: &PuzzleState) -> Result<Option<String>, SolverError>;
}

impl<F> Solver for F
where
    F: FnMut(&PuzzleState) -> Result<Option<String>, SolverError>,
{
    fn next_guess(&mut self, state: &PuzzleState) -> Result<Option<String>, SolverError> {
        self(state)
    }
}

/// Plays a fixed list of words in order, ignoring the board
#[derive(Debug, Clone, Default)]
pub struct ScriptedSolver {
    words: VecDeque<String>,
}

impl ScriptedSolver {
    pub fn new<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.words.len()
    }
}

impl Solver for ScriptedSolver {
    fn next_guess(&mut self, _state: &PuzzleState) -> Result<Option<String>, SolverError> {
        Ok(self.words.pop_front())
    }
}

/// Outcome of one guess cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextGuess {
    /// The last submitted row is all correct; the solver was not consulted
    Solved,
    /// The solver had no word to offer
    NoGuess,
    /// The solver's word is being typed
    Typing(Typing),
}

/// Extract, ask the solver, type its answer
///
/// Returns once the word is scheduled; it does not wait for the keys to land.
///
/// # Errors
/// Extraction, solver and driver failures are passed through unchanged.
pub fn perform_next_guess<S, C, V>(
    driver: &InputDriver<S, C>,
    solver: &mut V,
) -> Result<NextGuess, PilotError>
where
    S: Surface + Send + 'static,
    C: Scheduler + ?Sized,
    V: Solver + ?Sized,
{
    let state = driver.extract()?;
    if state.is_solved() {
        info!(attempts = state.attempts(), "puzzle already solved");
        return Ok(NextGuess::Solved);
    }

    let Some(word) = solver.next_guess(&state)? else {
        warn!("No guess available");
        return Ok(NextGuess::NoGuess);
    };

    info!(word = %word, attempt = state.attempts() + 1, "typing guess");
    Ok(NextGuess::Typing(driver.type_word(&word)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverConfig;
    use crate::error::DriverError;
    use crate::schedule::VirtualClock;
    use crate::surface::BoardSimulator;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn driver(answer: &str) -> InputDriver<BoardSimulator, VirtualClock> {
        InputDriver::new(
            Arc::new(Mutex::new(BoardSimulator::new(answer))),
            Arc::new(VirtualClock::new()),
            DriverConfig::default(),
        )
    }

    #[test]
    fn scripted_solver_plays_in_order() {
        let mut solver = ScriptedSolver::new(["crane", "slate"]);
        let state = PuzzleState::default();
        assert_eq!(solver.next_guess(&state).unwrap().as_deref(), Some("crane"));
        assert_eq!(solver.remaining(), 1);
        assert_eq!(solver.next_guess(&state).unwrap().as_deref(), Some("slate"));
        assert_eq!(solver.next_guess(&state).unwrap(), None);
    }

    #[test]
    fn cycle_types_the_solvers_word() {
        let driver = driver("slate");
        let mut solver = ScriptedSolver::new(["crane", "slate"]);

        let NextGuess::Typing(typing) = perform_next_guess(&driver, &mut solver).unwrap() else {
            panic!("expected a word to be typed");
        };
        assert_eq!(typing.word(), "crane");
        driver.scheduler().flush();

        assert!(matches!(
            perform_next_guess(&driver, &mut solver).unwrap(),
            NextGuess::Typing(_)
        ));
        driver.scheduler().flush();

        assert_eq!(
            perform_next_guess(&driver, &mut solver).unwrap(),
            NextGuess::Solved
        );
    }

    #[test]
    fn solver_sees_the_extracted_state() {
        let driver = driver("slate");
        driver.type_word("crane").unwrap();
        driver.scheduler().flush();

        let mut seen = Vec::new();
        let mut solver = |state: &PuzzleState| -> Result<Option<String>, SolverError> {
            seen.push(state.to_json().unwrap());
            Ok(None)
        };
        assert_eq!(
            perform_next_guess(&driver, &mut solver).unwrap(),
            NextGuess::NoGuess
        );
        assert_eq!(
            seen,
            vec![r#"{"guesses":[{"word":"crane","results":"--X-X"}]}"#.to_string()]
        );
    }

    #[test]
    fn busy_driver_surfaces_as_error() {
        let driver = driver("slate");
        let mut solver = ScriptedSolver::new(["crane", "slate"]);
        perform_next_guess(&driver, &mut solver).unwrap();

        let err = perform_next_guess(&driver, &mut solver).unwrap_err();
        assert!(matches!(err, PilotError::Driver(DriverError::Busy)));
    }

    #[test]
    fn solver_errors_pass_through() {
        let driver = driver("slate");
        let mut solver = |_: &PuzzleState| -> Result<Option<String>, SolverError> {
            Err(SolverError::Io(std::io::Error::other("solver went away")))
        };
        let err = perform_next_guess(&driver, &mut solver).unwrap_err();
        assert!(matches!(err, PilotError::Solver(SolverError::Io(_))));
        assert_eq!(driver.scheduler().pending_count(), 0);
    }
}
