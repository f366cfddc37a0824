//! Simulated game command
//!
//! Runs the full guess cycle against a [`BoardSimulator`]: extract, ask the
//! solver, type the word, wait for the submit, repeat.

use crate::core::PuzzleState;
use crate::diagnostics::Diagnostic;
use crate::driver::{DriverConfig, InputDriver, Typing};
use crate::extract::{Extractor, ExtractorConfig};
use crate::schedule::{Scheduler, TimerThread, VirtualClock};
use crate::solver::{NextGuess, Solver, perform_next_guess};
use crate::surface::{BoardSimulator, Surface};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::warn;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration for a simulated game
#[derive(Debug, Clone)]
pub struct PlayConfig {
    pub answer: String,
    pub max_attempts: usize,
    /// Type at wall-clock speed instead of on a virtual clock
    pub realtime: bool,
    pub driver: DriverConfig,
    pub extractor: ExtractorConfig,
}

impl PlayConfig {
    #[must_use]
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            max_attempts: 6,
            realtime: false,
            driver: DriverConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    Solved,
    /// The solver stopped offering words
    NoGuess,
    OutOfAttempts,
    /// The board did not accept the word (wrong length, untypeable letters)
    Rejected(String),
}

/// Result of a simulated game
#[derive(Debug, Clone)]
pub struct PlayResult {
    pub answer: String,
    pub state: PuzzleState,
    pub outcome: PlayOutcome,
    pub diagnostics: Vec<Diagnostic>,
    pub duration: Duration,
}

impl PlayResult {
    #[must_use]
    pub fn success(&self) -> bool {
        self.outcome == PlayOutcome::Solved
    }
}

/// Play one game to completion
///
/// # Errors
/// Fails on extraction, solver or driver errors.
pub fn run_play(config: &PlayConfig, solver: &mut dyn Solver) -> Result<PlayResult> {
    let board = BoardSimulator::with_attempts(&config.answer, config.max_attempts);
    let surface = Arc::new(Mutex::new(board));
    let extractor = Extractor::new(config.extractor.clone());

    if config.realtime {
        let driver = InputDriver::new(surface, Arc::new(TimerThread::start()), config.driver.clone())
            .with_extractor(extractor);
        let settle = config.driver.settle_delay;
        play_loop(config, &driver, solver, |driver, typing| {
            wait_with_progress(driver, typing);
            thread::sleep(settle);
        })
    } else {
        let clock = Arc::new(VirtualClock::new());
        let driver = InputDriver::new(surface, Arc::clone(&clock), config.driver.clone())
            .with_extractor(extractor);
        play_loop(config, &driver, solver, |_, _| {
            clock.flush();
        })
    }
}

fn play_loop<S, C>(
    config: &PlayConfig,
    driver: &InputDriver<S, C>,
    solver: &mut dyn Solver,
    mut wait: impl FnMut(&InputDriver<S, C>, &Typing),
) -> Result<PlayResult>
where
    S: Surface + Send + 'static,
    C: Scheduler + ?Sized,
{
    let started = Instant::now();

    let outcome = loop {
        let before = driver.extract()?;
        if before.is_solved() {
            break PlayOutcome::Solved;
        }
        if before.attempts() >= config.max_attempts {
            break PlayOutcome::OutOfAttempts;
        }

        match perform_next_guess(driver, solver)? {
            NextGuess::Solved => break PlayOutcome::Solved,
            NextGuess::NoGuess => break PlayOutcome::NoGuess,
            NextGuess::Typing(typing) => {
                wait(driver, &typing);
                if driver.extract()?.attempts() == before.attempts() {
                    warn!(word = typing.word(), "board did not accept the guess");
                    break PlayOutcome::Rejected(typing.word().to_string());
                }
            }
        }
    };

    let state = driver.extract()?;
    let mut diagnostics = driver.diagnostics().drain();
    diagnostics.extend(state.diagnostics.iter().cloned());

    Ok(PlayResult {
        answer: config.answer.clone(),
        state,
        outcome,
        diagnostics,
        duration: started.elapsed(),
    })
}

/// Block until the driver is idle, drawing the typing progress
fn wait_with_progress<S, C>(driver: &InputDriver<S, C>, typing: &Typing)
where
    S: Surface + Send + 'static,
    C: Scheduler + ?Sized,
{
    let total = typing.completes_at().saturating_sub(typing.started_at());
    let pb = ProgressBar::new(millis(total));
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}ms")
    {
        pb.set_style(style.progress_chars("█▓▒░"));
    }
    pb.set_message(typing.word().to_uppercase());

    while driver.is_busy() {
        let remaining = typing.remaining(driver.scheduler().now());
        pb.set_position(millis(total.saturating_sub(remaining)));
        thread::sleep(POLL_INTERVAL);
    }
    pb.finish_and_clear();
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::ScriptedSolver;

    #[test]
    fn solves_with_scripted_guesses() {
        let mut solver = ScriptedSolver::new(["crane", "slate"]);
        let result = run_play(&PlayConfig::new("slate"), &mut solver).unwrap();

        assert!(result.success());
        let rows: Vec<String> = result
            .state
            .guesses
            .iter()
            .map(|g| format!("{} {}", g.word, g.result_code))
            .collect();
        assert_eq!(rows, vec!["crane --X-X", "slate XXXXX"]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn stops_when_solver_runs_dry() {
        let mut solver = ScriptedSolver::new(["crane"]);
        let result = run_play(&PlayConfig::new("slate"), &mut solver).unwrap();
        assert_eq!(result.outcome, PlayOutcome::NoGuess);
        assert_eq!(result.state.attempts(), 1);
    }

    #[test]
    fn runs_out_of_attempts() {
        let mut solver = ScriptedSolver::new(["crane"; 10]);
        let config = PlayConfig {
            max_attempts: 3,
            ..PlayConfig::new("slate")
        };
        let result = run_play(&config, &mut solver).unwrap();
        assert_eq!(result.outcome, PlayOutcome::OutOfAttempts);
        assert_eq!(result.state.attempts(), 3);
        assert_eq!(solver.remaining(), 7);
    }

    #[test]
    fn short_word_is_rejected() {
        let mut solver = ScriptedSolver::new(["cat", "slate"]);
        let result = run_play(&PlayConfig::new("slate"), &mut solver).unwrap();
        assert_eq!(result.outcome, PlayOutcome::Rejected("cat".into()));
        assert!(result.state.guesses.is_empty());
    }

    #[test]
    fn untypeable_letters_show_up_as_diagnostics() {
        let mut solver = ScriptedSolver::new(["sl4te"]);
        let result = run_play(&PlayConfig::new("slate"), &mut solver).unwrap();
        assert_eq!(result.outcome, PlayOutcome::Rejected("sl4te".into()));
        assert!(matches!(
            result.diagnostics.as_slice(),
            [Diagnostic::KeyNotFound { key, .. }] if key == "4"
        ));
    }

    #[test]
    fn realtime_game_completes() {
        let config = PlayConfig {
            realtime: true,
            driver: DriverConfig {
                inter_key_delay: Duration::from_millis(2),
                ..DriverConfig::default()
            },
            ..PlayConfig::new("slate")
        };
        let mut solver = ScriptedSolver::new(["crane", "slate"]);
        let result = run_play(&config, &mut solver).unwrap();
        assert!(result.success());
        assert_eq!(result.state.attempts(), 2);
    }
}
