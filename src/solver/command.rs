//! Solver running as a separate program
//!
//! The program is started once per guess. It receives the puzzle state as one
//! line of JSON on stdin and prints its word on stdout. Blank output means it
//! has no suggestion.

use super::Solver;
use crate::core::PuzzleState;
use crate::error::SolverError;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSolver {
    program: String,
    args: Vec<String>,
}

impl CommandSolver {
    pub fn new<I, A>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a command line on whitespace; no quoting is honored
    #[must_use]
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Solver for CommandSolver {
    fn next_guess(&mut self, state: &PuzzleState) -> Result<Option<String>, SolverError> {
        let input = state.to_json()?;
        debug!(program = %self.program, %input, "asking solver");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SolverError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match writeln!(stdin, "{input}") {
                // The solver may answer without reading its input
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                    debug!("solver closed stdin early");
                }
                other => other?,
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(SolverError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let word = stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string);
        debug!(?word, "solver answered");
        Ok(word)
    }
}
