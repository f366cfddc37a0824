//! Non-fatal diagnostics
//!
//! Unknown tile evaluations and missing keyboard keys do not abort anything.
//! They are logged through `tracing` and kept so callers can inspect them.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A tile reported a state outside correct/present/absent
    UnrecognizedEvaluation {
        row: usize,
        column: usize,
        value: Option<String>,
    },
    /// No on-screen key matches a character of the typed word
    KeyNotFound { key: String, offset: Duration },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedEvaluation { row, column, value } => match value {
                Some(value) => write!(
                    f,
                    "row {row} tile {column}: unrecognized evaluation {value:?}"
                ),
                None => write!(f, "row {row} tile {column}: evaluation missing"),
            },
            Self::KeyNotFound { key, offset } => write!(
                f,
                "no key for {key:?} (activation at +{}ms skipped)",
                offset.as_millis()
            ),
        }
    }
}

/// Shared, append-only diagnostic sink
///
/// Cloning yields another handle to the same log, so scheduled tasks can report
/// into it as they run.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticLog(Arc<Mutex<Vec<Diagnostic>>>);

impl DiagnosticLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a diagnostic at `warn` level and keep it
    pub fn record(&self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.0.lock().push(diagnostic);
    }

    /// Copy of everything recorded so far
    #[must_use]
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.0.lock().clone()
    }

    /// Take everything recorded so far, leaving the log empty
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.0.lock())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}
