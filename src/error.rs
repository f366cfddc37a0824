//! Error types
//!
//! One enum per concern. Non-fatal problems (unknown tile states, missing keys)
//! are not errors; they are reported as [`Diagnostic`](crate::diagnostics::Diagnostic)s.

use std::path::PathBuf;
use thiserror::Error;

/// A piece of the page's component tree that should be there is not.
///
/// Usually means the page has not finished loading, or the markup changed
/// upstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page structure not found: {0}")]
pub struct StructureNotFound(pub String);

impl StructureNotFound {
    pub fn new(what: impl Into<String>) -> Self {
        Self(what.into())
    }
}

/// Errors raised while reading the board
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error(transparent)]
    StructureNotFound(#[from] StructureNotFound),
}

/// Errors raised synchronously by the input driver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error(transparent)]
    StructureNotFound(#[from] StructureNotFound),

    /// A previous word is still being typed
    #[error("a guess is already being typed; wait for its submit to fire")]
    Busy,

    /// The observation task was dropped before it ran
    #[error("the scheduled observation never ran")]
    ObservationDropped,

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Errors crossing the solver boundary
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("failed to start solver `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("solver I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("solver exited with {status}: {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("failed to encode puzzle state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors from one full "perform next guess" cycle
#[derive(Debug, Error)]
pub enum PilotError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Errors loading a DOM snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
