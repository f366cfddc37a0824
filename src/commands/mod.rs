//! Command implementations

pub mod extract;
pub mod play;

pub use extract::extract_snapshot;
pub use play::{PlayConfig, PlayOutcome, PlayResult, run_play};
