//! Core domain types
//!
//! Tile evaluations, the result code alphabet and puzzle state snapshots.
//! Nothing here touches the page.

mod code;
mod evaluation;
mod feedback;
mod state;

pub use code::{CodeError, ResultCode, Symbol};
pub use evaluation::Evaluation;
pub use feedback::evaluate;
pub use state::{Guess, PuzzleState};
