//! Snapshot extraction command
//!
//! Reads a DOM snapshot captured from a live page and extracts the board.

use crate::core::PuzzleState;
use crate::extract::Extractor;
use crate::surface::Dom;
use anyhow::{Context, Result};
use std::path::Path;

/// Load `path` and extract its board
///
/// # Errors
/// Fails if the snapshot cannot be read or parsed, or the board structure is
/// missing from it.
pub fn extract_snapshot(path: &Path, extractor: &Extractor) -> Result<PuzzleState> {
    let dom = Dom::load(path).with_context(|| format!("loading {}", path.display()))?;
    let state = extractor
        .extract(&dom)
        .with_context(|| format!("extracting board from {}", path.display()))?;
    Ok(state)
}
