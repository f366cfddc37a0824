//! Result code encoding
//!
//! A result code is one symbol per tile, left to right, using the alphabet the
//! solver side has always consumed:
//! - `X` = correct position
//! - `.` = present elsewhere
//! - `-` = absent
//!
//! A fourth symbol, `?`, stands in for a tile whose evaluation was not
//! recognized. It never collides with the three canonical symbols.

use super::Evaluation;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One position of a result code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Correct,
    Present,
    Absent,
    Unknown,
}

impl Symbol {
    pub const CORRECT: char = 'X';
    pub const PRESENT: char = '.';
    pub const ABSENT: char = '-';
    pub const SENTINEL: char = '?';

    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Correct => Self::CORRECT,
            Self::Present => Self::PRESENT,
            Self::Absent => Self::ABSENT,
            Self::Unknown => Self::SENTINEL,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            Self::CORRECT => Some(Self::Correct),
            Self::PRESENT => Some(Self::Present),
            Self::ABSENT => Some(Self::Absent),
            Self::SENTINEL => Some(Self::Unknown),
            _ => None,
        }
    }

    #[must_use]
    pub const fn to_emoji(self) -> char {
        match self {
            Self::Correct => '🟩',
            Self::Present => '🟨',
            Self::Absent => '⬜',
            Self::Unknown => '❔',
        }
    }
}

impl From<&Evaluation> for Symbol {
    fn from(evaluation: &Evaluation) -> Self {
        match evaluation {
            Evaluation::Correct => Self::Correct,
            Evaluation::Present => Self::Present,
            Evaluation::Absent => Self::Absent,
            Evaluation::Unknown(_) => Self::Unknown,
        }
    }
}

/// Invalid result code text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected {symbol:?} in result code at position {position}; expected X, . or -")]
pub struct CodeError {
    pub symbol: char,
    pub position: usize,
}

/// Encoded verdict for one guess row
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResultCode(Vec<Symbol>);

impl ResultCode {
    #[must_use]
    pub const fn new(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }

    /// Encode a row of evaluations, mapping unrecognized ones to the sentinel
    ///
    /// # Examples
    /// ```
    /// use wordle_pilot::core::{Evaluation, ResultCode};
    ///
    /// let code = ResultCode::from_evaluations(&[
    ///     Evaluation::Correct,
    ///     Evaluation::Present,
    ///     Evaluation::Absent,
    ///     Evaluation::Correct,
    ///     Evaluation::Absent,
    /// ]);
    /// assert_eq!(code.to_string(), "X.-X-");
    /// ```
    #[must_use]
    pub fn from_evaluations(evaluations: &[Evaluation]) -> Self {
        Self(evaluations.iter().map(Symbol::from).collect())
    }

    #[inline]
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every tile correct
    #[must_use]
    pub fn is_solved(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|&s| s == Symbol::Correct)
    }

    /// Contains at least one sentinel
    #[must_use]
    pub fn has_unknown(&self) -> bool {
        self.0.contains(&Symbol::Unknown)
    }

    /// Render as squares, e.g. "⬜🟨🟩⬜⬜"
    #[must_use]
    pub fn to_emoji(&self) -> String {
        self.0.iter().map(|s| s.to_emoji()).collect()
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.0 {
            write!(f, "{}", symbol.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for ResultCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, symbol)| {
                Symbol::from_char(symbol).ok_or(CodeError { symbol, position })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl Serialize for ResultCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResultCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_mixed_row() {
        let code = ResultCode::from_evaluations(&[
            Evaluation::Correct,
            Evaluation::Present,
            Evaluation::Absent,
            Evaluation::Correct,
            Evaluation::Absent,
        ]);
        assert_eq!(code.to_string(), "X.-X-");
        assert_eq!(code.len(), 5);
        assert!(!code.is_solved());
    }

    #[test]
    fn unknown_becomes_sentinel_and_keeps_length() {
        let code = ResultCode::from_evaluations(&[
            Evaluation::Absent,
            Evaluation::Unknown(Some("tbd".into())),
            Evaluation::Correct,
        ]);
        assert_eq!(code.to_string(), "-?X");
        assert_eq!(code.len(), 3);
        assert!(code.has_unknown());
    }

    #[test]
    fn solved_requires_all_correct() {
        assert!("XXXXX".parse::<ResultCode>().unwrap().is_solved());
        assert!(!"XXXX-".parse::<ResultCode>().unwrap().is_solved());
        assert!(!ResultCode::default().is_solved());
    }

    #[test]
    fn parse_rejects_foreign_symbols_with_position() {
        let err = "X.G--".parse::<ResultCode>().unwrap_err();
        assert_eq!(
            err,
            CodeError {
                symbol: 'G',
                position: 2
            }
        );
    }

    #[test]
    fn emoji_rendering() {
        let code: ResultCode = "-.X-?".parse().unwrap();
        assert_eq!(code.to_emoji(), "⬜🟨🟩⬜❔");
    }

    #[test]
    fn serializes_as_plain_string() {
        let code: ResultCode = "-.X--".parse().unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"-.X--\"");

        let back: ResultCode = serde_json::from_str("\"XX.--\"").unwrap();
        assert_eq!(back.to_string(), "XX.--");
        assert!(serde_json::from_str::<ResultCode>("\"XYZ\"").is_err());
    }
}
