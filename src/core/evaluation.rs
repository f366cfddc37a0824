//! Tile evaluations as the page reports them

use std::fmt;

/// The puzzle's verdict for a single tile
///
/// Read from the tile's `evaluation` attribute. Anything the extractor does not
/// recognize (including a missing attribute) is kept as [`Evaluation::Unknown`]
/// with the raw value, so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Evaluation {
    /// Right letter, right position
    Correct,
    /// Letter is in the word, elsewhere
    Present,
    /// Letter is not in the word
    Absent,
    /// Unrecognized or missing value
    Unknown(Option<String>),
}

impl Evaluation {
    /// Map an `evaluation` attribute value
    ///
    /// # Examples
    /// ```
    /// use wordle_pilot::core::Evaluation;
    ///
    /// assert_eq!(Evaluation::from_attribute(Some("present")), Evaluation::Present);
    /// assert_eq!(Evaluation::from_attribute(None), Evaluation::Unknown(None));
    /// ```
    #[must_use]
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("correct") => Self::Correct,
            Some("present") => Self::Present,
            Some("absent") => Self::Absent,
            other => Self::Unknown(other.map(str::to_string)),
        }
    }

    /// The attribute value the page uses for this verdict
    #[must_use]
    pub fn as_attribute(&self) -> Option<&str> {
        match self {
            Self::Correct => Some("correct"),
            Self::Present => Some("present"),
            Self::Absent => Some("absent"),
            Self::Unknown(raw) => raw.as_deref(),
        }
    }

    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(None) => write!(f, "<missing>"),
            Self::Unknown(Some(raw)) => write!(f, "{raw:?}"),
            known => write!(f, "{}", known.as_attribute().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_map() {
        assert_eq!(
            Evaluation::from_attribute(Some("correct")),
            Evaluation::Correct
        );
        assert_eq!(
            Evaluation::from_attribute(Some("present")),
            Evaluation::Present
        );
        assert_eq!(Evaluation::from_attribute(Some("absent")), Evaluation::Absent);
    }

    #[test]
    fn unknown_values_keep_raw_text() {
        let eval = Evaluation::from_attribute(Some("tbd"));
        assert_eq!(eval, Evaluation::Unknown(Some("tbd".to_string())));
        assert!(!eval.is_known());
        assert_eq!(eval.as_attribute(), Some("tbd"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        // The page only ever emits lowercase values
        assert!(!Evaluation::from_attribute(Some("Correct")).is_known());
    }

    #[test]
    fn display() {
        assert_eq!(Evaluation::Present.to_string(), "present");
        assert_eq!(Evaluation::Unknown(None).to_string(), "<missing>");
        assert_eq!(
            Evaluation::Unknown(Some("tbd".into())).to_string(),
            "\"tbd\""
        );
    }
}
