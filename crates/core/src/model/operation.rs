use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown operation: {raw}")]
pub struct ParseOperationError {
    raw: String,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DifficultyError {
    #[error("difficulty must be between 1 and 3, got {0}")]
    OutOfRange(u8),
}

//
// ─── OPERATION KIND ────────────────────────────────────────────────────────────
//

/// The kind of exercise a problem asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    #[serde(rename = "convert_mixed")]
    ConvertToMixed,
    #[serde(rename = "convert_improper")]
    ConvertToImproper,
    Compare,
}

impl OperationKind {
    pub const ALL: [OperationKind; 7] = [
        OperationKind::Add,
        OperationKind::Subtract,
        OperationKind::Multiply,
        OperationKind::Divide,
        OperationKind::ConvertToMixed,
        OperationKind::ConvertToImproper,
        OperationKind::Compare,
    ];

    /// Glyph shown between the two operands of the problem.
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '·',
            Self::Divide => ':',
            Self::ConvertToMixed | Self::ConvertToImproper => '→',
            Self::Compare => '?',
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::ConvertToMixed => "convert_mixed",
            Self::ConvertToImproper => "convert_improper",
            Self::Compare => "compare",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == needle)
            .ok_or_else(|| ParseOperationError { raw: s.to_string() })
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Coarse difficulty tier, 1 (easiest) to 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const EASY: Difficulty = Difficulty(1);
    pub const MEDIUM: Difficulty = Difficulty(2);
    pub const HARD: Difficulty = Difficulty(3);

    /// # Errors
    ///
    /// Returns `DifficultyError::OutOfRange` unless `level` is 1, 2 or 3.
    pub fn new(level: u8) -> Result<Self, DifficultyError> {
        if (1..=3).contains(&level) {
            Ok(Self(level))
        } else {
            Err(DifficultyError::OutOfRange(level))
        }
    }

    #[must_use]
    pub fn level(self) -> u8 {
        self.0
    }

    /// Largest whole part a drawn operand may have.
    #[must_use]
    pub fn max_whole(self) -> u64 {
        match self.0 {
            1 => 0,
            2 => 3,
            _ => 5,
        }
    }

    /// Largest denominator a drawn operand may have.
    #[must_use]
    pub fn max_denominator(self) -> u64 {
        match self.0 {
            1 => 6,
            2 => 12,
            _ => 20,
        }
    }

    /// Upper bound on the whole units packed into an improper fraction
    /// for the convert-to-mixed exercise.
    #[must_use]
    pub fn improper_multiplier(self) -> u64 {
        match self.0 {
            1 => 2,
            2 => 4,
            _ => 6,
        }
    }

    /// Probabilities of forcing equal denominators and equal numerators
    /// in compare exercises.
    #[must_use]
    pub fn compare_bias(self) -> (f64, f64) {
        match self.0 {
            1 => (0.5, 0.3),
            2 => (0.35, 0.35),
            _ => (0.2, 0.3),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::EASY
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = DifficultyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(value: Difficulty) -> Self {
        value.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_round_trips_through_text() {
        for kind in OperationKind::ALL {
            assert_eq!(kind.as_str().parse::<OperationKind>().unwrap(), kind);
        }
        assert_eq!(
            "Convert-Mixed".parse::<OperationKind>().unwrap(),
            OperationKind::ConvertToMixed
        );
        assert!("modulo".parse::<OperationKind>().is_err());
    }

    #[test]
    fn operation_serde_names_match_text() {
        let json = serde_json::to_string(&OperationKind::ConvertToImproper).unwrap();
        assert_eq!(json, "\"convert_improper\"");
        let kind: OperationKind = serde_json::from_str("\"subtract\"").unwrap();
        assert_eq!(kind, OperationKind::Subtract);
    }

    #[test]
    fn difficulty_range_is_enforced() {
        assert!(Difficulty::new(0).is_err());
        assert_eq!(Difficulty::new(2).unwrap(), Difficulty::MEDIUM);
        assert!(matches!(
            Difficulty::new(4),
            Err(DifficultyError::OutOfRange(4))
        ));
    }

    #[test]
    fn tiers_grow_with_difficulty() {
        assert_eq!(Difficulty::EASY.max_whole(), 0);
        assert_eq!(Difficulty::EASY.max_denominator(), 6);
        assert!(Difficulty::MEDIUM.max_denominator() < Difficulty::HARD.max_denominator());
        assert!(Difficulty::MEDIUM.max_whole() < Difficulty::HARD.max_whole());
    }
}
