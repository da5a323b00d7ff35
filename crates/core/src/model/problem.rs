use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ComparisonSign, Difficulty, Fraction, OperationKind, ProblemId};

/// Value a step or problem expects: either a fraction or a comparison sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Expected {
    Fraction(Fraction),
    Sign(ComparisonSign),
}

impl Expected {
    #[must_use]
    pub fn as_fraction(&self) -> Option<Fraction> {
        match self {
            Self::Fraction(f) => Some(*f),
            Self::Sign(_) => None,
        }
    }

    #[must_use]
    pub fn as_sign(&self) -> Option<ComparisonSign> {
        match self {
            Self::Sign(s) => Some(*s),
            Self::Fraction(_) => None,
        }
    }
}

impl From<Fraction> for Expected {
    fn from(value: Fraction) -> Self {
        Self::Fraction(value)
    }
}

impl From<ComparisonSign> for Expected {
    fn from(value: ComparisonSign) -> Self {
        Self::Sign(value)
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fraction(fr) => fr.fmt(f),
            Self::Sign(s) => s.fmt(f),
        }
    }
}

/// One generated exercise. Immutable once created.
///
/// `right` is `None` only for the two conversion kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    pub operation: OperationKind,
    pub left: Fraction,
    pub right: Option<Fraction>,
    pub expected: Expected,
    pub difficulty: Difficulty,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.right {
            Some(right) => write!(f, "{} {} {}", self.left, self.operation.glyph(), right),
            None => write!(f, "{} {}", self.left, self.operation.glyph()),
        }
    }
}
