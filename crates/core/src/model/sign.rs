use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("expected one of <, =, >, got {raw:?}")]
pub struct ParseSignError {
    raw: String,
}

/// Answer to a compare exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonSign {
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = ">")]
    Greater,
}

impl ComparisonSign {
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Self::Less => '<',
            Self::Equal => '=',
            Self::Greater => '>',
        }
    }

    /// Sign of `difference`, treating anything within `epsilon` of zero as equal.
    #[must_use]
    pub fn of_difference(difference: f64, epsilon: f64) -> Self {
        if difference.abs() < epsilon {
            Self::Equal
        } else if difference < 0.0 {
            Self::Less
        } else {
            Self::Greater
        }
    }
}

impl fmt::Display for ComparisonSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl FromStr for ComparisonSign {
    type Err = ParseSignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" => Ok(Self::Less),
            "=" => Ok(Self::Equal),
            ">" => Ok(Self::Greater),
            other => Err(ParseSignError {
                raw: other.to_string(),
            }),
        }
    }
}
