use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Difficulty;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PracticeSettingsError {
    #[error("hard threshold ({hard}) must be >= medium threshold ({medium})")]
    InvalidThresholds { medium: u32, hard: u32 },

    #[error("rounds per session must be > 0")]
    InvalidRoundCount,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Knobs for a practice session.
///
/// Difficulty rises with the score: above `medium_after` completed rounds the
/// generator switches to tier 2, above `hard_after` to tier 3. A fixed
/// difficulty disables the progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PracticeSettingsParts")]
pub struct PracticeSettings {
    medium_after: u32,
    hard_after: u32,
    fixed_difficulty: Option<Difficulty>,
    rounds_per_session: Option<u32>,
}

/// Unvalidated wire shape of [`PracticeSettings`].
#[derive(Deserialize)]
struct PracticeSettingsParts {
    medium_after: u32,
    hard_after: u32,
    fixed_difficulty: Option<Difficulty>,
    rounds_per_session: Option<u32>,
}

impl TryFrom<PracticeSettingsParts> for PracticeSettings {
    type Error = PracticeSettingsError;

    fn try_from(parts: PracticeSettingsParts) -> Result<Self, Self::Error> {
        Self::new(
            parts.medium_after,
            parts.hard_after,
            parts.fixed_difficulty,
            parts.rounds_per_session,
        )
    }
}

impl PracticeSettings {
    /// # Errors
    ///
    /// - `InvalidThresholds` if `hard_after < medium_after`
    /// - `InvalidRoundCount` if `rounds_per_session` is `Some(0)`
    pub fn new(
        medium_after: u32,
        hard_after: u32,
        fixed_difficulty: Option<Difficulty>,
        rounds_per_session: Option<u32>,
    ) -> Result<Self, PracticeSettingsError> {
        if hard_after < medium_after {
            return Err(PracticeSettingsError::InvalidThresholds {
                medium: medium_after,
                hard: hard_after,
            });
        }
        if rounds_per_session == Some(0) {
            return Err(PracticeSettingsError::InvalidRoundCount);
        }

        Ok(Self {
            medium_after,
            hard_after,
            fixed_difficulty,
            rounds_per_session,
        })
    }

    /// Same settings with a fixed difficulty.
    #[must_use]
    pub fn with_fixed_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.fixed_difficulty = Some(difficulty);
        self
    }

    /// # Errors
    ///
    /// Returns `InvalidRoundCount` when `rounds` is zero.
    pub fn with_rounds(mut self, rounds: u32) -> Result<Self, PracticeSettingsError> {
        if rounds == 0 {
            return Err(PracticeSettingsError::InvalidRoundCount);
        }
        self.rounds_per_session = Some(rounds);
        Ok(self)
    }

    #[must_use]
    pub fn medium_after(&self) -> u32 {
        self.medium_after
    }

    #[must_use]
    pub fn hard_after(&self) -> u32 {
        self.hard_after
    }

    #[must_use]
    pub fn fixed_difficulty(&self) -> Option<Difficulty> {
        self.fixed_difficulty
    }

    #[must_use]
    pub fn rounds_per_session(&self) -> Option<u32> {
        self.rounds_per_session
    }

    /// Difficulty for the next round given the current score.
    #[must_use]
    pub fn difficulty_for_score(&self, score: u32) -> Difficulty {
        if let Some(fixed) = self.fixed_difficulty {
            return fixed;
        }
        if score > self.hard_after {
            Difficulty::HARD
        } else if score > self.medium_after {
            Difficulty::MEDIUM
        } else {
            Difficulty::EASY
        }
    }
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            medium_after: 5,
            hard_after: 10,
            fixed_difficulty: None,
            rounds_per_session: None,
        }
    }
}
