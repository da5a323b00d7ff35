use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fraction_core::model::{Difficulty, OperationKind};

/// End-of-session report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub operation: OperationKind,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub rounds_completed: u32,
    pub score: u32,
    pub best_streak: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    /// Times an improper answer was accepted and an extra step inserted.
    pub remediations: u32,
    pub final_difficulty: Difficulty,
}

impl SessionSummary {
    #[must_use]
    pub fn total_answers(&self) -> u32 {
        self.correct_answers + self.incorrect_answers
    }

    /// Share of step answers that were correct, or `None` before any answer.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total_answers();
        (total > 0).then(|| f64::from(self.correct_answers) / f64::from(total))
    }

    #[must_use]
    pub fn duration_secs(&self) -> i64 {
        (self.completed_at - self.started_at).num_seconds().max(0)
    }
}
