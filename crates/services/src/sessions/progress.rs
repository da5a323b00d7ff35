use fraction_core::model::Difficulty;

/// Snapshot of where the learner is, for rendering a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub rounds_completed: u32,
    pub score: u32,
    pub streak: u32,
    pub difficulty: Option<Difficulty>,
    /// Zero-based index of the active step; equals `step_count` once the round is done.
    pub step_index: usize,
    pub step_count: usize,
    pub round_complete: bool,
}
