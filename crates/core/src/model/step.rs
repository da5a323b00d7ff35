use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Expected, Fraction, StepId};

//
// ─── STEP KIND ─────────────────────────────────────────────────────────────────
//

/// Stage of the solution pipeline a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Rewrite both operands without whole parts.
    ConvertImproper,
    /// Replace the divisor by its reciprocal and multiply instead.
    Reciprocal,
    /// Rescale both operands to their least common denominator.
    CommonDenominator,
    /// Produce the raw, unreduced result.
    Calculate,
    /// Reduce the raw result and pull out the whole part.
    Simplify,
    /// Pull the whole part out of an improper answer the learner gave.
    ExtractWhole,
    /// Pick the comparison sign.
    CompareFinal,
}

impl StepKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConvertImproper => "convert_improper",
            Self::Reciprocal => "reciprocal",
            Self::CommonDenominator => "common_denominator",
            Self::Calculate => "calculate",
            Self::Simplify => "simplify",
            Self::ExtractWhole => "extract_whole",
            Self::CompareFinal => "compare_final",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── INPUT SLOTS ───────────────────────────────────────────────────────────────
//

/// Which values the learner has to supply for a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputSlots {
    pub left: bool,
    pub right: bool,
    pub center: bool,
    pub sign: bool,
}

impl InputSlots {
    /// Both operands, as in rewrite steps.
    #[must_use]
    pub fn operands() -> Self {
        Self {
            left: true,
            right: true,
            ..Self::default()
        }
    }

    /// A single result value.
    #[must_use]
    pub fn center() -> Self {
        Self {
            center: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sign() -> Self {
        Self {
            sign: true,
            ..Self::default()
        }
    }
}

//
// ─── INTERACTIVE STEP ──────────────────────────────────────────────────────────
//

/// One gradable stage of a solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractiveStep {
    pub id: StepId,
    pub kind: StepKind,
    pub title: String,
    pub hint: String,
    pub expected_left: Option<Fraction>,
    pub expected_right: Option<Fraction>,
    pub expected_center: Option<Expected>,
    pub input_slots: InputSlots,
    /// Operator glyph shown between the operands (or before the result).
    pub symbol: char,
}

//
// ─── STEP SEQUENCE ─────────────────────────────────────────────────────────────
//

/// Ordered steps solving one problem.
///
/// Only grows: the grader may hand back a copy with one extra step inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepSequence {
    steps: Vec<InteractiveStep>,
}

impl StepSequence {
    #[must_use]
    pub fn new(steps: Vec<InteractiveStep>) -> Self {
        Self { steps }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&InteractiveStep> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn steps(&self) -> &[InteractiveStep] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InteractiveStep> {
        self.steps.iter()
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.kind).collect()
    }

    /// First id not used by any step in the sequence.
    #[must_use]
    pub fn next_step_id(&self) -> StepId {
        self.steps
            .iter()
            .map(|s| s.id)
            .max()
            .map_or(StepId::new(1), StepId::next)
    }

    pub(crate) fn step_mut(&mut self, index: usize) -> Option<&mut InteractiveStep> {
        self.steps.get_mut(index)
    }

    pub(crate) fn insert(&mut self, index: usize, step: InteractiveStep) {
        self.steps.insert(index, step);
    }
}

impl<'a> IntoIterator for &'a StepSequence {
    type Item = &'a InteractiveStep;
    type IntoIter = std::slice::Iter<'a, InteractiveStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
