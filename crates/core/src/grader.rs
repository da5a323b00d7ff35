//! Grades one submission against the active step.
//!
//! Fractions are compared *structurally*: `2/4` does not satisfy a step that
//! expects `1/2`. Intermediate steps must be answered in the exact form the
//! step asks for.
//!
//! One relaxation exists. When a result step expects a mixed number and the
//! learner enters the same value as a plain improper fraction (`7/2` for
//! `3 1/2`), the answer is accepted, the step is rewritten to what was entered,
//! and an `extract_whole` step asking for the mixed number is inserted right
//! after it. The inserted step itself is graded strictly, so a sequence grows
//! by at most one step per relaxation.
//!
//! The grader never mutates its input; a patched copy of the sequence is
//! returned along with a [`Remediation`] describing the patch.

use thiserror::Error;

use crate::input::FractionEntry;
use crate::model::{ComparisonSign, Expected, Fraction, StepId, StepKind, StepSequence};
use crate::steps::extract_whole_step;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GradeError {
    #[error("cursor {cursor} does not point at a step (sequence has {len})")]
    CursorOutOfRange { cursor: usize, len: usize },
}

//
// ─── SUBMISSION ────────────────────────────────────────────────────────────────
//

/// Values the learner entered for the active step.
///
/// A missing fraction is read as `0/1`; a missing sign never matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Submission {
    pub left: Option<Fraction>,
    pub right: Option<Fraction>,
    pub center: Option<Fraction>,
    pub sign: Option<ComparisonSign>,
}

impl Submission {
    #[must_use]
    pub fn operands(left: Fraction, right: Fraction) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn center(value: Fraction) -> Self {
        Self {
            center: Some(value),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sign(sign: ComparisonSign) -> Self {
        Self {
            sign: Some(sign),
            ..Self::default()
        }
    }
}

fn entered(value: Option<Fraction>) -> Fraction {
    value.unwrap_or_else(|| FractionEntry::default().to_fraction())
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// Describes the step patch applied by the improper-answer relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remediation {
    /// Step whose expected result was rewritten to the learner's entry.
    pub replaced: StepId,
    /// Newly inserted `extract_whole` step.
    pub inserted: StepId,
    /// Position of the inserted step in the returned sequence.
    pub index: usize,
    /// The improper fraction the learner entered.
    pub entered: Fraction,
    /// The mixed number the inserted step asks for.
    pub target: Fraction,
}

/// Verdict plus the sequence and cursor to continue with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graded {
    pub correct: bool,
    /// The input sequence, or a patched copy when `remediation` is set.
    pub sequence: StepSequence,
    /// Next step to work on. Unchanged when the answer was wrong.
    pub cursor: usize,
    /// True when the last step was just answered correctly.
    pub round_complete: bool,
    pub remediation: Option<Remediation>,
}

//
// ─── GRADING ───────────────────────────────────────────────────────────────────
//

/// Grade `submission` against the step at `cursor`.
///
/// # Errors
///
/// Returns `GradeError::CursorOutOfRange` if `cursor` is not a valid index.
///
/// # Examples
///
/// ```
/// # use fraction_core::grader::{grade_step, Submission};
/// # use fraction_core::model::{Difficulty, Fraction, OperationKind, Problem, ProblemId};
/// # use fraction_core::steps::build_step_sequence;
/// let problem = Problem {
///     id: ProblemId::from_random_bytes([0; 16]),
///     operation: OperationKind::ConvertToMixed,
///     left: Fraction::improper(7, 2)?,
///     right: None,
///     expected: Fraction::new(3, 1, 2)?.into(),
///     difficulty: Difficulty::EASY,
/// };
/// let steps = build_step_sequence(&problem)?;
/// let graded = grade_step(&steps, 0, &Submission::center(Fraction::new(3, 1, 2)?))?;
/// assert!(graded.correct && graded.round_complete);
/// # Ok::<(), fraction_core::Error>(())
/// ```
pub fn grade_step(
    sequence: &StepSequence,
    cursor: usize,
    submission: &Submission,
) -> Result<Graded, GradeError> {
    let step = sequence.get(cursor).ok_or(GradeError::CursorOutOfRange {
        cursor,
        len: sequence.len(),
    })?;
    let slots = step.input_slots;

    let left_ok = !slots.left
        || step
            .expected_left
            .is_none_or(|expected| entered(submission.left) == expected);
    let right_ok = !slots.right
        || step
            .expected_right
            .is_none_or(|expected| entered(submission.right) == expected);
    let center_ok = !slots.center
        || match step.expected_center {
            Some(Expected::Fraction(expected)) => entered(submission.center) == expected,
            Some(Expected::Sign(_)) => false,
            None => true,
        };
    let sign_ok = !slots.sign
        || match step.expected_center {
            Some(Expected::Sign(expected)) => submission.sign == Some(expected),
            Some(Expected::Fraction(_)) => false,
            None => true,
        };

    if left_ok && right_ok && center_ok && sign_ok {
        return Ok(advance(sequence.clone(), cursor, None));
    }

    if left_ok && right_ok && sign_ok && slots.center && step.kind != StepKind::ExtractWhole {
        if let Some(Expected::Fraction(target)) = step.expected_center {
            let value = entered(submission.center);
            if accepts_as_improper(value, target) {
                let (patched, remediation) = remediate(sequence, cursor, value, target);
                return Ok(advance(patched, cursor, Some(remediation)));
            }
        }
    }

    Ok(Graded {
        correct: false,
        sequence: sequence.clone(),
        cursor,
        round_complete: false,
        remediation: None,
    })
}

/// True when `value` is `target` written as an improper fraction with no whole
/// part. The numerator and denominator must match exactly, which also makes the
/// two cross-equivalent.
fn accepts_as_improper(value: Fraction, target: Fraction) -> bool {
    target.whole() > 0 && value.whole() == 0 && value == target.to_improper()
}

fn remediate(
    sequence: &StepSequence,
    cursor: usize,
    value: Fraction,
    target: Fraction,
) -> (StepSequence, Remediation) {
    let mut patched = sequence.clone();
    let inserted = patched.next_step_id();
    let mut replaced = inserted;
    if let Some(current) = patched.step_mut(cursor) {
        current.expected_center = Some(value.into());
        replaced = current.id;
    }
    let index = cursor + 1;
    patched.insert(index, extract_whole_step(inserted, target));

    let remediation = Remediation {
        replaced,
        inserted,
        index,
        entered: value,
        target,
    };
    (patched, remediation)
}

fn advance(sequence: StepSequence, cursor: usize, remediation: Option<Remediation>) -> Graded {
    let next = cursor + 1;
    Graded {
        correct: true,
        round_complete: next >= sequence.len(),
        sequence,
        cursor: next,
        remediation,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
