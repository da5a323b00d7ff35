//! Decomposes a [`Problem`] into the ordered steps a learner works through.
//!
//! For the four arithmetic operations the pipeline is:
//!
//! 1. `convert_improper` when either operand has a whole part,
//! 2. `reciprocal` for division,
//! 3. `common_denominator` for addition/subtraction with differing denominators,
//! 4. `calculate`, always,
//! 5. `simplify` when the raw result is not already canonical.
//!
//! Conversions produce a single step, compare produces a single sign step.

use thiserror::Error;

use crate::math::{canonicalize, cross_equivalent, lcm, less_than, reduce};
use crate::model::{
    ComparisonSign, Expected, Fraction, InputSlots, InteractiveStep, OperationKind, Problem,
    StepId, StepKind, StepSequence,
};

const RESULT_SYMBOL: char = '=';
const PRODUCT_SYMBOL: char = '·';

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Problems the builder cannot decompose. Generated problems never hit these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepBuildError {
    #[error("{operation} needs a right operand")]
    MissingRightOperand { operation: OperationKind },

    #[error("cannot divide by zero")]
    ZeroDivisor,

    #[error("subtraction would produce a negative result")]
    NegativeResult,
}

//
// ─── BUILDER ───────────────────────────────────────────────────────────────────
//

struct StepBuilder {
    steps: Vec<InteractiveStep>,
    next_id: StepId,
}

impl StepBuilder {
    fn new() -> Self {
        Self {
            steps: Vec::new(),
            next_id: StepId::new(1),
        }
    }

    fn push(&mut self, step: InteractiveStep) {
        self.next_id = step.id.next();
        self.steps.push(step);
    }

    fn operands(
        &mut self,
        kind: StepKind,
        left: Fraction,
        right: Fraction,
        symbol: char,
        hint: &str,
    ) {
        self.push(InteractiveStep {
            id: self.next_id,
            kind,
            title: title(kind).to_string(),
            hint: hint.to_string(),
            expected_left: Some(left),
            expected_right: Some(right),
            expected_center: None,
            input_slots: InputSlots::operands(),
            symbol,
        });
    }

    fn result(
        &mut self,
        kind: StepKind,
        value: Expected,
        slots: InputSlots,
        symbol: char,
        hint: &str,
    ) {
        self.push(InteractiveStep {
            id: self.next_id,
            kind,
            title: title(kind).to_string(),
            hint: hint.to_string(),
            expected_left: None,
            expected_right: None,
            expected_center: Some(value),
            input_slots: slots,
            symbol,
        });
    }

    fn finish(self) -> StepSequence {
        StepSequence::new(self.steps)
    }
}

fn title(kind: StepKind) -> &'static str {
    match kind {
        StepKind::ConvertImproper => "Convert to improper fractions",
        StepKind::Reciprocal => "Flip the divisor",
        StepKind::CommonDenominator => "Common denominator",
        StepKind::Calculate => "Calculate",
        StepKind::Simplify => "Simplify",
        StepKind::ExtractWhole => "Extract the whole part",
        StepKind::CompareFinal => "Compare",
    }
}

mod hints {
    pub const CONVERT_IMPROPER: &str =
        "Multiply the whole part by the denominator and add the numerator. The denominator stays the same.";
    pub const RECIPROCAL: &str =
        "Dividing by a fraction is multiplying by its reciprocal: keep the first fraction and turn the second one upside down.";
    pub const COMMON_DENOMINATOR: &str =
        "Find the least common multiple of the denominators, then scale each numerator by the same factor as its denominator.";
    pub const ADD: &str = "The denominators match: add the numerators and keep the denominator.";
    pub const SUBTRACT: &str =
        "The denominators match: subtract the numerators and keep the denominator.";
    pub const MULTIPLY: &str =
        "Multiply numerator by numerator and denominator by denominator.";
    pub const SIMPLIFY: &str =
        "Divide the numerator and denominator by their greatest common divisor, then pull out any whole part.";
    pub const EXTRACT_WHOLE: &str =
        "The numerator is larger than the denominator. Divide the numerator by the denominator to pull out the whole part.";
    pub const TO_IMPROPER: &str =
        "Multiply the whole part by the denominator and add the numerator.";
    pub const TO_MIXED: &str =
        "Divide the numerator by the denominator: the quotient is the whole part, the remainder is the new numerator. Reduce if you can.";
    pub const COMPARE: &str =
        "With equal denominators compare the numerators. With equal numerators the smaller denominator is the larger piece. Otherwise bring both to a common denominator.";
}

/// Build the ordered step sequence for `problem`.
///
/// # Errors
///
/// - `MissingRightOperand` if a two-operand problem has no right operand
/// - `ZeroDivisor` if a division problem divides by zero
/// - `NegativeResult` if a subtraction problem would go below zero
///
/// # Examples
///
/// ```
/// # use fraction_core::generator::ProblemGenerator;
/// # use fraction_core::model::{Difficulty, OperationKind, StepKind};
/// # use fraction_core::steps::build_step_sequence;
/// let problem = ProblemGenerator::seeded(1).generate(OperationKind::Compare, Difficulty::EASY);
/// let steps = build_step_sequence(&problem)?;
/// assert_eq!(steps.kinds(), vec![StepKind::CompareFinal]);
/// # Ok::<(), fraction_core::steps::StepBuildError>(())
/// ```
pub fn build_step_sequence(problem: &Problem) -> Result<StepSequence, StepBuildError> {
    let mut builder = StepBuilder::new();
    let operation = problem.operation;
    let right = problem
        .right
        .ok_or(StepBuildError::MissingRightOperand { operation });

    match operation {
        OperationKind::Add
        | OperationKind::Subtract
        | OperationKind::Multiply
        | OperationKind::Divide => arithmetic(&mut builder, operation, problem.left, right?)?,
        OperationKind::ConvertToImproper => builder.result(
            StepKind::Calculate,
            problem.left.to_improper().into(),
            InputSlots::center(),
            RESULT_SYMBOL,
            hints::TO_IMPROPER,
        ),
        OperationKind::ConvertToMixed => builder.result(
            StepKind::Simplify,
            canonicalize(problem.left).into(),
            InputSlots::center(),
            RESULT_SYMBOL,
            hints::TO_MIXED,
        ),
        OperationKind::Compare => {
            let right = right?;
            let sign = if cross_equivalent(problem.left, right) {
                ComparisonSign::Equal
            } else if less_than(problem.left, right) {
                ComparisonSign::Less
            } else {
                ComparisonSign::Greater
            };
            builder.result(
                StepKind::CompareFinal,
                sign.into(),
                InputSlots::sign(),
                operation.glyph(),
                hints::COMPARE,
            );
        }
    }

    Ok(builder.finish())
}

fn arithmetic(
    builder: &mut StepBuilder,
    operation: OperationKind,
    left: Fraction,
    right: Fraction,
) -> Result<(), StepBuildError> {
    let glyph = operation.glyph();
    let mut l = left.to_improper();
    let mut r = right.to_improper();

    if left.is_mixed() || right.is_mixed() {
        builder.operands(StepKind::ConvertImproper, l, r, glyph, hints::CONVERT_IMPROPER);
    }

    if operation == OperationKind::Divide {
        r = r.reciprocal().map_err(|_| StepBuildError::ZeroDivisor)?;
        builder.operands(StepKind::Reciprocal, l, r, PRODUCT_SYMBOL, hints::RECIPROCAL);
    }

    let raw = match operation {
        OperationKind::Add | OperationKind::Subtract => {
            if l.denominator() != r.denominator() {
                let common = lcm(l.denominator(), r.denominator());
                l = rescale(l, common);
                r = rescale(r, common);
                builder.operands(
                    StepKind::CommonDenominator,
                    l,
                    r,
                    glyph,
                    hints::COMMON_DENOMINATOR,
                );
            }
            let numerator = if operation == OperationKind::Add {
                l.numerator() + r.numerator()
            } else {
                l.numerator()
                    .checked_sub(r.numerator())
                    .ok_or(StepBuildError::NegativeResult)?
            };
            Fraction::from_raw(0, numerator, l.denominator())
        }
        _ => Fraction::from_raw(
            0,
            l.numerator() * r.numerator(),
            l.denominator() * r.denominator(),
        ),
    };

    let calculate_hint = match operation {
        OperationKind::Add => hints::ADD,
        OperationKind::Subtract => hints::SUBTRACT,
        _ => hints::MULTIPLY,
    };
    builder.result(
        StepKind::Calculate,
        raw.into(),
        InputSlots::center(),
        RESULT_SYMBOL,
        calculate_hint,
    );

    let simplified = reduce(raw.numerator(), raw.denominator());
    if simplified != raw {
        builder.result(
            StepKind::Simplify,
            simplified.into(),
            InputSlots::center(),
            RESULT_SYMBOL,
            hints::SIMPLIFY,
        );
    }

    Ok(())
}

/// Scale an improper fraction up to the denominator `common` (a multiple of its own).
fn rescale(f: Fraction, common: u64) -> Fraction {
    let factor = common / f.denominator();
    Fraction::from_raw(0, f.numerator() * factor, common)
}

/// Remediation step asking the learner to turn an improper answer into `target`.
pub(crate) fn extract_whole_step(id: StepId, target: Fraction) -> InteractiveStep {
    InteractiveStep {
        id,
        kind: StepKind::ExtractWhole,
        title: title(StepKind::ExtractWhole).to_string(),
        hint: hints::EXTRACT_WHOLE.to_string(),
        expected_left: None,
        expected_right: None,
        expected_center: Some(target.into()),
        input_slots: InputSlots::center(),
        symbol: RESULT_SYMBOL,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
