use rand::rngs::{StdRng, ThreadRng};
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::math::{less_than, reduce};
use crate::model::{
    ComparisonSign, Difficulty, Expected, Fraction, OperationKind, Problem, ProblemId,
};

/// Values closer than this are reported as equal in compare exercises.
pub const COMPARE_EPSILON: f64 = 1e-4;

//
// ─── GENERATOR ─────────────────────────────────────────────────────────────────
//

/// Draws random, difficulty-scaled problems.
///
/// All denominators are drawn from `[2, max_denominator]` and all numerators
/// from `[1, d - 1]`, so generated operands are proper, non-zero and never
/// carry a zero denominator.
///
/// Subtraction operands may be reordered to keep the result non-negative.
///
/// # Examples
///
/// ```
/// # use fraction_core::generator::ProblemGenerator;
/// # use fraction_core::model::{Difficulty, OperationKind};
/// let mut generator = ProblemGenerator::seeded(7);
/// let problem = generator.generate(OperationKind::Add, Difficulty::EASY);
/// let right = problem.right.unwrap();
/// assert_eq!(problem.left.denominator(), right.denominator());
/// ```
#[derive(Debug, Clone)]
pub struct ProblemGenerator<R> {
    rng: R,
}

impl ProblemGenerator<ThreadRng> {
    /// Generator backed by the thread-local RNG.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::rng())
    }
}

impl ProblemGenerator<StdRng> {
    /// Reproducible generator for tests and replays.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ProblemGenerator<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Produce one problem of the given kind.
    pub fn generate(&mut self, operation: OperationKind, difficulty: Difficulty) -> Problem {
        let id = ProblemId::from_random_bytes(self.rng.random::<u128>().to_le_bytes());

        let (left, right, expected) = match operation {
            OperationKind::Add | OperationKind::Subtract => {
                self.additive(operation, difficulty)
            }
            OperationKind::Multiply | OperationKind::Divide => {
                self.multiplicative(operation, difficulty)
            }
            OperationKind::ConvertToMixed => self.to_mixed(difficulty),
            OperationKind::ConvertToImproper => self.to_improper(difficulty),
            OperationKind::Compare => self.compare(difficulty),
        };

        Problem {
            id,
            operation,
            left,
            right,
            expected,
            difficulty,
        }
    }

    fn additive(
        &mut self,
        operation: OperationKind,
        difficulty: Difficulty,
    ) -> (Fraction, Option<Fraction>, Expected) {
        let mut left = self.fraction(difficulty);
        let mut right = self.fraction(difficulty);

        match difficulty.level() {
            1 => right = self.with_denominator(right.whole(), left.denominator()),
            2 if self.rng.random_bool(0.5) => {
                let factor = self.rng.random_range(2..=3);
                right = self.with_denominator(right.whole(), left.denominator() * factor);
            }
            _ => {}
        }

        if operation == OperationKind::Subtract && less_than(left, right) {
            std::mem::swap(&mut left, &mut right);
        }

        let l = left.to_improper();
        let r = right.to_improper();
        let cross_l = l.numerator() * r.denominator();
        let cross_r = r.numerator() * l.denominator();
        let numerator = if operation == OperationKind::Subtract {
            cross_l - cross_r
        } else {
            cross_l + cross_r
        };
        let expected = reduce(numerator, l.denominator() * r.denominator());

        (left, Some(right), expected.into())
    }

    fn multiplicative(
        &mut self,
        operation: OperationKind,
        difficulty: Difficulty,
    ) -> (Fraction, Option<Fraction>, Expected) {
        let left = self.fraction(difficulty);
        let right = self.fraction(difficulty);
        let l = left.to_improper();
        let r = right.to_improper();

        // Drawn numerators are >= 1, so the divisor is never zero.
        let expected = if operation == OperationKind::Divide {
            reduce(
                l.numerator() * r.denominator(),
                l.denominator() * r.numerator(),
            )
        } else {
            reduce(
                l.numerator() * r.numerator(),
                l.denominator() * r.denominator(),
            )
        };

        (left, Some(right), expected.into())
    }

    fn to_mixed(&mut self, difficulty: Difficulty) -> (Fraction, Option<Fraction>, Expected) {
        let d = self.denominator(difficulty.max_denominator());
        let units = self.rng.random_range(1..=difficulty.improper_multiplier());
        let remainder = self.rng.random_range(1..d);
        let n = units * d + remainder;

        let left = Fraction::from_raw(0, n, d);
        (left, None, reduce(n, d).into())
    }

    fn to_improper(&mut self, difficulty: Difficulty) -> (Fraction, Option<Fraction>, Expected) {
        let drawn = self.fraction(difficulty);
        let left = Fraction::from_raw(
            drawn.whole().max(1),
            drawn.numerator(),
            drawn.denominator(),
        );
        (left, None, left.to_improper().into())
    }

    fn compare(&mut self, difficulty: Difficulty) -> (Fraction, Option<Fraction>, Expected) {
        let left = self.fraction(difficulty);
        let mut right = self.fraction(difficulty);
        let (same_denominator, same_numerator) = difficulty.compare_bias();
        let roll: f64 = self.rng.random();

        if roll < same_denominator {
            // Equal denominators: only the numerators decide.
            right = self.with_denominator(left.whole(), left.denominator());
        } else if roll < same_denominator + same_numerator {
            // Equal numerators: the smaller denominator is the larger piece.
            let candidates: Vec<u64> = (left.numerator() + 1..=difficulty.max_denominator())
                .filter(|&d| d != left.denominator())
                .collect();
            if let Some(&d) = candidates.choose(&mut self.rng) {
                right = Fraction::from_raw(left.whole(), left.numerator(), d);
            }
        }

        let sign = ComparisonSign::of_difference(left.value() - right.value(), COMPARE_EPSILON);
        (left, Some(right), sign.into())
    }

    fn fraction(&mut self, difficulty: Difficulty) -> Fraction {
        let d = self.denominator(difficulty.max_denominator());
        let n = self.rng.random_range(1..d);
        let whole = self.rng.random_range(0..=difficulty.max_whole());
        Fraction::from_raw(whole, n, d)
    }

    /// Redraws the numerator so the operand stays proper under its new denominator.
    fn with_denominator(&mut self, whole: u64, d: u64) -> Fraction {
        let n = self.rng.random_range(1..d);
        Fraction::from_raw(whole, n, d)
    }

    fn denominator(&mut self, max: u64) -> u64 {
        self.rng.random_range(2..=max.max(2))
    }
}

/// Generate one problem using the thread-local RNG.
#[must_use]
pub fn generate_problem(operation: OperationKind, difficulty: Difficulty) -> Problem {
    ProblemGenerator::from_entropy().generate(operation, difficulty)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{canonicalize, cross_equivalent};

    const SAMPLES: usize = 300;

    fn all_difficulties() -> [Difficulty; 3] {
        [Difficulty::EASY, Difficulty::MEDIUM, Difficulty::HARD]
    }

    fn sample(op: OperationKind, difficulty: Difficulty, seed: u64) -> Vec<Problem> {
        let mut generator = ProblemGenerator::seeded(seed);
        (0..SAMPLES)
            .map(|_| generator.generate(op, difficulty))
            .collect()
    }

    fn expected_fraction(problem: &Problem) -> Fraction {
        problem.expected.as_fraction().unwrap()
    }

    #[test]
    fn easy_additive_problems_share_denominators() {
        for op in [OperationKind::Add, OperationKind::Subtract] {
            for p in sample(op, Difficulty::EASY, 1) {
                let right = p.right.unwrap();
                assert_eq!(p.left.denominator(), right.denominator(), "{p}");
                assert!(right.numerator() < right.denominator(), "{p}");
                assert_eq!(p.left.whole(), 0);
            }
        }
    }

    #[test]
    fn medium_additive_denominators_are_equal_or_related_multiples() {
        let mut saw_multiple = false;
        for p in sample(OperationKind::Add, Difficulty::MEDIUM, 2) {
            let right = p.right.unwrap();
            assert!(right.numerator() < right.denominator());
            let (ld, rd) = (p.left.denominator(), right.denominator());
            if rd == ld * 2 || rd == ld * 3 {
                saw_multiple = true;
            }
        }
        assert!(saw_multiple);
    }

    #[test]
    fn subtraction_never_goes_negative() {
        for difficulty in all_difficulties() {
            for p in sample(OperationKind::Subtract, difficulty, 3) {
                let right = p.right.unwrap();
                assert!(!less_than(p.left, right), "{p}");
                let expected = expected_fraction(&p);
                assert!(expected.is_canonical());
            }
        }
    }

    #[test]
    fn arithmetic_expected_is_canonical_and_correct() {
        for difficulty in all_difficulties() {
            for p in sample(OperationKind::Multiply, difficulty, 4) {
                let l = p.left.to_improper();
                let r = p.right.unwrap().to_improper();
                let product = Fraction::improper(
                    l.numerator() * r.numerator(),
                    l.denominator() * r.denominator(),
                )
                .unwrap();
                assert_eq!(expected_fraction(&p), canonicalize(product));
            }
            for p in sample(OperationKind::Divide, difficulty, 5) {
                let quotient = p.left.to_improper();
                let divisor = p.right.unwrap().reciprocal().unwrap();
                let raw = Fraction::improper(
                    quotient.numerator() * divisor.numerator(),
                    quotient.denominator() * divisor.denominator(),
                )
                .unwrap();
                assert!(cross_equivalent(expected_fraction(&p), raw));
                assert!(expected_fraction(&p).is_canonical());
            }
        }
    }

    #[test]
    fn operands_respect_difficulty_tiers() {
        for difficulty in all_difficulties() {
            for p in sample(OperationKind::Multiply, difficulty, 6) {
                for f in [p.left, p.right.unwrap()] {
                    assert!(f.denominator() >= 2);
                    assert!(f.denominator() <= difficulty.max_denominator());
                    assert!(f.numerator() >= 1 && f.numerator() < f.denominator());
                    assert!(f.whole() <= difficulty.max_whole());
                }
            }
        }
    }

    #[test]
    fn convert_to_mixed_draws_improper_fraction() {
        for difficulty in all_difficulties() {
            for p in sample(OperationKind::ConvertToMixed, difficulty, 7) {
                assert!(p.right.is_none());
                assert_eq!(p.left.whole(), 0);
                assert!(p.left.numerator() > p.left.denominator());
                let expected = expected_fraction(&p);
                assert!(expected.whole() >= 1);
                assert!(expected.is_canonical());
                assert!(cross_equivalent(expected, p.left));
            }
        }
    }

    #[test]
    fn convert_to_improper_always_has_whole_part() {
        for difficulty in all_difficulties() {
            for p in sample(OperationKind::ConvertToImproper, difficulty, 8) {
                assert!(p.right.is_none());
                assert!(p.left.whole() >= 1);
                assert_eq!(expected_fraction(&p), p.left.to_improper());
            }
        }
    }

    #[test]
    fn compare_sign_matches_values() {
        let mut saw_same_denominator = false;
        let mut saw_same_numerator = false;
        for difficulty in all_difficulties() {
            for p in sample(OperationKind::Compare, difficulty, 9) {
                let right = p.right.unwrap();
                let sign = p.expected.as_sign().unwrap();
                let want = if cross_equivalent(p.left, right) {
                    ComparisonSign::Equal
                } else if less_than(p.left, right) {
                    ComparisonSign::Less
                } else {
                    ComparisonSign::Greater
                };
                assert_eq!(sign, want, "{p}");
                saw_same_denominator |= p.left.denominator() == right.denominator();
                saw_same_numerator |= p.left.numerator() == right.numerator()
                    && p.left.denominator() != right.denominator();
            }
        }
        assert!(saw_same_denominator);
        assert!(saw_same_numerator);
    }

    #[test]
    fn seeded_generators_are_reproducible() {
        let a = sample(OperationKind::Add, Difficulty::HARD, 42);
        let b = sample(OperationKind::Add, Difficulty::HARD, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn thread_rng_generation_works() {
        let p = generate_problem(OperationKind::Divide, Difficulty::MEDIUM);
        assert_eq!(p.operation, OperationKind::Divide);
        assert_eq!(p.difficulty, Difficulty::MEDIUM);
    }
}
