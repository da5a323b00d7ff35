//! Fraction arithmetic primitives.
//!
//! Two notions of equality live side by side in this crate:
//!
//! - *structural* equality (`Fraction == Fraction`), used by the step grader so
//!   that intermediate answers must be given in the exact requested form;
//! - *mathematical* equivalence ([`cross_equivalent`]), used for lenient
//!   final-answer checks.

use crate::model::{Fraction, FractionError};

/// Greatest common divisor by the Euclidean algorithm.
///
/// `gcd(a, 0) = a` and `gcd(0, b) = b`.
#[must_use]
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Least common multiple. Returns 0 when either argument is 0.
#[must_use]
pub fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}

/// Improper form of `f` (`whole` folded into the numerator).
#[must_use]
pub fn to_improper(f: Fraction) -> Fraction {
    f.to_improper()
}

/// Reduce `n/d` and extract the whole part, yielding the canonical form.
///
/// # Errors
///
/// Returns `FractionError::ZeroDenominator` if `d` is zero.
///
/// # Examples
///
/// ```
/// # use fraction_core::math::simplify;
/// # use fraction_core::model::Fraction;
/// assert_eq!(simplify(22, 12)?, Fraction::new(1, 5, 6)?);
/// assert_eq!(simplify(4, 2)?, Fraction::new(2, 0, 1)?);
/// # Ok::<(), fraction_core::model::FractionError>(())
/// ```
pub fn simplify(n: u64, d: u64) -> Result<Fraction, FractionError> {
    if d == 0 {
        return Err(FractionError::ZeroDenominator);
    }
    Ok(reduce(n, d))
}

/// `simplify` for a denominator already known to be non-zero.
pub(crate) fn reduce(n: u64, d: u64) -> Fraction {
    let common = gcd(n, d);
    let n = n / common;
    let d = d / common;
    Fraction::from_raw(n / d, n % d, d)
}

/// Canonical form of any fraction, mixed or not.
#[must_use]
pub fn canonicalize(f: Fraction) -> Fraction {
    let imp = f.to_improper();
    reduce(imp.numerator(), imp.denominator())
}

/// `a < b` by value.
#[must_use]
pub fn less_than(a: Fraction, b: Fraction) -> bool {
    let a = a.to_improper();
    let b = b.to_improper();
    u128::from(a.numerator()) * u128::from(b.denominator())
        < u128::from(b.numerator()) * u128::from(a.denominator())
}

/// Mathematical equality by cross multiplication, ignoring reduction and
/// whole/improper representation.
#[must_use]
pub fn cross_equivalent(a: Fraction, b: Fraction) -> bool {
    let a = a.to_improper();
    let b = b.to_improper();
    u128::from(a.numerator()) * u128::from(b.denominator())
        == u128::from(b.numerator()) * u128::from(a.denominator())
}

/// Lenient final-answer check: true when `a` and `b` have the same value.
///
/// Distinct from step grading, which compares structurally.
#[must_use]
pub fn fractions_equivalent(a: Fraction, b: Fraction) -> bool {
    cross_equivalent(a, b)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
