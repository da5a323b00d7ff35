use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Raised whenever a fraction would end up with a zero denominator.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FractionError {
    #[error("fraction denominator must be > 0")]
    ZeroDenominator,
}

//
// ─── FRACTION ──────────────────────────────────────────────────────────────────
//

/// A non-negative mixed number `whole n/d`.
///
/// Equality (`==`) is *structural*: `1/2` and `2/4` are different values here.
/// Use [`crate::math::cross_equivalent`] when mathematical equality is wanted.
///
/// Canonical values have `0 <= n < d` and `gcd(n, d) = 1`. Improper values
/// (`whole = 0`, `n >= d`) are allowed as intermediate results.
///
/// # Examples
///
/// ```
/// # use fraction_core::model::Fraction;
/// let f = Fraction::new(1, 1, 2)?;
/// assert_eq!(f.to_improper(), Fraction::improper(3, 2)?);
/// assert!(Fraction::new(0, 1, 0).is_err());
/// # Ok::<(), fraction_core::model::FractionError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FractionParts")]
pub struct Fraction {
    whole: u64,
    n: u64,
    d: u64,
}

/// Unvalidated wire shape of a [`Fraction`].
#[derive(Deserialize)]
struct FractionParts {
    whole: u64,
    n: u64,
    d: u64,
}

impl TryFrom<FractionParts> for Fraction {
    type Error = FractionError;

    fn try_from(parts: FractionParts) -> Result<Self, Self::Error> {
        Self::new(parts.whole, parts.n, parts.d)
    }
}

impl Fraction {
    /// Build a mixed number.
    ///
    /// # Errors
    ///
    /// Returns `FractionError::ZeroDenominator` if `d` is zero.
    pub fn new(whole: u64, n: u64, d: u64) -> Result<Self, FractionError> {
        if d == 0 {
            return Err(FractionError::ZeroDenominator);
        }
        Ok(Self { whole, n, d })
    }

    /// Build a fraction with no whole part.
    ///
    /// # Errors
    ///
    /// Returns `FractionError::ZeroDenominator` if `d` is zero.
    pub fn improper(n: u64, d: u64) -> Result<Self, FractionError> {
        Self::new(0, n, d)
    }

    /// Internal constructor for denominators that are already known to be non-zero
    /// (products and quotients of validated denominators).
    pub(crate) fn from_raw(whole: u64, n: u64, d: u64) -> Self {
        debug_assert_ne!(d, 0, "denominator must be non-zero");
        Self { whole, n, d }
    }

    #[must_use]
    pub fn whole(&self) -> u64 {
        self.whole
    }

    #[must_use]
    pub fn numerator(&self) -> u64 {
        self.n
    }

    #[must_use]
    pub fn denominator(&self) -> u64 {
        self.d
    }

    /// Fold the whole part into the numerator: `w n/d` becomes `(w·d + n)/d`.
    #[must_use]
    pub fn to_improper(self) -> Self {
        Self::from_raw(0, self.whole * self.d + self.n, self.d)
    }

    /// Swap numerator and denominator of the improper form.
    ///
    /// # Errors
    ///
    /// Returns `FractionError::ZeroDenominator` when the value is zero.
    pub fn reciprocal(self) -> Result<Self, FractionError> {
        let improper = self.to_improper();
        Self::improper(improper.d, improper.n)
    }

    /// True when the value carries a whole part.
    #[must_use]
    pub fn is_mixed(&self) -> bool {
        self.whole > 0
    }

    /// True for the fully reduced mixed form (`0 <= n < d`, `gcd(n, d) = 1`).
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.n < self.d && crate::math::gcd(self.n, self.d) == 1
    }

    /// Approximate decimal value, used for sign comparisons.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self) -> f64 {
        self.whole as f64 + self.n as f64 / self.d as f64
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.whole, self.n) {
            (0, n) => write!(f, "{n}/{}", self.d),
            (whole, 0) => write!(f, "{whole}"),
            (whole, n) => write!(f, "{whole} {n}/{}", self.d),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_is_rejected() {
        assert_eq!(Fraction::new(1, 2, 0), Err(FractionError::ZeroDenominator));
        assert_eq!(Fraction::improper(2, 0), Err(FractionError::ZeroDenominator));
    }

    #[test]
    fn to_improper_folds_whole_part() {
        let f = Fraction::new(3, 1, 2).unwrap();
        let imp = f.to_improper();
        assert_eq!(imp.whole(), 0);
        assert_eq!(imp.numerator(), 7);
        assert_eq!(imp.denominator(), 2);
    }

    #[test]
    fn reciprocal_of_mixed_uses_improper_form() {
        let f = Fraction::new(1, 1, 3).unwrap();
        assert_eq!(f.reciprocal().unwrap(), Fraction::improper(3, 4).unwrap());
        assert_eq!(
            Fraction::improper(0, 5).unwrap().reciprocal(),
            Err(FractionError::ZeroDenominator)
        );
    }

    #[test]
    fn equality_is_structural() {
        let half = Fraction::improper(1, 2).unwrap();
        let two_quarters = Fraction::improper(2, 4).unwrap();
        assert_ne!(half, two_quarters);
    }

    #[test]
    fn shape_predicates() {
        assert!(Fraction::new(2, 1, 3).unwrap().is_mixed());
        assert!(!Fraction::improper(7, 2).unwrap().is_mixed());
        assert!(Fraction::new(1, 5, 6).unwrap().is_canonical());
        assert!(!Fraction::improper(2, 4).unwrap().is_canonical());
        assert!(!Fraction::improper(7, 2).unwrap().is_canonical());
    }

    #[test]
    fn display_formats() {
        assert_eq!(Fraction::improper(11, 6).unwrap().to_string(), "11/6");
        assert_eq!(Fraction::new(1, 5, 6).unwrap().to_string(), "1 5/6");
        assert_eq!(Fraction::new(2, 0, 1).unwrap().to_string(), "2");
    }

    #[test]
    fn deserialize_rejects_zero_denominator() {
        let ok: Fraction = serde_json::from_str(r#"{"whole":1,"n":1,"d":2}"#).unwrap();
        assert_eq!(ok, Fraction::new(1, 1, 2).unwrap());

        let bad = serde_json::from_str::<Fraction>(r#"{"whole":0,"n":1,"d":0}"#);
        assert!(bad.is_err());
    }
}
