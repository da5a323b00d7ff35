//! Lenient reading of learner input.
//!
//! Unparseable or missing numbers count as `0`; a missing, unparseable or zero
//! denominator counts as `1`. Input is never rejected here: a bad entry simply
//! fails the step check.

use crate::model::Fraction;

/// Parse a whole part or numerator. Anything unparseable is `0`.
#[must_use]
pub fn parse_count(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}

/// Parse a denominator. Anything unparseable, and `0`, is `1`.
#[must_use]
pub fn parse_denominator(raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => 1,
        Ok(d) => d,
    }
}

/// The three text boxes of a fraction input: whole part, numerator, denominator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FractionEntry {
    pub whole: String,
    pub numerator: String,
    pub denominator: String,
}

impl FractionEntry {
    #[must_use]
    pub fn from_fields(
        whole: impl Into<String>,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        Self {
            whole: whole.into(),
            numerator: numerator.into(),
            denominator: denominator.into(),
        }
    }

    /// Split a one-line answer into fields.
    ///
    /// Accepted shapes: `"w n/d"`, `"n/d"`, `"w"`, `"n d"` and `"w n d"`.
    /// Anything else is split as best it can and left to the lenient parsers.
    ///
    /// ```
    /// # use fraction_core::input::FractionEntry;
    /// # use fraction_core::model::Fraction;
    /// assert_eq!(FractionEntry::parse("3 1/2").to_fraction(), Fraction::new(3, 1, 2)?);
    /// assert_eq!(FractionEntry::parse("7/2").to_fraction(), Fraction::improper(7, 2)?);
    /// assert_eq!(FractionEntry::parse("abc").to_fraction(), Fraction::improper(0, 1)?);
    /// # Ok::<(), fraction_core::model::FractionError>(())
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if let Some((head, denominator)) = text.rsplit_once('/') {
            let mut parts = head.split_whitespace();
            let first = parts.next().unwrap_or_default();
            return match parts.next() {
                Some(numerator) => Self::from_fields(first, numerator, denominator),
                None => Self::from_fields("", first, denominator),
            };
        }

        let parts: Vec<&str> = text.split_whitespace().collect();
        match parts.as_slice() {
            [] => Self::default(),
            [whole] => Self::from_fields(*whole, "", ""),
            [numerator, denominator] => Self::from_fields("", *numerator, *denominator),
            [whole, numerator, denominator, ..] => {
                Self::from_fields(*whole, *numerator, *denominator)
            }
        }
    }

    /// Read the entry with the lenient rules.
    #[must_use]
    pub fn to_fraction(&self) -> Fraction {
        Fraction::from_raw(
            parse_count(&self.whole),
            parse_count(&self.numerator),
            parse_denominator(&self.denominator),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(whole: u64, n: u64, d: u64) -> Fraction {
        Fraction::new(whole, n, d).unwrap()
    }

    #[test]
    fn counts_default_to_zero() {
        assert_eq!(parse_count(" 12 "), 12);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("x"), 0);
        assert_eq!(parse_count("-3"), 0);
    }

    #[test]
    fn denominators_default_to_one() {
        assert_eq!(parse_denominator("6"), 6);
        assert_eq!(parse_denominator(""), 1);
        assert_eq!(parse_denominator("0"), 1);
        assert_eq!(parse_denominator("?"), 1);
    }

    #[test]
    fn empty_entry_is_zero_over_one() {
        assert_eq!(FractionEntry::default().to_fraction(), frac(0, 0, 1));
    }

    #[test]
    fn fields_are_read_leniently() {
        let entry = FractionEntry::from_fields("", "7", "2");
        assert_eq!(entry.to_fraction(), frac(0, 7, 2));
        let entry = FractionEntry::from_fields("1", "oops", "0");
        assert_eq!(entry.to_fraction(), frac(1, 0, 1));
    }

    #[test]
    fn one_line_shapes() {
        assert_eq!(FractionEntry::parse("1 5/6").to_fraction(), frac(1, 5, 6));
        assert_eq!(FractionEntry::parse(" 11/6 ").to_fraction(), frac(0, 11, 6));
        assert_eq!(FractionEntry::parse("2").to_fraction(), frac(2, 0, 1));
        assert_eq!(FractionEntry::parse("9 6").to_fraction(), frac(0, 9, 6));
        assert_eq!(FractionEntry::parse("1 5 6").to_fraction(), frac(1, 5, 6));
        assert_eq!(FractionEntry::parse("").to_fraction(), frac(0, 0, 1));
        assert_eq!(FractionEntry::parse("3/0").to_fraction(), frac(0, 3, 1));
    }
}
