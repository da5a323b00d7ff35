//! Wall-clock access for session timestamps.

use chrono::{DateTime, Duration, Utc};

/// Source of "now" for practice sessions. Tests pin it with `Clock::Fixed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }

    /// Move a fixed clock forward. A system clock ignores this.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(at) = self {
            *at += delta;
        }
    }

    /// Whole seconds between `since` and now, clamped at zero.
    #[must_use]
    pub fn elapsed_secs(&self, since: DateTime<Utc>) -> u64 {
        u64::try_from((self.now() - since).num_seconds()).unwrap_or(0)
    }
}

/// 2023-11-14T22:13:20Z, used to pin clocks in tests and doc examples.
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// A clock pinned at [`FIXED_TEST_TIMESTAMP`].
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::Fixed(DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        let start = clock.now();
        assert_eq!(start.timestamp(), FIXED_TEST_TIMESTAMP);
        clock.advance(Duration::seconds(90));
        assert_eq!(clock.elapsed_secs(start), 90);
    }

    #[test]
    fn elapsed_never_goes_negative() {
        let clock = fixed_clock();
        let later = clock.now() + Duration::minutes(5);
        assert_eq!(clock.elapsed_secs(later), 0);
    }

    #[test]
    fn system_clock_ignores_advance() {
        let mut clock = Clock::System;
        clock.advance(Duration::days(1));
        assert_eq!(clock, Clock::System);
    }
}
