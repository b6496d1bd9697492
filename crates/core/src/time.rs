use chrono::{DateTime, Duration, Utc};

/// Source of "now" for session timestamps, fixed in tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Deadline for a timed test started at `started_at`.
#[must_use]
pub fn deadline(started_at: DateTime<Utc>, time_limit_minutes: u32) -> DateTime<Utc> {
    started_at + Duration::minutes(i64::from(time_limit_minutes))
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_stable() {
        let clock = Clock::fixed(fixed_now());
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn deadline_adds_minutes() {
        let end = deadline(fixed_now(), 90);
        assert_eq!((end - fixed_now()).num_minutes(), 90);
    }
}
