use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
///
/// Schedule generation and calendar export both stamp artifacts with "now"
/// (event UIDs, DTSTAMP, default start dates), so every entry point takes a
/// `Clock` instead of reaching for the system time directly.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

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

    /// Returns the current calendar date according to the clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Returns true if this clock represents real time.
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Clock::Default)
    }

    /// Returns true if this clock is fixed.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

/// Returns the next Monday strictly after `from`.
///
/// This is the default start date offered when planning a schedule: starting
/// "next week" reads better than starting mid-week, and a `from` that is
/// already a Monday maps to the following one, never to itself.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use trilha_core::time::next_monday;
///
/// let sat = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
/// assert_eq!(next_monday(sat), NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
///
/// let mon = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
/// assert_eq!(next_monday(mon), NaiveDate::from_ymd_opt(2025, 1, 13).unwrap());
/// ```
#[must_use]
pub fn next_monday(from: NaiveDate) -> NaiveDate {
    let ahead = 7 - i64::from(from.weekday().num_days_from_monday());
    from + Duration::days(ahead)
}

/// Formats a date as `YYYY-MM-DD`, the interchange form used by CLI flags
/// and date inputs.
#[must_use]
pub fn to_input_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
