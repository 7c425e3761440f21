use chrono::Weekday;
use std::fmt;
use std::str::FromStr;

/// Bit shift for a weekday in a [`WeekMask`], 0 = Sunday through 6 = Saturday.
fn weekday_bit(day: Weekday) -> u8 {
    1 << day.num_days_from_sunday()
}

/// Set of weekdays a student studies on, stored as a 7-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekMask(u8);

impl WeekMask {
    /// Builds a mask from a list of weekdays.
    #[must_use]
    pub fn from_weekdays(days: &[Weekday]) -> Self {
        Self(days.iter().fold(0, |bits, day| bits | weekday_bit(*day)))
    }

    /// Whether the mask contains the given weekday.
    #[must_use]
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & weekday_bit(day) != 0
    }

    /// Number of study days per week.
    #[must_use]
    pub fn day_count(self) -> u32 {
        self.0.count_ones()
    }

    /// True when no weekday is set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Weekly study cadence presets offered by the planner.
///
/// Each pace maps to a fixed weekday mask; the mapping is the whole point of
/// the preset, so it lives here rather than in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Pace {
    /// 3x per week: Mon, Wed, Fri.
    #[default]
    Leve,
    /// 4x per week: Mon, Tue, Thu, Fri.
    Moderado,
    /// 5x per week: Mon through Fri.
    Intensivo,
}

impl Pace {
    /// Number of study days per week for this pace.
    #[must_use]
    pub fn days_per_week(self) -> u8 {
        match self {
            Pace::Leve => 3,
            Pace::Moderado => 4,
            Pace::Intensivo => 5,
        }
    }

    /// Maps a days-per-week count to a pace.
    ///
    /// Unknown counts fall back to [`Pace::Leve`] silently; callers pass
    /// through values from query params and stored preferences, and a bad
    /// value should degrade to the default cadence rather than fail.
    #[must_use]
    pub fn from_days_per_week(days: u8) -> Self {
        match days {
            4 => Pace::Moderado,
            5 => Pace::Intensivo,
            _ => Pace::Leve,
        }
    }

    /// The weekday mask for this pace.
    #[must_use]
    pub fn weekday_mask(self) -> WeekMask {
        use Weekday::{Fri, Mon, Thu, Tue, Wed};
        match self {
            Pace::Leve => WeekMask::from_weekdays(&[Mon, Wed, Fri]),
            Pace::Moderado => WeekMask::from_weekdays(&[Mon, Tue, Thu, Fri]),
            Pace::Intensivo => WeekMask::from_weekdays(&[Mon, Tue, Wed, Thu, Fri]),
        }
    }

    /// PT-BR label shown in pace pickers.
    #[must_use]
    pub fn label_pt(self) -> &'static str {
        match self {
            Pace::Leve => "Leve (3x/sem)",
            Pace::Moderado => "Moderado (4x/sem)",
            Pace::Intensivo => "Intensivo (5x/sem)",
        }
    }
}

/// Resolves a raw days-per-week count to its weekday mask.
///
/// Unknown counts resolve to the 3-day mask.
#[must_use]
pub fn resolve_mask(days_per_week: u8) -> WeekMask {
    Pace::from_days_per_week(days_per_week).weekday_mask()
}

/// Error type for parsing a pace name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePaceError {
    raw: String,
}

impl fmt::Display for ParsePaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown pace: {}", self.raw)
    }
}

impl std::error::Error for ParsePaceError {}

impl FromStr for Pace {
    type Err = ParsePaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leve" | "3" => Ok(Pace::Leve),
            "moderado" | "4" => Ok(Pace::Moderado),
            "intensivo" | "5" => Ok(Pace::Intensivo),
            _ => Err(ParsePaceError { raw: s.to_string() }),
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pace::Leve => "leve",
            Pace::Moderado => "moderado",
            Pace::Intensivo => "intensivo",
        };
        write!(f, "{name}")
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
