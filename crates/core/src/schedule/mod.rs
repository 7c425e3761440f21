mod assemble;
mod flatten;
mod group;
mod pace;
mod session;
mod window;

use thiserror::Error;

// Public API of the schedule generator.
pub use assemble::{ScheduleOptions, generate_schedule};
pub use flatten::{FlatLessons, flatten_lessons};
pub use group::group_into_sessions;
pub use pace::{Pace, ParsePaceError, WeekMask, resolve_mask};
pub use session::{ModuleRef, Schedule, ScheduleSession, ScheduleWarning, SessionLesson};
pub use window::{collect_available_days, next_day_in_mask};

/// Estimated study time per lesson, in minutes.
pub const MINUTES_PER_LESSON: u32 = 40;

/// Session size in pace-driven mode.
pub const DEFAULT_LESSONS_PER_SESSION: usize = 2;

/// Hard cap on session size when fitting a deadline; plans that would need
/// more get a warning and overflow past the deadline instead.
pub const MAX_LESSONS_PER_SESSION: usize = 4;

/// Errors surfaced by schedule generation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScheduleError {
    #[error("date arithmetic ran past the supported calendar range")]
    DateOverflow,
}
