#![forbid(unsafe_code)]

pub mod error;
pub mod locale;
pub mod model;
pub mod ptbr;
pub mod schedule;
pub mod time;

pub use error::Error;
pub use time::{Clock, FIXED_TEST_TIMESTAMP, fixed_clock, fixed_now};

pub use model::{Course, CourseCatalog, CourseId, Lesson, LessonId, Module, ModuleId, UserId};

pub use schedule::{
    ModuleRef, Pace, Schedule, ScheduleError, ScheduleOptions, ScheduleSession, ScheduleWarning,
    SessionLesson, generate_schedule,
};
