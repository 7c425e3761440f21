#![forbid(unsafe_code)]

pub mod client;
pub mod error;
pub mod progress;
pub mod schedule;

pub use trilha_core::Clock;

pub use error::{ApiError, PlannerError, ProgressError};

pub use client::{ApiClient, ApiConfig, CourseProgress};
pub use progress::{LessonProgress, MergeSource, ProgressDocument, ProgressStore};
pub use schedule::{
    ProgressOverview, SchedulePlanner, SessionStatus, StudyPlan, WeekGroup, week_groups,
};
