mod planner;
mod view;

// Public API of the schedule subsystem.
pub use crate::error::PlannerError;
pub use planner::{SchedulePlanner, StudyPlan};
pub use view::{ProgressOverview, SessionStatus, WeekGroup, week_groups};
