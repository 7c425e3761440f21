use std::collections::HashMap;
use std::sync::Arc;

use storage::kv::{InMemoryStore, KeyValueStore};
use trilha_core::{
    Course, LessonId, Schedule, ScheduleOptions, ScheduleSession, UserId, generate_schedule,
};

use super::view::{ProgressOverview, SessionStatus, WeekGroup, week_groups};
use crate::Clock;
use crate::error::PlannerError;
use crate::progress::ProgressStore;

/// Scheduling facade that hides storage and time from front ends.
///
/// This service owns:
/// - the time source (`Clock`)
/// - progress persistence
///
/// It does **not** own formatting; renderers live in the export crate.
#[derive(Clone)]
pub struct SchedulePlanner {
    clock: Clock,
    progress: ProgressStore,
}

impl SchedulePlanner {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            clock,
            progress: ProgressStore::new(store),
        }
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(clock, Arc::new(InMemoryStore::new()))
    }

    /// The progress store backing this planner.
    #[must_use]
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    /// Options pre-filled with the product default start date, the Monday
    /// after the clock's current date.
    #[must_use]
    pub fn default_options(&self) -> ScheduleOptions {
        ScheduleOptions::starting_next_monday(&self.clock)
    }

    /// Generates a schedule over every module of `course`.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::Schedule` when date arithmetic runs past the
    /// supported calendar range.
    pub fn plan(
        &self,
        course: &Course,
        options: &ScheduleOptions,
    ) -> Result<Schedule, PlannerError> {
        Ok(generate_schedule(course.modules(), options)?)
    }

    /// Generates a schedule and pairs it with the user's stored completion
    /// state.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError` when generation fails or progress cannot be
    /// read.
    pub async fn plan_for_user(
        &self,
        course: &Course,
        options: &ScheduleOptions,
        user: &UserId,
    ) -> Result<StudyPlan, PlannerError> {
        let schedule = self.plan(course, options)?;
        let completion = self.progress.completion_map(user).await?;
        Ok(StudyPlan {
            schedule,
            completion,
        })
    }
}

/// A generated schedule joined with a lesson-completion view of it.
#[derive(Debug, Clone)]
pub struct StudyPlan {
    schedule: Schedule,
    completion: HashMap<LessonId, bool>,
}

impl StudyPlan {
    #[must_use]
    pub fn new(schedule: Schedule, completion: HashMap<LessonId, bool>) -> Self {
        Self {
            schedule,
            completion,
        }
    }

    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    #[must_use]
    pub fn completion(&self) -> &HashMap<LessonId, bool> {
        &self.completion
    }

    /// Sessions grouped into calendar weeks.
    #[must_use]
    pub fn weeks(&self) -> Vec<WeekGroup<'_>> {
        week_groups(self.schedule.sessions())
    }

    /// Completion status of one session under this plan's view.
    #[must_use]
    pub fn status_of(&self, session: &ScheduleSession) -> SessionStatus {
        SessionStatus::of_session(session, &self.completion)
    }

    /// Aggregate progress over the whole schedule.
    #[must_use]
    pub fn overview(&self) -> ProgressOverview {
        ProgressOverview::compute(self.schedule.sessions(), &self.completion)
    }

    /// Folds server-side lesson status into the completion view. Only
    /// positive status flips anything: the server never un-completes a
    /// lesson the student finished locally.
    pub fn apply_remote_status(&mut self, status: &HashMap<LessonId, bool>) {
        for (id, done) in status {
            if *done {
                self.completion.insert(id.clone(), true);
            }
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use trilha_core::{Lesson, LessonId, Module, ModuleId, fixed_clock};

    fn build_course(lessons_per_module: usize, modules: usize) -> Course {
        let mut out = Vec::with_capacity(modules);
        let mut n = 0;
        for m in 1..=modules {
            let lessons = (0..lessons_per_module)
                .map(|_| {
                    n += 1;
                    Lesson::new(LessonId::new(format!("l{n}")).unwrap(), format!("Aula {n}"))
                })
                .collect();
            out.push(
                Module::new(ModuleId::new(format!("mod{m}")).unwrap(), format!("Módulo {m}"))
                    .with_lessons(lessons),
            );
        }
        Course::new(trilha_core::CourseId::new("sql-course").unwrap(), "SQL do Zero")
            .with_modules(out)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn default_options_start_the_following_monday() {
        let planner = SchedulePlanner::in_memory(fixed_clock());
        // The fixed clock reads 2023-11-14, a Tuesday.
        assert_eq!(
            planner.default_options().start_date(),
            date(2023, 11, 20)
        );
    }

    #[test]
    fn plan_walks_the_whole_course() {
        let planner = SchedulePlanner::in_memory(fixed_clock());
        let course = build_course(5, 2);
        let options = ScheduleOptions::new(date(2025, 1, 6));

        let schedule = planner.plan(&course, &options).unwrap();
        assert_eq!(schedule.total_lessons(), 10);
        assert_eq!(schedule.sessions().len(), 5);
    }

    #[tokio::test]
    async fn plan_for_user_reads_stored_progress() {
        use crate::progress::LessonProgress;

        let planner = SchedulePlanner::in_memory(fixed_clock());
        let course = build_course(2, 1);
        let options = ScheduleOptions::new(date(2025, 1, 6));
        let user = UserId::new("u1").unwrap();

        let mut entry = LessonProgress::new(1);
        entry.mark_challenge(0, 10);
        planner
            .progress()
            .write_lesson(&user, LessonId::new("l1").unwrap(), entry)
            .await
            .unwrap();

        let plan = planner.plan_for_user(&course, &options, &user).await.unwrap();
        let overview = plan.overview();
        assert_eq!(overview.completed_lessons, 1);
        assert_eq!(overview.remaining_lessons, 1);

        let first = &plan.schedule().sessions()[0];
        assert_eq!(plan.status_of(first), SessionStatus::Parcial);
    }

    #[tokio::test]
    async fn remote_status_only_adds_completions() {
        let planner = SchedulePlanner::in_memory(fixed_clock());
        let course = build_course(2, 1);
        let options = ScheduleOptions::new(date(2025, 1, 6));
        let user = UserId::new("u1").unwrap();

        let mut plan = planner.plan_for_user(&course, &options, &user).await.unwrap();
        assert_eq!(plan.overview().completed_lessons, 0);

        let mut status = HashMap::new();
        status.insert(LessonId::new("l1").unwrap(), true);
        status.insert(LessonId::new("l2").unwrap(), false);
        plan.apply_remote_status(&status);

        assert_eq!(plan.overview().completed_lessons, 1);
        assert_eq!(plan.weeks().len(), 1);
    }
}
