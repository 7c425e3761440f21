use chrono::NaiveDate;

use crate::model::Module;
use crate::schedule::{
    DEFAULT_LESSONS_PER_SESSION, MAX_LESSONS_PER_SESSION, Pace, Schedule, ScheduleError,
    ScheduleSession, ScheduleWarning, collect_available_days, flatten_lessons,
    group_into_sessions, next_day_in_mask, resolve_mask,
};
use crate::time::{Clock, next_monday};

/// Inputs for schedule generation.
///
/// Two modes fall out of `end_date`:
///
/// * without it, the plan is pace-driven: two lessons per session on the
///   weekly cadence, however long that takes;
/// * with it, the plan is deadline-driven: every lesson is fitted into the
///   study days available before the deadline, raising the per-session load
///   as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleOptions {
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    days_per_week: u8,
}

impl ScheduleOptions {
    /// Options starting at the given date with the default 3-day cadence.
    #[must_use]
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date: None,
            days_per_week: Pace::default().days_per_week(),
        }
    }

    /// Options starting on the Monday after the clock's current date, the
    /// default offered when planning.
    #[must_use]
    pub fn starting_next_monday(clock: &Clock) -> Self {
        Self::new(next_monday(clock.today()))
    }

    /// Sets a deadline, switching generation to deadline-driven mode.
    #[must_use]
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Sets the raw days-per-week count (3, 4 or 5; anything else resolves
    /// to the 3-day cadence).
    #[must_use]
    pub fn with_days_per_week(mut self, days_per_week: u8) -> Self {
        self.days_per_week = days_per_week;
        self
    }

    /// Sets the cadence from a pace preset.
    #[must_use]
    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.days_per_week = pace.days_per_week();
        self
    }

    /// First candidate study date.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Deadline, when planning toward one.
    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Requested days-per-week count, echoed into the schedule.
    #[must_use]
    pub fn days_per_week(&self) -> u8 {
        self.days_per_week
    }
}

/// Generates a dated study schedule for the given course modules.
///
/// Locked lessons are scheduled after all unlocked ones. Deadline-driven
/// plans that would need more than [`MAX_LESSONS_PER_SESSION`] lessons per
/// session are clamped to that cap and flagged with a warning; the clamped
/// tail reuses the last available day rather than dropping lessons, so the
/// plan may deliberately overflow the deadline.
///
/// # Errors
///
/// Returns [`ScheduleError::DateOverflow`] if date arithmetic runs past the
/// supported calendar range.
pub fn generate_schedule(
    modules: &[Module],
    options: &ScheduleOptions,
) -> Result<Schedule, ScheduleError> {
    let flat = flatten_lessons(modules);
    let total_lessons = flat.total();
    let all_lessons = flat.into_scheduling_order();

    let mask = resolve_mask(options.days_per_week());
    let mut lessons_per_session = DEFAULT_LESSONS_PER_SESSION;
    let mut warning = None;
    let mut available_days: Option<Vec<NaiveDate>> = None;

    if let Some(end_date) = options.end_date() {
        let days = collect_available_days(options.start_date(), end_date, mask)?;
        if days.is_empty() {
            return Ok(Schedule::from_parts(
                Vec::new(),
                total_lessons,
                lessons_per_session,
                options.days_per_week(),
                Some(ScheduleWarning::NoAvailableDays),
            ));
        }

        lessons_per_session = total_lessons.div_ceil(days.len());
        if lessons_per_session > MAX_LESSONS_PER_SESSION {
            warning = Some(ScheduleWarning::DeadlineTooTight {
                required: lessons_per_session,
            });
            lessons_per_session = MAX_LESSONS_PER_SESSION;
        }
        available_days = Some(days);
    }

    let chunks = group_into_sessions(all_lessons, lessons_per_session);

    let mut sessions = Vec::with_capacity(chunks.len());
    let mut cursor = options.start_date();
    for (idx, chunk) in chunks.into_iter().enumerate() {
        let date = match &available_days {
            // Deadline mode: one session per collected day; a clamped plan
            // can have more sessions than days, and the tail reuses the last
            // day instead of dropping lessons.
            Some(days) => match days.get(idx) {
                Some(day) => *day,
                None => *days.last().ok_or(ScheduleError::DateOverflow)?,
            },
            // Pace mode: the first session may land on the start date itself;
            // every later one advances at least one day first.
            None => {
                let date = next_day_in_mask(cursor, mask, idx > 0)?;
                cursor = date;
                date
            }
        };

        let Some(first) = chunk.first() else {
            continue;
        };
        let module = first.module().clone();
        let week_num = week_number(options.start_date(), date);
        sessions.push(ScheduleSession::new(date, week_num, module, chunk));
    }

    Ok(Schedule::from_parts(
        sessions,
        total_lessons,
        lessons_per_session,
        options.days_per_week(),
        warning,
    ))
}

/// 1-based week number of `date` relative to `start`.
fn week_number(start: NaiveDate, date: NaiveDate) -> u32 {
    let diff_days = (date - start).num_days();
    (diff_days.div_euclid(7) + 1) as u32
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Lesson, LessonId, ModuleId};
    use crate::time::fixed_clock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn lesson(id: &str) -> Lesson {
        Lesson::new(LessonId::new(id).unwrap(), format!("Aula {id}"))
    }

    /// `count` lessons spread over modules of five.
    fn build_modules(count: usize) -> Vec<Module> {
        let mut modules = Vec::new();
        let mut remaining = count;
        let mut module_idx = 0;
        while remaining > 0 {
            module_idx += 1;
            let in_module = remaining.min(5);
            let start = count - remaining;
            let lessons = (0..in_module)
                .map(|i| lesson(&format!("l{}", start + i + 1)))
                .collect();
            modules.push(
                Module::new(
                    ModuleId::new(format!("mod{module_idx}")).unwrap(),
                    format!("Módulo {module_idx}"),
                )
                .with_lessons(lessons),
            );
            remaining -= in_module;
        }
        modules
    }

    fn session_dates(schedule: &Schedule) -> Vec<NaiveDate> {
        schedule.sessions().iter().map(|s| s.date()).collect()
    }

    fn scheduled_ids(schedule: &Schedule) -> Vec<String> {
        schedule
            .sessions()
            .iter()
            .flat_map(|s| s.lessons())
            .filter_map(|e| e.lesson().id().map(|id| id.as_str().to_string()))
            .collect()
    }

    #[test]
    fn pace_mode_from_a_monday_start() {
        let modules = build_modules(10);
        let options = ScheduleOptions::new(date(2025, 1, 6));
        let schedule = generate_schedule(&modules, &options).unwrap();

        assert_eq!(schedule.sessions().len(), 5);
        assert_eq!(
            session_dates(&schedule),
            vec![
                date(2025, 1, 6),
                date(2025, 1, 8),
                date(2025, 1, 10),
                date(2025, 1, 13),
                date(2025, 1, 15),
            ]
        );
        let weeks: Vec<_> = schedule.sessions().iter().map(|s| s.week_num()).collect();
        assert_eq!(weeks, [1, 1, 1, 2, 2]);
        assert_eq!(schedule.total_weeks(), 2);
        assert_eq!(schedule.avg_session_min(), 80);
        assert_eq!(schedule.lessons_per_session(), 2);
        assert_eq!(schedule.total_lessons(), 10);
        assert_eq!(schedule.days_per_week(), 3);
        assert!(schedule.warning().is_none());
    }

    #[test]
    fn pace_mode_start_not_on_a_study_day() {
        // Saturday start: the first session slides to Monday without skipping it.
        let modules = build_modules(10);
        let options = ScheduleOptions::new(date(2025, 1, 4));
        let schedule = generate_schedule(&modules, &options).unwrap();

        assert_eq!(schedule.sessions()[0].date(), date(2025, 1, 6));
        assert_eq!(schedule.sessions().len(), 5);
    }

    #[test]
    fn pace_mode_dates_strictly_increase() {
        let modules = build_modules(9);
        let options = ScheduleOptions::new(date(2025, 1, 6)).with_pace(Pace::Intensivo);
        let schedule = generate_schedule(&modules, &options).unwrap();

        let dates = session_dates(&schedule);
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(dates[0], date(2025, 1, 6));
    }

    #[test]
    fn every_lesson_is_scheduled_exactly_once_in_order() {
        let modules = build_modules(11);
        let options = ScheduleOptions::new(date(2025, 1, 6));
        let schedule = generate_schedule(&modules, &options).unwrap();

        let expected: Vec<String> = (1..=11).map(|i| format!("l{i}")).collect();
        assert_eq!(scheduled_ids(&schedule), expected);
        // 11 lessons at 2 per session: five full sessions and a short tail.
        assert_eq!(schedule.sessions().len(), 6);
        assert_eq!(schedule.sessions()[5].duration_min(), 40);
    }

    #[test]
    fn deadline_mode_fits_lessons_to_available_days() {
        // Mon Jan 6 .. Wed Jan 15 with the 3-day mask: 6, 8, 10, 13, 15.
        let modules = build_modules(10);
        let options = ScheduleOptions::new(date(2025, 1, 6)).with_end_date(date(2025, 1, 15));
        let schedule = generate_schedule(&modules, &options).unwrap();

        assert_eq!(schedule.lessons_per_session(), 2);
        assert_eq!(
            session_dates(&schedule),
            vec![
                date(2025, 1, 6),
                date(2025, 1, 8),
                date(2025, 1, 10),
                date(2025, 1, 13),
                date(2025, 1, 15),
            ]
        );
        assert!(schedule.warning().is_none());
    }

    #[test]
    fn deadline_mode_clamps_and_overflows_the_last_day() {
        // Only Jan 6, 8 and 10 are available, but 20 lessons need ceil(20/3)=7
        // per session; the cap brings it down to 4 and the tail reuses Jan 10.
        let modules = build_modules(20);
        let options = ScheduleOptions::new(date(2025, 1, 6)).with_end_date(date(2025, 1, 10));
        let schedule = generate_schedule(&modules, &options).unwrap();

        assert_eq!(schedule.lessons_per_session(), 4);
        assert_eq!(schedule.sessions().len(), 5);
        assert_eq!(
            session_dates(&schedule),
            vec![
                date(2025, 1, 6),
                date(2025, 1, 8),
                date(2025, 1, 10),
                date(2025, 1, 10),
                date(2025, 1, 10),
            ]
        );
        match schedule.warning() {
            Some(ScheduleWarning::DeadlineTooTight { required }) => assert_eq!(*required, 7),
            other => panic!("expected deadline warning, got {other:?}"),
        }
        assert!(
            schedule
                .warning()
                .unwrap()
                .to_string()
                .contains("seria necessário 7 aulas/sessão")
        );
        // No lesson dropped by the clamp.
        assert_eq!(scheduled_ids(&schedule).len(), 20);
    }

    #[test]
    fn deadline_mode_with_no_study_day_warns_and_stays_empty() {
        // Saturday and Sunday only; the weekday masks never match.
        let modules = build_modules(10);
        let options = ScheduleOptions::new(date(2025, 1, 4)).with_end_date(date(2025, 1, 5));
        let schedule = generate_schedule(&modules, &options).unwrap();

        assert!(schedule.is_empty());
        assert_eq!(schedule.total_weeks(), 0);
        assert_eq!(schedule.avg_session_min(), 0);
        assert_eq!(schedule.total_lessons(), 10);
        assert_eq!(schedule.warning(), Some(&ScheduleWarning::NoAvailableDays));
    }

    #[test]
    fn locked_lessons_are_scheduled_last() {
        let modules = vec![
            Module::new(ModuleId::new("mod1").unwrap(), "Fundamentos")
                .with_lessons(vec![lesson("l1"), lesson("l2").locked()]),
            Module::new(ModuleId::new("mod2").unwrap(), "Consultas")
                .with_lessons(vec![lesson("l3")]),
        ];
        let options = ScheduleOptions::new(date(2025, 1, 6));
        let schedule = generate_schedule(&modules, &options).unwrap();

        assert_eq!(scheduled_ids(&schedule), ["l1", "l3", "l2"]);
        // The second session starts with the locked mod1 lesson, so mod1 is
        // its primary module even though it was emitted after mod2 content.
        assert_eq!(schedule.sessions()[1].module().id().as_str(), "mod1");
        // Entries keep their own module across the boundary.
        let first = &schedule.sessions()[0];
        assert_eq!(first.module().id().as_str(), "mod1");
        assert_eq!(first.lessons()[1].module().id().as_str(), "mod2");
    }

    #[test]
    fn zero_lesson_course_is_degenerate_but_valid() {
        let schedule =
            generate_schedule(&[], &ScheduleOptions::new(date(2025, 1, 6))).unwrap();
        assert!(schedule.is_empty());
        assert_eq!(schedule.total_lessons(), 0);
        assert!(schedule.warning().is_none());
    }

    #[test]
    fn durations_follow_the_lesson_count() {
        let modules = build_modules(7);
        let options = ScheduleOptions::new(date(2025, 1, 6)).with_end_date(date(2025, 1, 10));
        // Three days for seven lessons: ceil(7/3) = 3 per session.
        let schedule = generate_schedule(&modules, &options).unwrap();
        assert_eq!(schedule.lessons_per_session(), 3);
        let durations: Vec<_> = schedule
            .sessions()
            .iter()
            .map(|s| (s.lessons().len(), s.duration_min()))
            .collect();
        for (count, duration) in durations {
            assert_eq!(duration, count as u32 * 40);
        }
    }

    #[test]
    fn unknown_cadence_falls_back_to_three_days() {
        let modules = build_modules(4);
        let options = ScheduleOptions::new(date(2025, 1, 6)).with_days_per_week(9);
        let schedule = generate_schedule(&modules, &options).unwrap();
        assert_eq!(
            session_dates(&schedule),
            vec![date(2025, 1, 6), date(2025, 1, 8)]
        );
        assert_eq!(schedule.days_per_week(), 9);
    }

    #[test]
    fn date_overflow_surfaces_as_an_error() {
        // Two sessions from the last representable date: either the first
        // scan or the mandatory advance to the second session runs off the
        // calendar.
        let modules = build_modules(4);
        let options = ScheduleOptions::new(NaiveDate::MAX);
        let result = generate_schedule(&modules, &options);
        assert!(matches!(result, Err(ScheduleError::DateOverflow)));
    }

    #[test]
    fn default_start_is_the_next_monday() {
        // The fixed clock sits on Tue 2023-11-14.
        let options = ScheduleOptions::starting_next_monday(&fixed_clock());
        assert_eq!(options.start_date(), date(2023, 11, 20));
        assert_eq!(options.days_per_week(), 3);
        assert_eq!(options.end_date(), None);
    }
}
