use chrono::NaiveDate;
use std::fmt;

use crate::model::{Lesson, Module, ModuleId};
use crate::schedule::MINUTES_PER_LESSON;

/// Identifier and title of a module, carried alongside scheduled lessons so
/// consumers never need the full course to label a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRef {
    id: ModuleId,
    title: String,
}

impl ModuleRef {
    /// Creates a module reference.
    #[must_use]
    pub fn new(id: ModuleId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// The module identifier.
    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    /// The module title as stored; may be blank.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl From<&Module> for ModuleRef {
    fn from(module: &Module) -> Self {
        Self::new(module.id().clone(), module.title())
    }
}

/// A lesson placed in a session, keeping the module it came from.
///
/// Sessions may span a module boundary, so each entry carries its own module
/// reference rather than inheriting the session's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLesson {
    module: ModuleRef,
    lesson: Lesson,
}

impl SessionLesson {
    /// Creates an entry for a lesson under the given module.
    #[must_use]
    pub fn new(module: ModuleRef, lesson: Lesson) -> Self {
        Self { module, lesson }
    }

    /// The module the lesson belongs to.
    #[must_use]
    pub fn module(&self) -> &ModuleRef {
        &self.module
    }

    /// The lesson itself.
    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }
}

/// One dated study session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSession {
    date: NaiveDate,
    week_num: u32,
    module: ModuleRef,
    lessons: Vec<SessionLesson>,
    duration_min: u32,
}

impl ScheduleSession {
    /// Creates a session; the duration follows from the lesson count.
    #[must_use]
    pub fn new(date: NaiveDate, week_num: u32, module: ModuleRef, lessons: Vec<SessionLesson>) -> Self {
        let duration_min = lessons.len() as u32 * MINUTES_PER_LESSON;
        Self {
            date,
            week_num,
            module,
            lessons,
            duration_min,
        }
    }

    /// Calendar date of the session.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// 1-based week number relative to the schedule's start date.
    #[must_use]
    pub fn week_num(&self) -> u32 {
        self.week_num
    }

    /// The session's primary module: the module of its first lesson.
    #[must_use]
    pub fn module(&self) -> &ModuleRef {
        &self.module
    }

    /// Lessons in study order.
    #[must_use]
    pub fn lessons(&self) -> &[SessionLesson] {
        &self.lessons
    }

    /// Estimated duration in minutes.
    #[must_use]
    pub fn duration_min(&self) -> u32 {
        self.duration_min
    }
}

/// Non-fatal conditions surfaced alongside a generated schedule.
///
/// These render as the exact PT-BR strings shown to students, so `Display`
/// is the contract; the variants exist so callers can branch without string
/// matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleWarning {
    /// The start/end window contains no study day at all.
    NoAvailableDays,
    /// The deadline would require more than the per-session cap; the plan was
    /// clamped and will overflow past the deadline.
    DeadlineTooTight { required: usize },
}

impl fmt::Display for ScheduleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleWarning::NoAvailableDays => {
                write!(f, "Nenhum dia útil disponível neste período. Ajuste as datas.")
            }
            ScheduleWarning::DeadlineTooTight { required } => write!(
                f,
                "Prazo muito curto — seria necessário {required} aulas/sessão. \
                 Considere um prazo maior ou ritmo mais intenso."
            ),
        }
    }
}

/// A complete generated study schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    sessions: Vec<ScheduleSession>,
    total_lessons: usize,
    total_weeks: u32,
    avg_session_min: u32,
    lessons_per_session: usize,
    days_per_week: u8,
    warning: Option<ScheduleWarning>,
}

impl Schedule {
    pub(crate) fn from_parts(
        sessions: Vec<ScheduleSession>,
        total_lessons: usize,
        lessons_per_session: usize,
        days_per_week: u8,
        warning: Option<ScheduleWarning>,
    ) -> Self {
        let total_weeks = sessions.last().map_or(0, ScheduleSession::week_num);
        let avg_session_min = if sessions.is_empty() {
            0
        } else {
            let total: u32 = sessions.iter().map(ScheduleSession::duration_min).sum();
            (f64::from(total) / sessions.len() as f64).round() as u32
        };
        Self {
            sessions,
            total_lessons,
            total_weeks,
            avg_session_min,
            lessons_per_session,
            days_per_week,
            warning,
        }
    }

    /// Sessions in chronological order.
    #[must_use]
    pub fn sessions(&self) -> &[ScheduleSession] {
        &self.sessions
    }

    /// Total number of lessons planned, locked ones included.
    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.total_lessons
    }

    /// Week number of the last session, or 0 for an empty schedule.
    #[must_use]
    pub fn total_weeks(&self) -> u32 {
        self.total_weeks
    }

    /// Mean session duration in minutes, rounded; 0 for an empty schedule.
    #[must_use]
    pub fn avg_session_min(&self) -> u32 {
        self.avg_session_min
    }

    /// Effective lessons per session after any deadline fitting and clamping.
    #[must_use]
    pub fn lessons_per_session(&self) -> usize {
        self.lessons_per_session
    }

    /// The days-per-week the schedule was requested with.
    #[must_use]
    pub fn days_per_week(&self) -> u8 {
        self.days_per_week
    }

    /// Warning to surface to the student, if any.
    #[must_use]
    pub fn warning(&self) -> Option<&ScheduleWarning> {
        self.warning.as_ref()
    }

    /// True when the schedule has no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LessonId;

    fn module_ref() -> ModuleRef {
        ModuleRef::new(ModuleId::new("mod1").unwrap(), "Fundamentos")
    }

    fn entry(id: &str) -> SessionLesson {
        SessionLesson::new(
            module_ref(),
            Lesson::new(LessonId::new(id).unwrap(), format!("Aula {id}")),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn session_duration_follows_lesson_count() {
        let session = ScheduleSession::new(
            date(2025, 1, 6),
            1,
            module_ref(),
            vec![entry("l1"), entry("l2"), entry("l3")],
        );
        assert_eq!(session.duration_min(), 120);
    }

    #[test]
    fn empty_schedule_has_zero_totals() {
        let schedule = Schedule::from_parts(Vec::new(), 0, 2, 3, None);
        assert!(schedule.is_empty());
        assert_eq!(schedule.total_weeks(), 0);
        assert_eq!(schedule.avg_session_min(), 0);
    }

    #[test]
    fn averages_round_to_nearest_minute() {
        let sessions = vec![
            ScheduleSession::new(date(2025, 1, 6), 1, module_ref(), vec![entry("l1")]),
            ScheduleSession::new(
                date(2025, 1, 8),
                1,
                module_ref(),
                vec![entry("l2"), entry("l3")],
            ),
            ScheduleSession::new(
                date(2025, 1, 10),
                1,
                module_ref(),
                vec![entry("l4"), entry("l5")],
            ),
        ];
        // (40 + 80 + 80) / 3 = 66.67 → 67.
        let schedule = Schedule::from_parts(sessions, 5, 2, 3, None);
        assert_eq!(schedule.avg_session_min(), 67);
        assert_eq!(schedule.total_weeks(), 1);
    }

    #[test]
    fn warning_strings_are_the_product_copy() {
        assert_eq!(
            ScheduleWarning::NoAvailableDays.to_string(),
            "Nenhum dia útil disponível neste período. Ajuste as datas."
        );
        assert_eq!(
            ScheduleWarning::DeadlineTooTight { required: 7 }.to_string(),
            "Prazo muito curto — seria necessário 7 aulas/sessão. \
             Considere um prazo maior ou ritmo mais intenso."
        );
    }
}
