use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::fmt;

use trilha_core::{LessonId, ScheduleSession};

/// Completion state of one scheduled session.
///
/// Derived from a lesson-completion map; lessons without an identifier can
/// never be marked complete, so a session made only of them stays pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pendente,
    Parcial,
    Concluida,
}

impl SessionStatus {
    /// Status of `session` given a lesson-completion map.
    #[must_use]
    pub fn of_session(session: &ScheduleSession, completion: &HashMap<LessonId, bool>) -> Self {
        let total = session.lessons().len();
        let done = session
            .lessons()
            .iter()
            .filter(|item| {
                item.lesson()
                    .id()
                    .is_some_and(|id| completion.get(id).copied().unwrap_or(false))
            })
            .count();
        if total > 0 && done == total {
            Self::Concluida
        } else if done > 0 {
            Self::Parcial
        } else {
            Self::Pendente
        }
    }

    /// Product label, PT-BR.
    #[must_use]
    pub fn label_pt(self) -> &'static str {
        match self {
            Self::Pendente => "Pendente",
            Self::Parcial => "Parcial",
            Self::Concluida => "Concluída",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label_pt())
    }
}

/// Sessions of one calendar week, in schedule order.
///
/// Like the rest of this module this is presentation-agnostic:
/// - no pre-formatted strings
/// - no localization assumptions
///
/// Renderers pick their own date and label formats.
#[derive(Debug, Clone)]
pub struct WeekGroup<'a> {
    week_num: u32,
    sessions: Vec<&'a ScheduleSession>,
}

impl<'a> WeekGroup<'a> {
    /// 1-based week number relative to the schedule start.
    #[must_use]
    pub fn week_num(&self) -> u32 {
        self.week_num
    }

    /// The week's sessions, in schedule order.
    #[must_use]
    pub fn sessions(&self) -> &[&'a ScheduleSession] {
        &self.sessions
    }

    /// First and last session dates of the week; equal for one-session weeks.
    #[must_use]
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.sessions.first(), self.sessions.last()) {
            (Some(first), Some(last)) => Some((first.date(), last.date())),
            _ => None,
        }
    }
}

/// Groups sessions by week number, preserving first-seen week order.
#[must_use]
pub fn week_groups(sessions: &[ScheduleSession]) -> Vec<WeekGroup<'_>> {
    let mut groups: Vec<WeekGroup<'_>> = Vec::new();
    for session in sessions {
        match groups
            .iter_mut()
            .find(|group| group.week_num == session.week_num())
        {
            Some(group) => group.sessions.push(session),
            None => groups.push(WeekGroup {
                week_num: session.week_num(),
                sessions: vec![session],
            }),
        }
    }
    groups
}

/// Aggregate progress over a whole schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressOverview {
    /// Distinct scheduled lessons already complete.
    pub completed_lessons: usize,
    /// Distinct scheduled lessons still to do.
    pub remaining_lessons: usize,
    /// Sessions still ahead of the student.
    pub remaining_sessions: usize,
    /// Estimated minutes across the remaining sessions.
    pub remaining_minutes: u32,
}

impl ProgressOverview {
    /// Computes the overview for `sessions` against a lesson-completion map.
    ///
    /// A session with no identifiable lessons is always still ahead;
    /// otherwise it counts as remaining until every identified lesson in it
    /// is complete.
    #[must_use]
    pub fn compute(sessions: &[ScheduleSession], completion: &HashMap<LessonId, bool>) -> Self {
        let mut scheduled: HashSet<&LessonId> = HashSet::new();
        for session in sessions {
            for item in session.lessons() {
                if let Some(id) = item.lesson().id() {
                    scheduled.insert(id);
                }
            }
        }
        let completed_lessons = scheduled
            .iter()
            .filter(|id| completion.get(**id).copied().unwrap_or(false))
            .count();
        let remaining_lessons = scheduled.len().saturating_sub(completed_lessons);

        let mut remaining_sessions = 0;
        let mut remaining_minutes = 0;
        for session in sessions {
            if session_is_remaining(session, completion) {
                remaining_sessions += 1;
                remaining_minutes += session.duration_min();
            }
        }

        Self {
            completed_lessons,
            remaining_lessons,
            remaining_sessions,
            remaining_minutes,
        }
    }
}

fn session_is_remaining(session: &ScheduleSession, completion: &HashMap<LessonId, bool>) -> bool {
    let ids: Vec<&LessonId> = session
        .lessons()
        .iter()
        .filter_map(|item| item.lesson().id())
        .collect();
    if ids.is_empty() {
        return true;
    }
    !ids.iter()
        .all(|id| completion.get(*id).copied().unwrap_or(false))
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
