//! Plain-text rendition of a study schedule.
//!
//! Follows the layout of the platform's printable export: course header,
//! a one-line summary, then sessions grouped by week. Given a completion map
//! the report switches into progress mode and adds per-session status plus
//! the remaining-work figures.

use std::collections::HashMap;

use chrono::Datelike;

use services::{ProgressOverview, SessionStatus, week_groups};
use trilha_core::locale::DayLabels;
use trilha_core::ptbr::fix_text;
use trilha_core::{Clock, LessonId, Schedule, ScheduleSession, SessionLesson};

/// Renders `schedule` as a text report.
///
/// `completion` enables progress mode; weekday names come from `labels` so a
/// caller can swap the language. The clock only feeds the `Gerado em` line.
#[must_use]
pub fn render_report(
    schedule: &Schedule,
    course_title: &str,
    completion: Option<&HashMap<LessonId, bool>>,
    labels: &DayLabels,
    clock: &Clock,
) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push(fix_text(course_title.trim()));
    out.push("Cronograma de Estudos Sugerido".to_string());
    out.push(format!("Gerado em {}", clock.today().format("%d/%m/%Y")));
    out.push(String::new());

    if schedule.is_empty() {
        if let Some(warning) = schedule.warning() {
            out.push(format!("Aviso: {warning}"));
            out.push(String::new());
        }
        out.push("Selecione uma data de início para gerar o cronograma.".to_string());
        return out.join("\n");
    }

    let sessions = schedule.sessions();
    out.push(format!(
        "{} sessões  ·  ~{} min/sessão  ·  {} semanas",
        sessions.len(),
        schedule.avg_session_min(),
        schedule.total_weeks(),
    ));
    if let Some(done) = completion {
        let overview = ProgressOverview::compute(sessions, done);
        out.push(format!(
            "Aulas concluídas: {}  ·  Aulas restantes: {}",
            overview.completed_lessons, overview.remaining_lessons,
        ));
        out.push(format!(
            "Sessões restantes: {}  ·  Tempo restante: ~{}h",
            overview.remaining_sessions,
            rounded_hours(overview.remaining_minutes),
        ));
    }
    if let Some(warning) = schedule.warning() {
        out.push(String::new());
        out.push(format!("Aviso: {warning}"));
    }

    for group in week_groups(sessions) {
        out.push(String::new());
        out.push(match group.date_span() {
            Some((first, last)) => format!(
                "SEMANA {}  ·  {} - {}",
                group.week_num(),
                first.format("%d/%m"),
                last.format("%d/%m"),
            ),
            None => format!("SEMANA {}", group.week_num()),
        });
        for session in group.sessions() {
            out.push(session_line(session, completion, labels));
            for (index, item) in session.lessons().iter().enumerate() {
                out.push(format!("  {}. {}", index + 1, lesson_label(item, index)));
            }
        }
    }

    out.join("\n")
}

fn session_line(
    session: &ScheduleSession,
    completion: Option<&HashMap<LessonId, bool>>,
    labels: &DayLabels,
) -> String {
    let mut line = format!(
        "{} {}  ·  {}  ·  {} min",
        labels.label(session.date().weekday()),
        session.date().format("%d/%m"),
        fix_text(session.module().title()),
        session.duration_min(),
    );
    if let Some(done) = completion {
        let status = SessionStatus::of_session(session, done);
        line.push_str("  ·  ");
        line.push_str(status.label_pt());
    }
    line
}

/// Display title for a lesson entry: the title when present, a readable form
/// of the id (`lesson_3_joins` reads as `joins`), or a positional `Aula N`.
fn lesson_label(item: &SessionLesson, index: usize) -> String {
    let lesson = item.lesson();
    let title = lesson.title().trim();
    if !title.is_empty() {
        return fix_text(title);
    }
    if let Some(id) = lesson.id() {
        return humanize_lesson_id(id.as_str());
    }
    format!("Aula {}", index + 1)
}

/// Strips a `lesson_<n>_` prefix when present and reads underscores as
/// spaces, so bare catalog ids stay legible in the listing.
fn humanize_lesson_id(id: &str) -> String {
    let stripped = id.strip_prefix("lesson_").and_then(|tail| {
        let digits = tail.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        tail[digits..].strip_prefix('_')
    });
    stripped.unwrap_or(id).replace('_', " ")
}

fn rounded_hours(minutes: u32) -> u32 {
    (f64::from(minutes) / 60.0).round() as u32
}
