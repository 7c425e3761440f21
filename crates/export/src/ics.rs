//! iCalendar (RFC 5545) serialization of a study schedule.
//!
//! One `VEVENT` per session, stamped in the calendar's local timezone so the
//! events survive import into Google Calendar, Outlook and Apple Calendar
//! without UTC shifting. Event identity is derived from the session's position
//! and date, never from the wall clock, so re-exporting the same plan updates
//! the existing events instead of duplicating them.

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Utc};
use url::Url;

use trilha_core::ptbr::fix_text;
use trilha_core::{Clock, ScheduleSession, SessionLesson};

/// Timezone the product ships with. Brazil dropped DST in 2019, so the
/// embedded `VTIMEZONE` is a single fixed-offset `STANDARD` component.
pub const BRAZIL_TIMEZONE: &str = "America/Sao_Paulo";

/// Default local hour a study session starts at.
pub const DEFAULT_START_HOUR: u32 = 19;

/// Default local minute a study session starts at.
pub const DEFAULT_START_MINUTE: u32 = 0;

/// Suggested file name when the calendar is saved to disk.
pub const ICS_FILE_NAME: &str = "cronograma-sql.ics";

/// Media type when the calendar is served over HTTP.
pub const ICS_MEDIA_TYPE: &str = "text/calendar;charset=utf-8";

/// Minutes before a session that the reminder alarm fires.
pub const ALARM_LEAD_MIN: u32 = 30;

/// Rendering options for [`build_ics`].
///
/// The defaults produce a Brazil-local calendar with sessions at 19:00 and no
/// class links; links are only emitted once a base URL is configured.
#[derive(Debug, Clone)]
pub struct CalendarOptions {
    timezone: String,
    start_time: NaiveTime,
    base_url: Option<Url>,
    fallback_class_path: String,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            timezone: BRAZIL_TIMEZONE.to_string(),
            start_time: NaiveTime::from_hms_opt(DEFAULT_START_HOUR, DEFAULT_START_MINUTE, 0)
                .expect("default start time is valid"),
            base_url: None,
            fallback_class_path: "/".to_string(),
        }
    }
}

impl CalendarOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the IANA timezone name written to the calendar.
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Sets the local time every session starts at. Seconds never reach the
    /// output; ICS timestamps are emitted to minute precision.
    #[must_use]
    pub fn with_start_time(mut self, start_time: NaiveTime) -> Self {
        self.start_time = start_time;
        self
    }

    /// Sets the site class links point at. Anything that does not parse as an
    /// absolute URL disables links for the whole calendar.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Url::parse(base_url.trim().trim_end_matches('/')).ok();
        self
    }

    /// Sets the path linked when a session has no identifiable lesson.
    #[must_use]
    pub fn with_fallback_class_path(mut self, path: impl Into<String>) -> Self {
        self.fallback_class_path = path.into();
        self
    }

    #[must_use]
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    #[must_use]
    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    #[must_use]
    pub fn fallback_class_path(&self) -> &str {
        &self.fallback_class_path
    }

    /// Absolute link for a session: the first lesson that carries an id, or
    /// the fallback path when none does. `None` without a base URL.
    fn class_link(&self, first_lesson_id: Option<&str>) -> Option<String> {
        let base = self.base_url.as_ref()?;
        match first_lesson_id {
            Some(id) => {
                let mut url = base.clone();
                url.path_segments_mut()
                    .ok()?
                    .pop_if_empty()
                    .push("lesson")
                    .push(id);
                Some(url.to_string())
            }
            None => base
                .join(&normalize_path(&self.fallback_class_path))
                .ok()
                .map(|url| url.to_string()),
        }
    }
}

/// Renders the sessions of a schedule as a complete iCalendar document.
///
/// Lines are CRLF-joined and folded at 75 characters; text values go through
/// ICS escaping and PT-BR mojibake repair. The clock stamps `DTSTAMP` only,
/// so two exports of the same plan differ in nothing but that line.
#[must_use]
pub fn build_ics(
    sessions: &[ScheduleSession],
    course_title: &str,
    options: &CalendarOptions,
    clock: &Clock,
) -> String {
    let course_title = fix_text(course_title);
    let stamp = ics_utc(clock.now());

    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//Trilha//Cronograma de Estudos//PT".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        format!(
            "X-WR-CALNAME:{}",
            escape_text(&format!("{course_title} - Cronograma"))
        ),
        format!("X-WR-TIMEZONE:{}", options.timezone()),
    ];
    lines.extend(brazil_vtimezone(options.timezone()));

    for (index, session) in sessions.iter().enumerate() {
        let number = index + 1;
        let start = session.date().and_time(options.start_time());
        let end = start
            .checked_add_signed(Duration::minutes(i64::from(session.duration_min())))
            .unwrap_or(start);
        // Midnight UTC of the session date, in epoch milliseconds. Stable
        // across exports, unique within a plan once paired with the index.
        let uid_millis = session
            .date()
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis();

        let module_title = display_module_title(session);
        let link = options.class_link(first_lesson_id(session.lessons()));

        let mut description = vec![
            format!("Curso: {course_title}"),
            format!("Módulo: {module_title}"),
            String::new(),
            "Horário padrão: 19:00 (GMT-3 - Brasil)".to_string(),
            format!("Duracao estimada: {} min", session.duration_min()),
        ];
        if !session.lessons().is_empty() {
            description.push(String::new());
            description.push("Aulas da sessao:".to_string());
            let listing = session
                .lessons()
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{}. {}", i + 1, lesson_title(item, i)))
                .collect::<Vec<_>>()
                .join("\n");
            description.push(listing);
        }
        if let Some(link) = &link {
            description.push(String::new());
            description.push(format!("Link da aula: {link}"));
        }

        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!(
            "UID:trilha-sql-session-{number}-{uid_millis}@trilha.app"
        ));
        lines.push(format!("DTSTAMP:{stamp}"));
        lines.push(format!(
            "DTSTART;TZID={}:{}",
            options.timezone(),
            ics_local(start)
        ));
        lines.push(format!(
            "DTEND;TZID={}:{}",
            options.timezone(),
            ics_local(end)
        ));
        lines.push(format!(
            "SUMMARY:{}",
            escape_text(&format!("{module_title} - Sessao {number}"))
        ));
        lines.push(format!(
            "DESCRIPTION:{}",
            escape_text(&description.join("\n"))
        ));
        if let Some(link) = &link {
            lines.push(format!("URL:{}", escape_text(link)));
        }
        lines.push("BEGIN:VALARM".to_string());
        lines.push("ACTION:DISPLAY".to_string());
        lines.push(format!("TRIGGER:-PT{ALARM_LEAD_MIN}M"));
        lines.push(format!("DESCRIPTION:Sessao de estudos em {ALARM_LEAD_MIN} min"));
        lines.push("END:VALARM".to_string());
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());

    lines
        .iter()
        .map(|line| fold_line(line))
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// `YYYYMMDDTHHMMSSZ`, the UTC form used for `DTSTAMP`.
fn ics_utc(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

/// `YYYYMMDDTHHMM00` in the calendar's local timezone.
fn ics_local(at: NaiveDateTime) -> String {
    at.format("%Y%m%dT%H%M00").to_string()
}

/// Escapes an ICS text value. The backslash pass must run first.
fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Folds a content line at 75 characters; continuation lines carry a single
/// leading space and stay within the limit themselves.
fn fold_line(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= 75 {
        return line.to_string();
    }
    let mut out = String::new();
    out.extend(&chars[..75]);
    for chunk in chars[75..].chunks(74) {
        out.push_str("\r\n ");
        out.extend(chunk);
    }
    out
}

/// `VTIMEZONE` for America/Sao_Paulo, fixed at UTC-3. Calendars in any other
/// timezone rely on the importer knowing the IANA name.
fn brazil_vtimezone(timezone: &str) -> Vec<String> {
    if timezone != BRAZIL_TIMEZONE {
        return Vec::new();
    }
    [
        "BEGIN:VTIMEZONE",
        "TZID:America/Sao_Paulo",
        "X-LIC-LOCATION:America/Sao_Paulo",
        "BEGIN:STANDARD",
        "TZOFFSETFROM:-0300",
        "TZOFFSETTO:-0300",
        "TZNAME:-03",
        "DTSTART:19700101T000000",
        "END:STANDARD",
        "END:VTIMEZONE",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn display_module_title(session: &ScheduleSession) -> String {
    let title = session.module().title().trim();
    if title.is_empty() {
        "Sessao de estudos".to_string()
    } else {
        fix_text(title)
    }
}

fn lesson_title(item: &SessionLesson, index: usize) -> String {
    let title = item.lesson().title().trim();
    if title.is_empty() {
        format!("Aula {}", index + 1)
    } else {
        fix_text(title)
    }
}

fn first_lesson_id(lessons: &[SessionLesson]) -> Option<&str> {
    lessons
        .iter()
        .find_map(|item| item.lesson().id())
        .map(|id| id.as_str())
}

fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
