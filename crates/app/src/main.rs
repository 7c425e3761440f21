use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use export::{CalendarOptions, ICS_FILE_NAME, build_ics, render_report};
use services::{ApiClient, Clock, SchedulePlanner};
use storage::JsonFileStore;
use trilha_core::locale::DAY_LABELS_PT;
use trilha_core::{Course, CourseCatalog, CourseId, Pace, ScheduleOptions, UserId};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDate { flag: &'static str, raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    InvalidId { flag: &'static str, raw: String },
    InvalidPace { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDate { flag, raw } => {
                write!(f, "invalid {flag} value: {raw} (expected YYYY-MM-DD)")
            }
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidId { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidPace { raw } => {
                write!(f, "invalid --pace value: {raw} (expected leve|moderado|intensivo)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- plan   [--course <file>] [--user <id>] [schedule options]");
    eprintln!("  cargo run -p app -- export [--course <file>] [--out <file>] [schedule options]");
    eprintln!();
    eprintln!("Schedule options:");
    eprintln!("  --course-id <id>        pick one course out of a catalog file or the API");
    eprintln!("  --start <YYYY-MM-DD>    first study day (default: next Monday)");
    eprintln!("  --end <YYYY-MM-DD>      deadline; the whole course is fitted before it");
    eprintln!("  --pace <leve|moderado|intensivo>");
    eprintln!("  --days-per-week <n>     overrides --pace (3, 4 or 5)");
    eprintln!();
    eprintln!("Calendar options (export):");
    eprintln!("  --timezone <iana>       default America/Sao_Paulo");
    eprintln!("  --start-hour <0-23>     default 19");
    eprintln!("  --start-minute <0-59>   default 0");
    eprintln!("  --base-url <url>        site the class links point at");
    eprintln!("  --out <file>            default {ICS_FILE_NAME}");
    eprintln!();
    eprintln!("Progress (plan):");
    eprintln!("  --user <id>             show per-session status for this user");
    eprintln!("  --progress-file <file>  default trilha-progress.json");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRILHA_COURSE_FILE, TRILHA_USER_ID, TRILHA_PROGRESS_FILE");
    eprintln!("  TRILHA_API_URL, TRILHA_API_TOKEN");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Plan,
    Export,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "plan" => Some(Self::Plan),
            "export" => Some(Self::Export),
            _ => None,
        }
    }
}

struct Args {
    course_file: Option<PathBuf>,
    course_id: Option<CourseId>,
    user: Option<UserId>,
    progress_file: PathBuf,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    pace: Option<Pace>,
    days_per_week: Option<u8>,
    timezone: Option<String>,
    start_hour: u32,
    start_minute: u32,
    base_url: Option<String>,
    out: PathBuf,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            course_file: std::env::var("TRILHA_COURSE_FILE").ok().map(PathBuf::from),
            course_id: None,
            user: std::env::var("TRILHA_USER_ID")
                .ok()
                .and_then(|value| UserId::new(value).ok()),
            progress_file: std::env::var("TRILHA_PROGRESS_FILE")
                .ok()
                .map_or_else(|| PathBuf::from("trilha-progress.json"), PathBuf::from),
            start: None,
            end: None,
            pace: None,
            days_per_week: None,
            timezone: None,
            start_hour: export::DEFAULT_START_HOUR,
            start_minute: export::DEFAULT_START_MINUTE,
            base_url: None,
            out: PathBuf::from(ICS_FILE_NAME),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--course" => {
                    parsed.course_file = Some(PathBuf::from(require_value(args, "--course")?));
                }
                "--course-id" => {
                    let value = require_value(args, "--course-id")?;
                    let id = CourseId::new(value.clone()).map_err(|_| ArgsError::InvalidId {
                        flag: "--course-id",
                        raw: value,
                    })?;
                    parsed.course_id = Some(id);
                }
                "--user" => {
                    let value = require_value(args, "--user")?;
                    let id = UserId::new(value.clone()).map_err(|_| ArgsError::InvalidId {
                        flag: "--user",
                        raw: value,
                    })?;
                    parsed.user = Some(id);
                }
                "--progress-file" => {
                    parsed.progress_file = PathBuf::from(require_value(args, "--progress-file")?);
                }
                "--start" => {
                    parsed.start = Some(parse_date(args, "--start")?);
                }
                "--end" => {
                    parsed.end = Some(parse_date(args, "--end")?);
                }
                "--pace" => {
                    let value = require_value(args, "--pace")?;
                    parsed.pace = Some(parse_pace(&value)?);
                }
                "--days-per-week" => {
                    let value = require_value(args, "--days-per-week")?;
                    let days: u8 = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--days-per-week",
                        raw: value,
                    })?;
                    parsed.days_per_week = Some(days);
                }
                "--timezone" => {
                    parsed.timezone = Some(require_value(args, "--timezone")?);
                }
                "--start-hour" => {
                    parsed.start_hour = parse_bounded(args, "--start-hour", 23)?;
                }
                "--start-minute" => {
                    parsed.start_minute = parse_bounded(args, "--start-minute", 59)?;
                }
                "--base-url" => {
                    parsed.base_url = Some(require_value(args, "--base-url")?);
                }
                "--out" => {
                    parsed.out = PathBuf::from(require_value(args, "--out")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn parse_date(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<NaiveDate, ArgsError> {
    let value = require_value(args, flag)?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map_err(|_| ArgsError::InvalidDate { flag, raw: value })
}

fn parse_pace(value: &str) -> Result<Pace, ArgsError> {
    value.parse().map_err(|_| ArgsError::InvalidPace {
        raw: value.to_string(),
    })
}

fn parse_bounded(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
    max: u32,
) -> Result<u32, ArgsError> {
    let value = require_value(args, flag)?;
    value
        .parse::<u32>()
        .ok()
        .filter(|parsed| *parsed <= max)
        .ok_or(ArgsError::InvalidNumber { flag, raw: value })
}

fn invalid_input(message: &str) -> Box<dyn std::error::Error> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        message.to_string(),
    ))
}

/// Reads a course from a JSON file holding either a single course or a full
/// catalog; `--course-id` narrows the catalog case.
fn load_course_file(
    path: &Path,
    course_id: Option<&CourseId>,
) -> Result<Course, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    if let Ok(course) = serde_json::from_str::<Course>(&raw) {
        return Ok(course);
    }
    let catalog: CourseCatalog = serde_json::from_str(&raw)?;
    select_course(&catalog, course_id)
}

fn select_course(
    catalog: &CourseCatalog,
    course_id: Option<&CourseId>,
) -> Result<Course, Box<dyn std::error::Error>> {
    let found = match course_id {
        Some(id) => catalog.find(id),
        None => catalog.courses().first(),
    };
    found
        .cloned()
        .ok_or_else(|| invalid_input("course not found in catalog"))
}

async fn resolve_course(
    args: &Args,
    client: &ApiClient,
) -> Result<Course, Box<dyn std::error::Error>> {
    if let Some(path) = &args.course_file {
        return load_course_file(path, args.course_id.as_ref());
    }
    if !client.enabled() {
        return Err(invalid_input(
            "no course source: pass --course <file> or set TRILHA_API_URL",
        ));
    }
    let catalog = client.fetch_catalog().await?;
    select_course(&catalog, args.course_id.as_ref())
}

fn schedule_options(args: &Args, planner: &SchedulePlanner) -> ScheduleOptions {
    let mut options = match args.start {
        Some(start) => ScheduleOptions::new(start),
        None => planner.default_options(),
    };
    if let Some(end) = args.end {
        options = options.with_end_date(end);
    }
    if let Some(pace) = args.pace {
        options = options.with_pace(pace);
    }
    if let Some(days) = args.days_per_week {
        options = options.with_days_per_week(days);
    }
    options
}

fn calendar_options(args: &Args) -> CalendarOptions {
    let mut options = CalendarOptions::new();
    if let Some(timezone) = &args.timezone {
        options = options.with_timezone(timezone.clone());
    }
    if let Some(start) = NaiveTime::from_hms_opt(args.start_hour, args.start_minute, 0) {
        options = options.with_start_time(start);
    }
    if let Some(base) = &args.base_url {
        options = options.with_base_url(base);
    }
    options
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: render the plan when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Plan,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Plan,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let clock = Clock::default_clock();
    let client = ApiClient::from_env();
    let course = resolve_course(&args, &client).await?;

    let planner = if args.user.is_some() {
        SchedulePlanner::new(clock, Arc::new(JsonFileStore::new(&args.progress_file)))
    } else {
        SchedulePlanner::in_memory(clock)
    };
    let options = schedule_options(&args, &planner);

    match cmd {
        Command::Plan => {
            let report = match &args.user {
                Some(user) => {
                    let mut plan = planner.plan_for_user(&course, &options, user).await?;
                    // The site may know about lessons finished on another
                    // device; overlay what it reports and move on if it is
                    // unreachable.
                    if client.enabled() {
                        if let Ok(remote) = client.fetch_course_progress(course.id()).await {
                            plan.apply_remote_status(&remote.lesson_status);
                        }
                    }
                    render_report(
                        plan.schedule(),
                        course.title(),
                        Some(plan.completion()),
                        &DAY_LABELS_PT,
                        &clock,
                    )
                }
                None => {
                    let schedule = planner.plan(&course, &options)?;
                    render_report(&schedule, course.title(), None, &DAY_LABELS_PT, &clock)
                }
            };
            println!("{report}");
            Ok(())
        }
        Command::Export => {
            let schedule = planner.plan(&course, &options)?;
            let calendar = calendar_options(&args);
            let ics = build_ics(schedule.sessions(), course.title(), &calendar, &clock);
            std::fs::write(&args.out, ics)?;
            eprintln!("wrote {}", args.out.display());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
