#![forbid(unsafe_code)]

pub mod ics;
pub mod report;

pub use ics::{
    ALARM_LEAD_MIN, BRAZIL_TIMEZONE, CalendarOptions, DEFAULT_START_HOUR, DEFAULT_START_MINUTE,
    ICS_FILE_NAME, ICS_MEDIA_TYPE, build_ics,
};
pub use report::render_report;
