use chrono::{Datelike, NaiveDate};

use super::{ScheduleError, WeekMask};

/// How far [`next_day_in_mask`] scans before giving up and returning the
/// starting date. Two weeks always contains every weekday at least once, so
/// the fallback is unreachable for any non-empty mask.
const MASK_SCAN_DAYS: u32 = 14;

/// Returns the next date (`>= from`, or `> from` with `skip_first`) whose
/// weekday is in the mask.
///
/// With an empty mask the scan finds nothing and the original `from` comes
/// back unchanged.
///
/// # Errors
///
/// Returns [`ScheduleError::DateOverflow`] if the scan runs past the end of
/// the supported calendar range.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use trilha_core::schedule::{Pace, next_day_in_mask};
///
/// let mask = Pace::Leve.weekday_mask();
/// // 2025-01-04 is a Saturday; the next Leve day is Monday the 6th.
/// let sat = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
/// let mon = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
/// assert_eq!(next_day_in_mask(sat, mask, false).unwrap(), mon);
///
/// // A Monday stays put without `skip_first`, and moves to Wednesday with it.
/// assert_eq!(next_day_in_mask(mon, mask, false).unwrap(), mon);
/// let wed = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
/// assert_eq!(next_day_in_mask(mon, mask, true).unwrap(), wed);
/// ```
pub fn next_day_in_mask(
    from: NaiveDate,
    mask: WeekMask,
    skip_first: bool,
) -> Result<NaiveDate, ScheduleError> {
    let mut day = from;
    if skip_first {
        day = day.succ_opt().ok_or(ScheduleError::DateOverflow)?;
    }
    for _ in 0..MASK_SCAN_DAYS {
        if mask.contains(day.weekday()) {
            return Ok(day);
        }
        day = day.succ_opt().ok_or(ScheduleError::DateOverflow)?;
    }
    Ok(from)
}

/// Collects every date in `[start, end]` whose weekday is in the mask,
/// in ascending order.
///
/// The window may be empty (an `end` before `start`, or no mask day inside
/// it); callers decide what an empty window means.
///
/// # Errors
///
/// Returns [`ScheduleError::DateOverflow`] if the walk runs past the end of
/// the supported calendar range.
pub fn collect_available_days(
    start: NaiveDate,
    end: NaiveDate,
    mask: WeekMask,
) -> Result<Vec<NaiveDate>, ScheduleError> {
    let mut days = Vec::new();
    let mut day = start;

    // Align to the first mask day inside the window.
    while !mask.contains(day.weekday()) && day <= end {
        day = day.succ_opt().ok_or(ScheduleError::DateOverflow)?;
    }
    while day <= end {
        if mask.contains(day.weekday()) {
            days.push(day);
        }
        day = day.succ_opt().ok_or(ScheduleError::DateOverflow)?;
    }
    Ok(days)
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
