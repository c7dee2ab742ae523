//! Time helpers — business timezone conversion
//!
//! Date→timestamp conversion happens at the API handler layer; the
//! repository layer only ever sees `i64` unix millis.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Local midnight of `date` → unix millis in the business timezone
///
/// DST gap fallback: if local midnight does not exist, fall back to UTC.
fn midnight_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Start of day (00:00:00) → unix millis in the business timezone
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    midnight_millis(date, tz)
}

/// End of day → next day 00:00:00 unix millis, for `< end` semantics
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    midnight_millis(next_day, tz)
}
