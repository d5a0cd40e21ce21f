//! Date helpers for call scheduling.
//!
//! "Today" is always the UTC calendar day of the supplied instant, so that a
//! scheduled day never depends on the machine's timezone.

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::error::{CrmError, Result};

/// Calendar day of `now`
#[must_use]
pub fn today(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// The day `days` after the day of `now`.
///
/// # Arguments
///
/// * `now` - Current instant
/// * `days` - Offset in whole days
///
/// # Returns
///
/// The shifted calendar day, or an error if it falls outside chrono's range.
pub fn days_from_today(now: DateTime<Utc>, days: u64) -> Result<NaiveDate> {
    today(now)
        .checked_add_days(Days::new(days))
        .ok_or_else(|| CrmError::InvalidDate(format!("{days} days from {} is out of range", today(now))))
}

/// Parse a `YYYY-MM-DD` day.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| CrmError::InvalidDate(format!("{input}: {e}, use YYYY-MM-DD")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_days_from_today_crosses_month() {
        let now = Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 0).unwrap();
        let day = days_from_today(now, 1).unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day(" 2026-10-20 ").unwrap(), NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        assert!(parse_day("20/10/2026").is_err());
    }
}
