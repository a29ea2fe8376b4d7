//! Calendar date and wall-clock helpers for lesson scheduling.
//!
//! All dates in this system are naive local-calendar values: a lesson on
//! 2025-06-02 at 14:00 means that wall-clock date and time wherever the studio
//! is, and no time-zone conversion is ever applied. Weekdays are indexed with
//! Sunday as 0, matching the stored document shape.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::scheduling::error::SchedulingError;

/// Wall-clock start time of a lesson, minute precision.
///
/// Serialized as a zero-padded `"HH:MM"` string. Ordering is chronological,
/// which for the zero-padded rendering coincides with lexicographic order of
/// the formatted strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    /// Build a time from hour and minute components. `None` if out of range.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parse a `"HH:MM"` wall-clock string.
    pub fn parse(s: &str) -> Result<Self, SchedulingError> {
        NaiveTime::parse_from_str(s, "%H:%M").map(Self).map_err(|_| {
            SchedulingError::Validation(format!("invalid lesson time '{}', expected HH:MM", s))
        })
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_from_midnight(&self) -> u32 {
        self.0.num_seconds_from_midnight() / 60
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for SlotTime {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse a `"YYYY-MM-DD"` string as a plain calendar date.
///
/// The date is built from its numeric components in the local calendar, never
/// through a timestamp, so the resulting weekday is the same on every host
/// regardless of its time zone.
pub fn parse_local_date(s: &str) -> Result<NaiveDate, SchedulingError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        SchedulingError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", s))
    })
}

/// Weekday index of a date, Sunday = 0 through Saturday = 6.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Most recent Sunday on or before the given date.
///
/// Dates are day-granular, so the returned value already sits at the start of
/// its day; there is no time component to truncate.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = u64::from(weekday_index(date));
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_slot_time_parse() {
        let t = SlotTime::parse("14:00").unwrap();
        assert_eq!(t.hour(), 14);
        assert_eq!(t.minute(), 0);
    }

    #[test]
    fn test_slot_time_parse_rejects_garbage() {
        assert!(SlotTime::parse("25:00").is_err());
        assert!(SlotTime::parse("14h30").is_err());
        assert!(SlotTime::parse("").is_err());
    }

    #[test]
    fn test_slot_time_display_zero_padded() {
        let t = SlotTime::new(9, 5).unwrap();
        assert_eq!(t.to_string(), "09:05");
    }

    #[test]
    fn test_slot_time_ordering() {
        let morning = SlotTime::parse("09:30").unwrap();
        let afternoon = SlotTime::parse("14:00").unwrap();
        assert!(morning < afternoon);
    }

    #[test]
    fn test_slot_time_minutes_from_midnight() {
        let t = SlotTime::parse("10:45").unwrap();
        assert_eq!(t.minutes_from_midnight(), 645);
    }

    #[test]
    fn test_parse_local_date() {
        assert_eq!(parse_local_date("2025-06-02").unwrap(), date(2025, 6, 2));
    }

    #[test]
    fn test_parse_local_date_rejects_garbage() {
        assert!(parse_local_date("2025-13-01").is_err());
        assert!(parse_local_date("June 2, 2025").is_err());
        assert!(parse_local_date("").is_err());
    }

    #[test]
    fn test_parse_local_date_weekday_is_timezone_independent() {
        // 2025-01-01 is a Wednesday in the plain calendar; a timestamp-based
        // parse could shift it to Tuesday on hosts west of UTC.
        let d = parse_local_date("2025-01-01").unwrap();
        assert_eq!(weekday_index(d), 3);
    }

    #[test]
    fn test_weekday_index_sunday_is_zero() {
        // 2025-06-01 is a Sunday, 2025-06-02 a Monday.
        assert_eq!(weekday_index(date(2025, 6, 1)), 0);
        assert_eq!(weekday_index(date(2025, 6, 2)), 1);
        assert_eq!(weekday_index(date(2025, 6, 7)), 6);
    }

    #[test]
    fn test_start_of_week_identity_on_sunday() {
        let sunday = date(2025, 6, 1);
        assert_eq!(start_of_week(sunday), sunday);
    }

    #[test]
    fn test_start_of_week_midweek() {
        // Wednesday 2025-06-04 belongs to the week starting Sunday 2025-06-01.
        assert_eq!(start_of_week(date(2025, 6, 4)), date(2025, 6, 1));
    }

    #[test]
    fn test_start_of_week_crosses_month_boundary() {
        // Tuesday 2025-07-01 belongs to the week starting Sunday 2025-06-29.
        assert_eq!(start_of_week(date(2025, 7, 1)), date(2025, 6, 29));
    }
}
