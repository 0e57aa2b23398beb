//! Date-time fields
//!
//! Sensor tables write timestamps as `M/D/YY H:MM`. Two-digit years above
//! the pivot year belong to the previous century, so with a pivot of 24
//! `"3/1/99 0:00"` is 1999 and `"3/1/17 0:00"` is 2017.

use crate::constants::dates::DEFAULT_BASE_YEAR;
use crate::error::{Error, Result};
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, Timelike};

/// Parses `M/D/YY H:MM` timestamps with a century-rollover rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParser {
    base_year: i32,
    pivot_year: i32,
}

impl DateParser {
    /// Create a parser for a given century base and two-digit pivot
    pub fn new(base_year: i32, pivot_year: u32) -> Self {
        Self {
            base_year,
            pivot_year: pivot_year as i32,
        }
    }

    /// Create a parser whose pivot is the current two-digit year
    pub fn with_current_pivot(base_year: i32) -> Self {
        Self::new(base_year, Local::now().year().rem_euclid(100) as u32)
    }

    pub fn base_year(&self) -> i32 {
        self.base_year
    }

    pub fn pivot_year(&self) -> u32 {
        self.pivot_year as u32
    }

    /// Parse a raw `M/D/YY H:MM` field
    pub fn parse(&self, raw: &str) -> Result<NaiveDateTime> {
        let malformed = || Error::MalformedRecord(format!("date_time {:?} is not M/D/YY H:MM", raw));

        let mut parts = raw.split_whitespace();
        let (date_str, time_str) = match (parts.next(), parts.next(), parts.next()) {
            (Some(date), Some(time), None) => (date, time),
            _ => return Err(malformed()),
        };

        let date_parts = split_numbers(date_str, '/').ok_or_else(malformed)?;
        let time_parts = split_numbers(time_str, ':').ok_or_else(malformed)?;

        let (month, day, relative_year) = match date_parts.as_slice() {
            [month, day, year] if *year < 100 => (*month, *day, *year as i32),
            _ => return Err(malformed()),
        };
        let (hour, minute) = match time_parts.as_slice() {
            [hour, minute] => (*hour, *minute),
            _ => return Err(malformed()),
        };

        let century = if relative_year > self.pivot_year {
            self.base_year - 100
        } else {
            self.base_year
        };

        NaiveDate::from_ymd_opt(century + relative_year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .ok_or_else(malformed)
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::with_current_pivot(DEFAULT_BASE_YEAR)
    }
}

fn split_numbers(raw: &str, separator: char) -> Option<Vec<u32>> {
    raw.split(separator)
        .map(|part| part.parse::<u32>().ok())
        .collect()
}

/// Format a timestamp back into `M/D/YY H:MM`
pub fn format(date_time: &NaiveDateTime) -> String {
    format!(
        "{}/{}/{:02} {}:{:02}",
        date_time.month(),
        date_time.day(),
        date_time.year().rem_euclid(100),
        date_time.hour(),
        date_time.minute()
    )
}

/// Whole seconds from `from` to `to` (negative when `to` is earlier)
pub fn seconds_between(from: &NaiveDateTime, to: &NaiveDateTime) -> i64 {
    (*to - *from).num_seconds()
}

/// Shift a timestamp by a signed number of seconds
pub fn add_seconds(date_time: &NaiveDateTime, seconds: i64) -> NaiveDateTime {
    *date_time + Duration::seconds(seconds)
}
