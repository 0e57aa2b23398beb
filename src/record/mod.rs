//! Input records
//!
//! Immutable value records built once per table row. Typed fields are parsed
//! at construction; the raw text fields are kept so outputs can reproduce
//! the input rows unchanged.

pub mod dates;
pub mod grouping;

use crate::constants::dates::{MONTH_NAMES, WEEKDAY_NAMES};
use crate::error::{Error, Result};
use crate::geo::Position;
use chrono::{Datelike, NaiveDateTime};
use dates::DateParser;
use serde::Serialize;
use std::cmp::Ordering;

/// A record that can be read from and written back to a table row
pub trait Record: Sized {
    /// Human-readable record kind, used in log and error messages
    const KIND: &'static str;

    /// Number of leading columns the record is built from
    const COLUMNS: usize;

    /// Build the record from raw row fields
    fn from_fields(fields: &[&str], dates: &DateParser) -> Result<Self>;

    /// Whether a row is a header: none of its typed columns parse
    fn is_header(fields: &[&str], dates: &DateParser) -> bool;

    /// Raw row fields, as read
    fn fields(&self) -> &[String];
}

/// A single chemical concentration measured by a monitor
#[derive(Debug, Clone, PartialEq)]
pub struct ChemicalReading {
    pub chemical: String,
    pub monitor_id: i64,
    pub timestamp: NaiveDateTime,
    pub value: f64,
    raw: Vec<String>,
}

impl ChemicalReading {
    /// Create a reading from typed values
    pub fn new(chemical: &str, monitor_id: i64, timestamp: NaiveDateTime, value: f64) -> Self {
        Self {
            chemical: chemical.to_string(),
            monitor_id,
            timestamp,
            value,
            raw: vec![
                chemical.to_string(),
                monitor_id.to_string(),
                dates::format(&timestamp),
                value.to_string(),
            ],
        }
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    /// Abbreviated month name (`Jan`..`Dec`)
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.timestamp.month0() as usize]
    }

    /// Abbreviated weekday name (`Sun`..`Sat`)
    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[self.timestamp.weekday().num_days_from_sunday() as usize]
    }

    /// Readings order by monitor, then time
    pub fn cmp_by_monitor_time(a: &Self, b: &Self) -> Ordering {
        (a.monitor_id, a.timestamp).cmp(&(b.monitor_id, b.timestamp))
    }

    /// Readings sharing this key collide
    pub fn collision_key(&self) -> (NaiveDateTime, &str, i64) {
        (self.timestamp, self.chemical.as_str(), self.monitor_id)
    }
}

impl Record for ChemicalReading {
    const KIND: &'static str = "chemical reading";
    const COLUMNS: usize = 4;

    fn from_fields(fields: &[&str], dates: &DateParser) -> Result<Self> {
        let [chemical, monitor_id, date_time, value] = leading_fields::<4>(Self::KIND, fields)?;

        let chemical = chemical.trim();
        if chemical.is_empty() {
            return Err(Error::MalformedRecord("chemical name is empty".to_string()));
        }

        Ok(Self {
            chemical: chemical.to_string(),
            monitor_id: parse_integer("monitor_id", monitor_id)?,
            timestamp: dates.parse(date_time)?,
            value: parse_float("value", value)?,
            raw: to_owned(fields),
        })
    }

    fn is_header(fields: &[&str], dates: &DateParser) -> bool {
        parse_integer("monitor_id", field(fields, 1)).is_err()
            && dates.parse(field(fields, 2)).is_err()
            && parse_float("value", field(fields, 3)).is_err()
    }

    fn fields(&self) -> &[String] {
        &self.raw
    }
}

/// A wind observation; `from_direction` is a compass bearing in degrees
#[derive(Debug, Clone, PartialEq)]
pub struct WindSample {
    pub timestamp: NaiveDateTime,
    pub from_direction: f64,
    pub speed: f64,
    raw: Vec<String>,
}

impl WindSample {
    pub fn new(timestamp: NaiveDateTime, from_direction: f64, speed: f64) -> Self {
        Self {
            timestamp,
            from_direction,
            speed,
            raw: vec![
                dates::format(&timestamp),
                from_direction.to_string(),
                speed.to_string(),
            ],
        }
    }

    /// Bearing the air is moving toward, in `[0, 360)`
    pub fn to_direction(&self) -> f64 {
        (self.from_direction + 180.0).rem_euclid(360.0)
    }

    pub fn cmp_by_time(a: &Self, b: &Self) -> Ordering {
        a.timestamp.cmp(&b.timestamp)
    }
}

impl Record for WindSample {
    const KIND: &'static str = "wind sample";
    const COLUMNS: usize = 3;

    fn from_fields(fields: &[&str], dates: &DateParser) -> Result<Self> {
        let [date_time, from_direction, speed] = leading_fields::<3>(Self::KIND, fields)?;

        Ok(Self {
            timestamp: dates.parse(date_time)?,
            from_direction: parse_float("from_direction", from_direction)?,
            speed: parse_float("speed", speed)?,
            raw: to_owned(fields),
        })
    }

    fn is_header(fields: &[&str], dates: &DateParser) -> bool {
        dates.parse(field(fields, 0)).is_err()
            && parse_float("from_direction", field(fields, 1)).is_err()
            && parse_float("speed", field(fields, 2)).is_err()
    }

    fn fields(&self) -> &[String] {
        &self.raw
    }
}

/// A known emission source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Factory {
    pub name: String,
    pub position: Position,
    #[serde(skip)]
    raw: Vec<String>,
}

impl Factory {
    pub fn new(name: &str, position: Position) -> Self {
        Self {
            name: name.to_string(),
            position,
            raw: vec![name.to_string(), position.x.to_string(), position.y.to_string()],
        }
    }
}

impl Record for Factory {
    const KIND: &'static str = "factory";
    const COLUMNS: usize = 3;

    fn from_fields(fields: &[&str], _dates: &DateParser) -> Result<Self> {
        let [name, x, y] = leading_fields::<3>(Self::KIND, fields)?;

        Ok(Self {
            name: name.trim().to_string(),
            position: Position::parse(x, y)?,
            raw: to_owned(fields),
        })
    }

    fn is_header(fields: &[&str], _dates: &DateParser) -> bool {
        parse_float("x", field(fields, 1)).is_err() && parse_float("y", field(fields, 2)).is_err()
    }

    fn fields(&self) -> &[String] {
        &self.raw
    }
}

/// A chemical monitor station
#[derive(Debug, Clone, PartialEq)]
pub struct Monitor {
    pub id: i64,
    pub position: Position,
    raw: Vec<String>,
}

impl Monitor {
    pub fn new(id: i64, position: Position) -> Self {
        Self {
            id,
            position,
            raw: vec![id.to_string(), position.x.to_string(), position.y.to_string()],
        }
    }
}

impl Record for Monitor {
    const KIND: &'static str = "monitor";
    const COLUMNS: usize = 3;

    fn from_fields(fields: &[&str], _dates: &DateParser) -> Result<Self> {
        let [id, x, y] = leading_fields::<3>(Self::KIND, fields)?;

        Ok(Self {
            id: parse_integer("id", id)?,
            position: Position::parse(x, y)?,
            raw: to_owned(fields),
        })
    }

    fn is_header(fields: &[&str], _dates: &DateParser) -> bool {
        parse_integer("id", field(fields, 0)).is_err()
            && parse_float("x", field(fields, 1)).is_err()
            && parse_float("y", field(fields, 2)).is_err()
    }

    fn fields(&self) -> &[String] {
        &self.raw
    }
}

fn leading_fields<'a, const N: usize>(kind: &str, fields: &[&'a str]) -> Result<[&'a str; N]> {
    fields
        .get(..N)
        .and_then(|leading| <[&str; N]>::try_from(leading).ok())
        .ok_or_else(|| {
            Error::MalformedRecord(format!(
                "{} needs {} fields, found {}",
                kind,
                N,
                fields.len()
            ))
        })
}

fn field<'a>(fields: &[&'a str], index: usize) -> &'a str {
    fields.get(index).copied().unwrap_or_default()
}

fn to_owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|field| field.to_string()).collect()
}

fn parse_integer(name: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::MalformedRecord(format!("{} {:?} is not an integer", name, raw)))
}

fn parse_float(name: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::MalformedRecord(format!("{} {:?} is not a number", name, raw)))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::MalformedRecord(format!("{} {:?} is not finite", name, raw)))
    }
}
