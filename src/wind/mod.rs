//! Wind interpolation
//!
//! Turns discrete wind samples into a continuous estimate of direction and
//! speed over time. Between two known samples both channels are linearly
//! interpolated on their own; outside the known range the nearest sample
//! holds.

use crate::error::{Error, Result};
use crate::record::dates::seconds_between;
use crate::record::{ChemicalReading, WindSample};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use tracing::info;

/// Wind direction (compass degrees, blowing from) and speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindVector {
    pub direction: f64,
    pub speed: f64,
}

impl WindVector {
    fn lerp(&self, other: &WindVector, fraction: f64) -> WindVector {
        WindVector {
            direction: self.direction + (other.direction - self.direction) * fraction,
            speed: self.speed + (other.speed - self.speed) * fraction,
        }
    }
}

/// Piecewise linear wind estimate
#[derive(Debug, Clone)]
pub struct WindInterpolator {
    base_time: NaiveDateTime,
    /// `(seconds since base_time, wind)`, ascending, one per timestamp
    knots: Vec<(f64, WindVector)>,
}

impl WindInterpolator {
    /// Build from samples, measuring time from the earliest sample
    pub fn build(samples: &[WindSample]) -> Result<Self> {
        let base_time = samples
            .iter()
            .map(|sample| sample.timestamp)
            .min()
            .ok_or_else(|| Error::InsufficientData("no wind samples to interpolate".to_string()))?;

        Self::build_from(samples, base_time)
    }

    /// Build from samples, measuring time from `base_time`
    pub fn build_from(samples: &[WindSample], base_time: NaiveDateTime) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::InsufficientData(
                "no wind samples to interpolate".to_string(),
            ));
        }

        let mut ordered: Vec<&WindSample> = samples.iter().collect();
        ordered.sort_by(|a, b| WindSample::cmp_by_time(a, b));
        ordered.dedup_by_key(|sample| sample.timestamp);

        let knots = ordered
            .into_iter()
            .map(|sample| {
                (
                    seconds_between(&base_time, &sample.timestamp) as f64,
                    WindVector {
                        direction: sample.from_direction,
                        speed: sample.speed,
                    },
                )
            })
            .collect();

        Ok(Self { base_time, knots })
    }

    pub fn base_time(&self) -> NaiveDateTime {
        self.base_time
    }

    /// Estimate the wind at `timestamp`
    pub fn at(&self, timestamp: &NaiveDateTime) -> WindVector {
        let offset = seconds_between(&self.base_time, timestamp) as f64;

        // knots is never empty
        let (first_offset, first) = self.knots[0];
        let (last_offset, last) = self.knots[self.knots.len() - 1];

        if offset <= first_offset {
            return first;
        }
        if offset >= last_offset {
            return last;
        }

        let upper = self.knots.partition_point(|(knot_offset, _)| *knot_offset <= offset);
        let (before_offset, before) = self.knots[upper - 1];
        let (after_offset, after) = self.knots[upper];

        before.lerp(&after, (offset - before_offset) / (after_offset - before_offset))
    }
}

/// Add interpolated wind samples at every chemical reading timestamp
///
/// Original samples win over synthetic ones at the same timestamp. The
/// result is sorted by timestamp.
pub fn fill_gaps(
    samples: Vec<WindSample>,
    readings: &[ChemicalReading],
) -> Result<Vec<WindSample>> {
    let base_time = samples
        .iter()
        .map(|sample| sample.timestamp)
        .chain(readings.iter().map(|reading| reading.timestamp))
        .min()
        .ok_or_else(|| Error::InsufficientData("no wind samples to interpolate".to_string()))?;

    let interpolator = WindInterpolator::build_from(&samples, base_time)?;
    let original_count = samples.len();

    let synthetic = readings.iter().map(|reading| {
        let wind = interpolator.at(&reading.timestamp);
        WindSample::new(reading.timestamp, wind.direction, wind.speed)
    });

    let mut seen = HashSet::new();
    let mut merged: Vec<WindSample> = samples
        .into_iter()
        .chain(synthetic)
        .filter(|sample| seen.insert(sample.timestamp))
        .collect();
    merged.sort_by(WindSample::cmp_by_time);

    info!(
        "Interpolated {} wind samples at chemical reading times",
        merged.len().saturating_sub(original_count)
    );

    Ok(merged)
}
