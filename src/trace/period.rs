//! Wind periods
//!
//! A wind period spans two consecutive wind samples. The leading sample is
//! taken as the wind blowing for the whole span, start inclusive and end
//! exclusive.

use crate::record::dates::seconds_between;
use crate::record::{ChemicalReading, WindSample};
use chrono::NaiveDateTime;

/// The span between two consecutive wind samples and the readings inside it
#[derive(Debug, Clone)]
pub struct WindPeriod<'a> {
    pub leading_sample: &'a WindSample,
    pub end: NaiveDateTime,
    pub duration_seconds: i64,
    pub readings: Vec<&'a ChemicalReading>,
}

impl<'a> WindPeriod<'a> {
    /// Build one period per consecutive pair of time-sorted wind samples
    ///
    /// When samples share a timestamp, the first one in input order wins.
    pub fn all_from(
        samples: &'a [WindSample],
        readings: &'a [ChemicalReading],
    ) -> Vec<WindPeriod<'a>> {
        let mut samples: Vec<&WindSample> = samples.iter().collect();
        samples.sort_by(|a, b| WindSample::cmp_by_time(a, b));
        samples.dedup_by_key(|sample| sample.timestamp);

        let mut readings: Vec<&ChemicalReading> = readings.iter().collect();
        readings.sort_by_key(|reading| reading.timestamp);

        samples
            .windows(2)
            .map(|pair| {
                let (leading, trailing) = (pair[0], pair[1]);
                let start = readings.partition_point(|r| r.timestamp < leading.timestamp);
                let end = readings.partition_point(|r| r.timestamp < trailing.timestamp);

                WindPeriod {
                    leading_sample: leading,
                    end: trailing.timestamp,
                    duration_seconds: seconds_between(&leading.timestamp, &trailing.timestamp),
                    readings: readings[start..end.max(start)].to_vec(),
                }
            })
            .collect()
    }

    pub fn start(&self) -> NaiveDateTime {
        self.leading_sample.timestamp
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        self.start() <= *timestamp && *timestamp < self.end
    }
}
