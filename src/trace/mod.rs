//! Emission origin tracing
//!
//! Every chemical reading that falls inside a wind period is projected
//! backward along the period's wind: the air that reached the monitor
//! `lookback` seconds after leaving the origin travelled `speed * lookback`
//! in the direction the wind blows toward. Origins are then attributed to
//! the factories they fall near.
//!
//! Directions are compass bearings in degrees (0 is +y, 90 is +x).

pub mod period;
pub mod rank;

pub use period::WindPeriod;
pub use rank::{FactoryEmissions, FactoryMatcher};

use crate::error::{Error, Result};
use crate::geo::Position;
use crate::record::dates::{self, add_seconds};
use crate::record::{ChemicalReading, Factory, Monitor, WindSample};
use crate::wind::fill_gaps;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Where and when a detected chemical is estimated to have been emitted
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmissionOrigin {
    pub position: Position,
    pub timestamp: NaiveDateTime,
}

impl EmissionOrigin {
    /// Table fields: `X, Y, DateTime`
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.position.x.to_string(),
            self.position.y.to_string(),
            dates::format(&self.timestamp),
        ]
    }
}

/// Back-projects chemical readings to emission origins
#[derive(Debug, Clone)]
pub struct EmissionOriginTracer<'a> {
    monitors: HashMap<i64, &'a Monitor>,
    lookback_seconds: i64,
}

impl<'a> EmissionOriginTracer<'a> {
    /// Create a tracer; when a monitor id repeats, its first entry wins
    pub fn new(monitors: &'a [Monitor], lookback_seconds: i64) -> Result<Self> {
        if lookback_seconds < 0 {
            return Err(Error::Config(format!(
                "Lookback must not be negative, got {} secs",
                lookback_seconds
            )));
        }

        let mut by_id = HashMap::new();
        for monitor in monitors {
            by_id.entry(monitor.id).or_insert(monitor);
        }

        Ok(Self {
            monitors: by_id,
            lookback_seconds,
        })
    }

    pub fn lookback_seconds(&self) -> i64 {
        self.lookback_seconds
    }

    /// Trace every reading covered by a wind period
    ///
    /// Readings outside all periods are skipped. A period shorter than the
    /// lookback that holds any reading aborts the trace.
    pub fn trace(
        &self,
        readings: &[ChemicalReading],
        samples: &[WindSample],
    ) -> Result<Vec<EmissionOrigin>> {
        let periods = WindPeriod::all_from(samples, readings);
        debug!("Built {} wind periods", periods.len());

        let mut origins = Vec::new();
        for period in &periods {
            for reading in &period.readings {
                if period.duration_seconds < self.lookback_seconds {
                    return Err(Error::UnsupportedLookback {
                        lookback: self.lookback_seconds,
                        duration: period.duration_seconds,
                        period_start: period.start(),
                    });
                }
                origins.push(self.origin_for(reading, period.leading_sample)?);
            }
        }

        let excluded = readings.len() - origins.len();
        if excluded > 0 {
            warn!("{} readings fall outside every wind period and were not traced", excluded);
        }

        Ok(origins)
    }

    /// Project one reading backward along a wind sample
    pub fn origin_for(&self, reading: &ChemicalReading, wind: &WindSample) -> Result<EmissionOrigin> {
        let monitor = self
            .monitors
            .get(&reading.monitor_id)
            .ok_or(Error::UnresolvedMonitor(reading.monitor_id))?;

        let travelled = wind.speed * self.lookback_seconds as f64;

        Ok(EmissionOrigin {
            position: monitor.position.offset(wind.to_direction(), -travelled),
            timestamp: add_seconds(&reading.timestamp, -self.lookback_seconds),
        })
    }
}

/// Parameters of a trace run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceParams {
    pub lookback_seconds: i64,
    pub acceptable_range: f64,
    /// Fill wind gaps at chemical reading timestamps before tracing
    pub interpolate: bool,
}

/// Summary of a trace run
#[derive(Debug, Clone, Serialize)]
pub struct TraceReport {
    pub lookback_seconds: i64,
    pub acceptable_range: f64,
    pub readings: usize,
    pub traced: usize,
    pub excluded: usize,
    pub rankings: Vec<FactoryEmissions>,
}

/// Origins and report of a trace run
#[derive(Debug, Clone)]
pub struct TraceRun {
    pub origins: Vec<EmissionOrigin>,
    pub report: TraceReport,
}

/// Trace readings back to their origins and rank factories by them
pub fn run(
    readings: &[ChemicalReading],
    samples: Vec<WindSample>,
    monitors: &[Monitor],
    factories: &[Factory],
    params: &TraceParams,
) -> Result<TraceRun> {
    let samples = if params.interpolate {
        fill_gaps(samples, readings)?
    } else {
        samples
    };

    let tracer = EmissionOriginTracer::new(monitors, params.lookback_seconds)?;
    let origins = tracer.trace(readings, &samples)?;
    info!("Traced {} emission origins", origins.len());

    let rankings = FactoryMatcher::new(params.acceptable_range).rank(factories, &origins);

    Ok(TraceRun {
        report: TraceReport {
            lookback_seconds: params.lookback_seconds,
            acceptable_range: params.acceptable_range,
            readings: readings.len(),
            traced: origins.len(),
            excluded: readings.len() - origins.len(),
            rankings,
        },
        origins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 4, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn monitors() -> Vec<Monitor> {
        vec![
            Monitor::new(1, Position::new(100.0, 100.0)),
            Monitor::new(2, Position::new(0.0, 0.0)),
            Monitor::new(1, Position::new(-999.0, -999.0)),
        ]
    }

    fn reading(monitor_id: i64, hour: u32, minute: u32) -> ChemicalReading {
        ChemicalReading::new("Methylosmolene", monitor_id, at(hour, minute), 2.5)
    }

    #[test]
    fn test_origin_lies_upwind() {
        let monitors = monitors();
        let tracer = EmissionOriginTracer::new(&monitors, 60).unwrap();

        // wind from the west (270) carries air east; the origin is west
        let wind = WindSample::new(at(0, 0), 270.0, 0.5);
        let origin = tracer.origin_for(&reading(1, 0, 30), &wind).unwrap();

        assert_relative_eq!(origin.position.x, 70.0, epsilon = 1e-9);
        assert_relative_eq!(origin.position.y, 100.0, epsilon = 1e-9);
        assert_eq!(origin.timestamp, at(0, 29));
    }

    #[test]
    fn test_origin_matches_projection_formula() {
        let monitors = monitors();
        let tracer = EmissionOriginTracer::new(&monitors, 120).unwrap();
        let wind = WindSample::new(at(0, 0), 30.0, 1.5);
        let origin = tracer.origin_for(&reading(2, 0, 10), &wind).unwrap();

        let to = wind.to_direction().to_radians();
        assert_relative_eq!(origin.position.x, -1.5 * 120.0 * to.sin(), epsilon = 1e-9);
        assert_relative_eq!(origin.position.y, -1.5 * 120.0 * to.cos(), epsilon = 1e-9);
    }

    #[test]
    fn test_constant_wind_round_trip() {
        let monitors = monitors();
        let lookback = 300;
        let tracer = EmissionOriginTracer::new(&monitors, lookback).unwrap();
        let samples: Vec<WindSample> = (0..4)
            .map(|hour| WindSample::new(at(hour, 0), 135.0, 2.0))
            .collect();
        let readings = vec![reading(2, 0, 15), reading(2, 1, 45), reading(1, 2, 0)];

        let origins = tracer.trace(&readings, &samples).unwrap();
        assert_eq!(origins.len(), 3);

        for (origin, reading) in origins.iter().zip(&readings) {
            let monitor = monitors.iter().find(|m| m.id == reading.monitor_id).unwrap();
            let distance = origin.position.distance_to(&monitor.position);
            assert_relative_eq!(distance, 2.0 * lookback as f64, epsilon = 1e-9);

            // heading back from the origin toward the monitor follows the wind
            let dx = monitor.position.x - origin.position.x;
            let dy = monitor.position.y - origin.position.y;
            let bearing = dx.atan2(dy).to_degrees().rem_euclid(360.0);
            assert_relative_eq!(bearing, 315.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_unsupported_lookback() {
        let monitors = monitors();
        let tracer = EmissionOriginTracer::new(&monitors, 120).unwrap();
        let samples = vec![
            WindSample::new(at(0, 0), 0.0, 1.0),
            WindSample::new(at(0, 1), 0.0, 1.0),
        ];

        let result = tracer.trace(&[reading(1, 0, 0)], &samples);
        assert!(matches!(
            result,
            Err(Error::UnsupportedLookback { lookback: 120, duration: 60, .. })
        ));
    }

    #[test]
    fn test_lookback_equal_to_period_is_supported() {
        let monitors = monitors();
        let tracer = EmissionOriginTracer::new(&monitors, 60).unwrap();
        let samples = vec![
            WindSample::new(at(0, 0), 0.0, 1.0),
            WindSample::new(at(0, 1), 0.0, 1.0),
        ];

        let origins = tracer.trace(&[reading(2, 0, 0)], &samples).unwrap();
        assert_eq!(origins.len(), 1);
        assert_relative_eq!(origins[0].position.y, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_duplicate_wind_timestamps_trace_the_same_with_interpolation() {
        let monitors = monitors();
        let tracer = EmissionOriginTracer::new(&monitors, 10).unwrap();
        let samples = vec![
            WindSample::new(at(0, 0), 0.0, 1.0),
            WindSample::new(at(0, 0), 90.0, 1.0),
            WindSample::new(at(1, 0), 0.0, 1.0),
        ];
        let readings = vec![reading(2, 0, 0)];

        let plain = tracer.trace(&readings, &samples).unwrap();
        let filled = fill_gaps(samples, &readings).unwrap();
        let interpolated = tracer.trace(&readings, &filled).unwrap();

        assert_eq!(plain.len(), 1);
        assert_eq!(plain, interpolated);
        // the first 0:00 sample (from the north) leads the period
        assert_relative_eq!(plain[0].position.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(plain[0].position.y, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_short_period_without_readings_is_fine() {
        let monitors = monitors();
        let tracer = EmissionOriginTracer::new(&monitors, 120).unwrap();
        let samples = vec![
            WindSample::new(at(0, 0), 0.0, 1.0),
            WindSample::new(at(0, 1), 0.0, 1.0),
            WindSample::new(at(1, 0), 0.0, 1.0),
        ];

        let origins = tracer.trace(&[reading(1, 0, 30)], &samples).unwrap();
        assert_eq!(origins.len(), 1);
    }

    #[test]
    fn test_unresolved_monitor() {
        let monitors = monitors();
        let tracer = EmissionOriginTracer::new(&monitors, 60).unwrap();
        let samples = vec![
            WindSample::new(at(0, 0), 0.0, 1.0),
            WindSample::new(at(1, 0), 0.0, 1.0),
        ];

        let result = tracer.trace(&[reading(7, 0, 30)], &samples);
        assert!(matches!(result, Err(Error::UnresolvedMonitor(7))));
    }

    #[test]
    fn test_first_monitor_entry_wins() {
        let monitors = monitors();
        let tracer = EmissionOriginTracer::new(&monitors, 0).unwrap();
        let wind = WindSample::new(at(0, 0), 0.0, 1.0);

        let origin = tracer.origin_for(&reading(1, 0, 0), &wind).unwrap();
        assert_eq!(origin.position, Position::new(100.0, 100.0));
    }

    #[test]
    fn test_readings_outside_periods_are_skipped() {
        let monitors = monitors();
        let tracer = EmissionOriginTracer::new(&monitors, 60).unwrap();
        let samples = vec![
            WindSample::new(at(1, 0), 0.0, 1.0),
            WindSample::new(at(2, 0), 0.0, 1.0),
        ];
        let readings = vec![reading(1, 0, 59), reading(1, 1, 30), reading(1, 2, 0), reading(9, 5, 0)];

        let origins = tracer.trace(&readings, &samples).unwrap();
        assert_eq!(origins.len(), 1);
        assert_eq!(origins[0].timestamp, at(1, 29));
    }

    #[test]
    fn test_negative_lookback_is_rejected() {
        let monitors = monitors();
        assert!(matches!(
            EmissionOriginTracer::new(&monitors, -1),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_run_with_interpolation() {
        let monitors = monitors();
        let factories = vec![
            Factory::new("Near", Position::new(0.0, -60.0)),
            Factory::new("Far", Position::new(5000.0, 5000.0)),
        ];
        let samples = vec![
            WindSample::new(at(0, 0), 180.0, 1.0),
            WindSample::new(at(2, 0), 180.0, 1.0),
        ];
        let readings = vec![reading(2, 0, 30), reading(2, 1, 0), reading(2, 3, 0)];
        let params = TraceParams {
            lookback_seconds: 60,
            acceptable_range: 1.0,
            interpolate: true,
        };

        // interpolated samples at 0:30, 1:00 and 3:00 split the wind into
        // periods of at least 30 minutes; 3:00 closes the last period, so
        // the reading taken then is not traced
        let run = run(&readings, samples, &monitors, &factories, &params).unwrap();

        assert_eq!(run.report.readings, 3);
        assert_eq!(run.report.traced, 2);
        assert_eq!(run.report.excluded, 1);
        assert_eq!(run.report.rankings[0].factory.name, "Near");
        assert_eq!(run.report.rankings[0].emissions, 2);
        assert_eq!(run.report.rankings[1].emissions, 0);
    }

    #[test]
    fn test_origin_fields() {
        let origin = EmissionOrigin {
            position: Position::new(12.5, -3.0),
            timestamp: at(4, 5),
        };
        assert_eq!(origin.fields(), vec!["12.5", "-3", "4/1/16 4:05"]);
    }
}
