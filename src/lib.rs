//! emission-trace: Pollution Origin Tracer
//!
//! A library and CLI tool for finding which factories are likely responsible
//! for unusual chemical readings at a network of monitors.
//!
//! ## Features
//!
//! - Iterative mean/standard deviation outlier refinement per chemical
//! - Wind period construction and optional linear wind interpolation
//! - Backward projection of readings along the wind to emission origins
//! - Factory ranking by origins within an acceptable range
//! - CSV tables in, CSV tables and text/JSON reports out
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use emission_trace::geo::Position;
//! use emission_trace::record::{ChemicalReading, Factory, Monitor, WindSample};
//! use emission_trace::trace::{EmissionOriginTracer, FactoryMatcher};
//!
//! let at = |hour| {
//!     NaiveDate::from_ymd_opt(2016, 4, 1)
//!         .unwrap()
//!         .and_hms_opt(hour, 0, 0)
//!         .unwrap()
//! };
//!
//! let monitors = vec![Monitor::new(1, Position::new(10.0, 10.0))];
//! let winds = vec![WindSample::new(at(0), 270.0, 1.0), WindSample::new(at(2), 270.0, 1.0)];
//! let readings = vec![ChemicalReading::new("AGOC-3A", 1, at(1), 4.2)];
//!
//! // wind from the west: the origin lies 5 units west of the monitor
//! let tracer = EmissionOriginTracer::new(&monitors, 5).unwrap();
//! let origins = tracer.trace(&readings, &winds).unwrap();
//!
//! let factories = vec![Factory::new("Roadrunner Fitness Electronics", Position::new(5.0, 10.0))];
//! let ranked = FactoryMatcher::new(0.5).rank(&factories, &origins);
//! assert_eq!(ranked[0].emissions, 1);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod geo;
pub mod record;
pub mod refine;
pub mod table;
pub mod trace;
pub mod wind;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use record::{ChemicalReading, Factory, Monitor, WindSample};
pub use refine::{Category, StatsRefiner};
pub use trace::{EmissionOrigin, EmissionOriginTracer, FactoryMatcher};
pub use wind::WindInterpolator;
