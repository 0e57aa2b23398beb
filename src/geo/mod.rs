//! Planar geometry
//!
//! Positions on the flat site grid shared by monitors, factories and the
//! reconstructed emission origins.

pub mod range;

pub use range::CircularRange;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A point on the site grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parse a position from raw `x` and `y` fields
    pub fn parse(raw_x: &str, raw_y: &str) -> Result<Self> {
        Ok(Self::new(parse_coordinate("x", raw_x)?, parse_coordinate("y", raw_y)?))
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Move along a compass bearing (degrees clockwise from +y) by `distance`
    pub fn offset(&self, bearing_degrees: f64, distance: f64) -> Position {
        let bearing = bearing_degrees.to_radians();
        Position::new(
            self.x + distance * bearing.sin(),
            self.y + distance * bearing.cos(),
        )
    }
}

fn parse_coordinate(name: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        Error::MalformedRecord(format!("{} coordinate {:?} is not a number", name, raw))
    })?;

    if !value.is_finite() {
        return Err(Error::MalformedRecord(format!(
            "{} coordinate {:?} is not finite",
            name, raw
        )));
    }

    Ok(value)
}
