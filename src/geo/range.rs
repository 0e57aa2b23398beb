//! Circular ranges around a position

use crate::geo::Position;
use serde::{Deserialize, Serialize};

/// All positions within `radius` of `center`, boundary included
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularRange {
    pub center: Position,
    pub radius: f64,
}

impl CircularRange {
    pub fn new(center: Position, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Check if a position lies within the range
    pub fn contains(&self, position: &Position) -> bool {
        position.distance_to(&self.center) <= self.radius
    }
}
