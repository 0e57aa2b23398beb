//! Colliding readings
//!
//! Two readings collide when they report the same chemical, at the same
//! monitor, at the same time.

use crate::record::ChemicalReading;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// What to do with colliding readings before refinement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Drop every reading of a colliding group
    DropAll,
    /// Keep all readings unchanged
    Keep,
}

impl Default for CollisionPolicy {
    fn default() -> Self {
        Self::DropAll
    }
}

impl std::fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DropAll => write!(f, "drop_all"),
            Self::Keep => write!(f, "keep"),
        }
    }
}

impl std::str::FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop_all" | "drop-all" | "dropall" => Ok(Self::DropAll),
            "keep" | "keep_all" | "keep-all" | "none" => Ok(Self::Keep),
            _ => Err(format!("Unknown collision policy: {}", s)),
        }
    }
}

/// Apply a collision policy, preserving the order of surviving readings
pub fn resolve_collisions(
    readings: Vec<ChemicalReading>,
    policy: CollisionPolicy,
) -> Vec<ChemicalReading> {
    if policy == CollisionPolicy::Keep {
        return readings;
    }

    let unique: Vec<bool> = {
        let mut group_sizes: HashMap<_, usize> = HashMap::new();
        for reading in &readings {
            *group_sizes.entry(reading.collision_key()).or_default() += 1;
        }
        readings
            .iter()
            .map(|reading| group_sizes[&reading.collision_key()] <= 1)
            .collect()
    };

    let total = readings.len();
    let kept: Vec<ChemicalReading> = readings
        .into_iter()
        .zip(unique)
        .filter_map(|(reading, unique)| unique.then_some(reading))
        .collect();

    if kept.len() < total {
        info!("Dropped {} colliding readings", total - kept.len());
    }

    kept
}
