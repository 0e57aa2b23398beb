//! Factory attribution
//!
//! Counts the emission origins within range of each factory.

use crate::geo::CircularRange;
use crate::record::Factory;
use crate::trace::EmissionOrigin;
use serde::Serialize;

/// A factory and the number of emission origins attributed to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactoryEmissions {
    pub factory: Factory,
    pub emissions: usize,
}

/// Attributes emission origins to factories within `acceptable_range`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactoryMatcher {
    pub acceptable_range: f64,
}

impl FactoryMatcher {
    pub fn new(acceptable_range: f64) -> Self {
        Self { acceptable_range }
    }

    /// Count origins per factory, most emissions first
    ///
    /// Factories with equal counts keep their input order.
    pub fn rank(&self, factories: &[Factory], origins: &[EmissionOrigin]) -> Vec<FactoryEmissions> {
        let mut ranked: Vec<FactoryEmissions> = factories
            .iter()
            .map(|factory| {
                let range = CircularRange::new(factory.position, self.acceptable_range);
                FactoryEmissions {
                    factory: factory.clone(),
                    emissions: origins
                        .iter()
                        .filter(|origin| range.contains(&origin.position))
                        .count(),
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.emissions.cmp(&a.emissions));
        ranked
    }
}
