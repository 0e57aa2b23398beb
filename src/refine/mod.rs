//! Iterative statistical refinement
//!
//! Splits a measured series into normal and atypical values, then keeps
//! re-testing the normal part until no new outliers show up or the run
//! budget is spent. Running the same refinement over the atypical output
//! separates the very atypical values from the merely atypical ones.

pub mod collisions;
pub mod stats;

pub use collisions::{resolve_collisions, CollisionPolicy};
pub use stats::{Measured, Stats};

use crate::config::defaults::{DEFAULT_RUNS, DEFAULT_STDDEVS};
use crate::record::ChemicalReading;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Output category of a classified value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Normal,
    Atypical,
    VeryAtypical,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Normal, Category::Atypical, Category::VeryAtypical];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Atypical => write!(f, "atypical"),
            Self::VeryAtypical => write!(f, "very_atypical"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "atypical" => Ok(Self::Atypical),
            "very_atypical" | "very-atypical" | "veryatypical" => Ok(Self::VeryAtypical),
            _ => Err(format!("Unknown reading category: {}", s)),
        }
    }
}

/// A disjoint split of a series into normal and atypical values
#[derive(Debug, Clone, PartialEq)]
pub struct RefinedPartition<T> {
    pub normal: Vec<T>,
    pub atypical: Vec<T>,
}

/// Three-way split produced by refining twice
#[derive(Debug, Clone, PartialEq)]
pub struct Classification<T> {
    pub normal: Vec<T>,
    pub atypical: Vec<T>,
    pub very_atypical: Vec<T>,
}

impl<T> Classification<T> {
    pub fn get(&self, category: Category) -> &[T] {
        match category {
            Category::Normal => &self.normal,
            Category::Atypical => &self.atypical,
            Category::VeryAtypical => &self.very_atypical,
        }
    }
}

/// Partition in progress, with the number of passes already spent on it
struct RefinementState<T> {
    partition: RefinedPartition<T>,
    runs: usize,
}

/// Mean/stddev based outlier refinement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsRefiner {
    /// Values further than this many standard deviations are atypical
    pub k_stddevs: f64,
    /// Maximum number of passes per refinement
    pub max_runs: usize,
}

impl Default for StatsRefiner {
    fn default() -> Self {
        Self::new(DEFAULT_STDDEVS, DEFAULT_RUNS)
    }
}

impl StatsRefiner {
    pub fn new(k_stddevs: f64, max_runs: usize) -> Self {
        Self { k_stddevs, max_runs }
    }

    /// One pass: classify every value against the series' own stats
    pub fn partition<T: Measured>(&self, items: Vec<T>) -> RefinedPartition<T> {
        let stats = Stats::of(&items);
        let (normal, atypical): (Vec<T>, Vec<T>) = items
            .into_iter()
            .partition(|item| stats.is_normal(item.measure(), self.k_stddevs));

        RefinedPartition { normal, atypical }
    }

    /// Refine until the atypical count stops growing or `max_runs` passes ran
    pub fn refine<T: Measured>(&self, items: Vec<T>) -> RefinedPartition<T> {
        let mut state = RefinementState {
            partition: self.partition(items),
            runs: 1,
        };

        if state.partition.atypical.is_empty() {
            return state.partition;
        }

        while state.runs < self.max_runs {
            let previous_count = state.partition.atypical.len();
            state = self.advance(state);

            if state.partition.atypical.len() == previous_count {
                debug!("Refinement reached a fixpoint after {} runs", state.runs);
                break;
            }
        }

        state.partition
    }

    /// Refine, then refine the atypical output again to isolate very atypical values
    pub fn classify<T: Measured>(&self, items: Vec<T>) -> Classification<T> {
        let first = self.refine(items);
        let second = self.refine(first.atypical);

        Classification {
            normal: first.normal,
            atypical: second.normal,
            very_atypical: second.atypical,
        }
    }

    fn advance<T: Measured>(&self, state: RefinementState<T>) -> RefinementState<T> {
        let RefinedPartition { normal, mut atypical } = state.partition;
        let next = self.partition(normal);
        atypical.extend(next.atypical);

        RefinementState {
            partition: RefinedPartition {
                normal: next.normal,
                atypical,
            },
            runs: state.runs + 1,
        }
    }
}

/// Group readings by chemical name
pub fn group_by_chemical(readings: Vec<ChemicalReading>) -> BTreeMap<String, Vec<ChemicalReading>> {
    let mut grouped: BTreeMap<String, Vec<ChemicalReading>> = BTreeMap::new();
    for reading in readings {
        grouped.entry(reading.chemical.clone()).or_default().push(reading);
    }
    grouped
}

/// Resolve collisions, then classify each chemical's readings independently
///
/// Every category is sorted by `(monitor_id, timestamp)`.
pub fn classify_by_chemical(
    readings: Vec<ChemicalReading>,
    policy: CollisionPolicy,
    refiner: &StatsRefiner,
) -> BTreeMap<String, Classification<ChemicalReading>> {
    let readings = resolve_collisions(readings, policy);

    group_by_chemical(readings)
        .into_iter()
        .map(|(chemical, readings)| {
            let mut classification = refiner.classify(readings);
            classification.normal.sort_by(ChemicalReading::cmp_by_monitor_time);
            classification.atypical.sort_by(ChemicalReading::cmp_by_monitor_time);
            classification.very_atypical.sort_by(ChemicalReading::cmp_by_monitor_time);

            info!(
                "{}: {} normal, {} atypical, {} very atypical",
                chemical,
                classification.normal.len(),
                classification.atypical.len(),
                classification.very_atypical.len()
            );

            (chemical, classification)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn sorted(mut values: Vec<f64>) -> Vec<f64> {
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        values
    }

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 4, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_constant_series_is_all_normal() {
        let refiner = StatsRefiner::new(0.5, 5);
        let partition = refiner.refine(vec![10.0; 5]);
        assert_eq!(partition.normal.len(), 5);
        assert!(partition.atypical.is_empty());
    }

    #[test]
    fn test_single_outlier() {
        let refiner = StatsRefiner::new(1.0, 2);
        let partition = refiner.refine(vec![1.0, 1.0, 1.0, 1.0, 100.0]);
        assert_eq!(partition.normal, vec![1.0; 4]);
        assert_eq!(partition.atypical, vec![100.0]);
    }

    #[test]
    fn test_empty_series() {
        let partition = StatsRefiner::default().refine(Vec::<f64>::new());
        assert!(partition.normal.is_empty());
        assert!(partition.atypical.is_empty());
    }

    #[test]
    fn test_later_runs_find_more_outliers() {
        let series = vec![10.0, 10.0, 11.0, 11.0, 30.0, 1000.0];

        let one_pass = StatsRefiner::new(1.0, 1).refine(series.clone());
        assert_eq!(one_pass.atypical, vec![1000.0]);

        let two_passes = StatsRefiner::new(1.0, 2).refine(series);
        assert_eq!(sorted(two_passes.atypical), vec![30.0, 1000.0]);
        assert_eq!(sorted(two_passes.normal), vec![10.0, 10.0, 11.0, 11.0]);
    }

    #[test]
    fn test_partition_covers_input_disjointly() {
        let series: Vec<f64> = (0..50)
            .map(|i| {
                let spike = if i % 11 == 0 { 80.0 } else { 0.0 };
                ((i * 37) % 23) as f64 + spike
            })
            .collect();
        let refiner = StatsRefiner::new(1.5, 4);
        let partition = refiner.refine(series.clone());

        assert_eq!(partition.normal.len() + partition.atypical.len(), series.len());
        let mut union = partition.normal.clone();
        union.extend(partition.atypical.iter().copied());
        assert_eq!(sorted(union), sorted(series));
    }

    #[test]
    fn test_refining_normal_output_is_stable() {
        let series = vec![3.0, 4.0, 5.0, 4.0, 3.0, 4.0, 50.0, -40.0];
        let refiner = StatsRefiner::new(2.0, 10);
        let partition = refiner.refine(series);

        let again = refiner.refine(partition.normal.clone());
        assert!(again.atypical.is_empty());
        assert_eq!(sorted(again.normal), sorted(partition.normal));
    }

    #[test]
    fn test_classify_three_ways() {
        let series = vec![10.0, 10.0, 11.0, 11.0, 30.0, 1000.0];
        let classification = StatsRefiner::new(1.0, 1).classify(series);

        // first pass isolates 1000; refining [1000] alone leaves it normal
        assert_eq!(sorted(classification.normal), vec![10.0, 10.0, 11.0, 11.0, 30.0]);
        assert_eq!(classification.atypical, vec![1000.0]);
        assert!(classification.very_atypical.is_empty());
    }

    #[test]
    fn test_classify_finds_very_atypical() {
        let mut series = vec![5.0; 20];
        series.extend([20.0, 20.0, 20.0, 500.0]);
        let classification = StatsRefiner::new(1.0, 3).classify(series);

        assert_eq!(classification.normal, vec![5.0; 20]);
        assert_eq!(classification.atypical, vec![20.0; 3]);
        assert_eq!(classification.very_atypical, vec![500.0]);
        assert_eq!(classification.get(Category::VeryAtypical), &[500.0]);
    }

    #[test]
    fn test_classify_by_chemical() {
        let mut readings: Vec<ChemicalReading> = (0..6)
            .map(|hour| ChemicalReading::new("AGOC-3A", 2, at(hour), 1.0))
            .collect();
        readings.push(ChemicalReading::new("AGOC-3A", 1, at(7), 90.0));
        readings.push(ChemicalReading::new("Methylosmolene", 1, at(0), 4.0));
        readings.push(ChemicalReading::new("Methylosmolene", 1, at(0), 5.0));

        let classified =
            classify_by_chemical(readings, CollisionPolicy::DropAll, &StatsRefiner::new(1.0, 2));

        // colliding Methylosmolene readings are gone entirely
        assert_eq!(classified.len(), 1);

        let agoc = &classified["AGOC-3A"];
        assert_eq!(agoc.normal.len(), 6);
        assert_eq!(agoc.atypical.len(), 1);
        assert_eq!(agoc.atypical[0].value, 90.0);
        assert!(agoc
            .normal
            .windows(2)
            .all(|pair| ChemicalReading::cmp_by_monitor_time(&pair[0], &pair[1]).is_le()));
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Category::VeryAtypical.to_string(), "very_atypical");
        assert_eq!("very-atypical".parse::<Category>(), Ok(Category::VeryAtypical));
        assert!("weird".parse::<Category>().is_err());
    }
}
