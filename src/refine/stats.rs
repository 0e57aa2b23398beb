//! Summary statistics over measured series

use crate::record::ChemicalReading;

/// Anything carrying a single numeric measurement
pub trait Measured {
    fn measure(&self) -> f64;
}

impl Measured for f64 {
    fn measure(&self) -> f64 {
        *self
    }
}

impl Measured for ChemicalReading {
    fn measure(&self) -> f64 {
        self.value
    }
}

/// Mean and population standard deviation of a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub mean: f64,
    pub stddev: f64,
}

impl Stats {
    /// Compute stats over the measurements of `items`
    ///
    /// An empty series has mean and stddev 0. A constant series (including
    /// a single value) has its value as mean and stddev 0.
    pub fn of<T: Measured>(items: &[T]) -> Self {
        let first = match items.first() {
            Some(item) => item.measure(),
            None => return Self { mean: 0.0, stddev: 0.0 },
        };

        if items.iter().all(|item| item.measure() == first) {
            return Self { mean: first, stddev: 0.0 };
        }

        let n = items.len() as f64;
        let mean = items.iter().map(Measured::measure).sum::<f64>() / n;
        let squared_deviations: f64 = items
            .iter()
            .map(|item| (item.measure() - mean).powi(2))
            .sum();

        Self {
            mean,
            stddev: (squared_deviations / n).sqrt(),
        }
    }

    /// A value is normal when it lies within `k_stddevs` deviations of the mean
    pub fn is_normal(&self, value: f64, k_stddevs: f64) -> bool {
        if self.stddev == 0.0 {
            return true;
        }
        (value - self.mean).abs() <= k_stddevs * self.stddev
    }
}
