//! Column Statistics for Standardization

use serde::{Deserialize, Serialize};

/// Summary statistics of one numeric column
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    /// Number of observed values
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl ColumnStatistics {
    /// Compute statistics from a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);

        let m2: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        let std_dev = (m2 / n).sqrt();

        Self {
            count: values.len(),
            mean,
            std_dev,
            min,
            max,
        }
    }

    /// Divisor used for standardization; constant columns keep scale 1
    pub fn scale(&self) -> f64 {
        if self.std_dev > f64::EPSILON {
            self.std_dev
        } else {
            1.0
        }
    }

    /// Standardize a value against these statistics
    pub fn standardize(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_computation() {
        let stats = ColumnStatistics::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((stats.mean - 3.0).abs() < 1e-12);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
    }

    #[test]
    fn test_population_std_dev() {
        let stats = ColumnStatistics::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_scale() {
        let stats = ColumnStatistics::compute(&[3.0, 3.0, 3.0]);
        assert_eq!(stats.scale(), 1.0);
        assert_eq!(stats.standardize(3.0), 0.0);
    }

    #[test]
    fn test_empty_values() {
        let stats = ColumnStatistics::compute(&[]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.count, 0);
    }
}
