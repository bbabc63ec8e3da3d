//! K-nearest-neighbors year regression
//!
//! A forecast for year `t` is built from the `k` training years closest to
//! `t`. Ties in distance go to the earlier year, so the neighbor set is
//! always deterministic.

use popcast_api::{KnnConfig, WeightScheme};
use popcast_spi::{ModelKind, PopulationError, Regressor, Result};

/// Nearest-neighbor regressor over (year, value) pairs
#[derive(Debug, Clone)]
pub struct KnnRegressor {
    /// Number of neighbors
    k: usize,
    weights: WeightScheme,
    /// Training years, ascending
    years: Vec<f64>,
    values: Vec<f64>,
}

impl KnnRegressor {
    /// Store the training points.
    ///
    /// Fails with [`PopulationError::InsufficientData`] when there are fewer
    /// points than neighbors.
    pub fn fit(years: &[f64], values: &[f64], config: &KnnConfig) -> Result<Self> {
        if config.k < 1 {
            return Err(PopulationError::InvalidParameter {
                name: "k".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if years.len() < config.k {
            return Err(PopulationError::InsufficientData {
                required: config.k,
                actual: years.len(),
            });
        }

        Ok(Self {
            k: config.k,
            weights: config.weights,
            years: years.to_vec(),
            values: values.to_vec(),
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Find the K nearest training points to `year` as (index, distance).
    fn find_neighbors(&self, year: f64) -> Vec<(usize, f64)> {
        let mut distances: Vec<(usize, f64)> = self
            .years
            .iter()
            .enumerate()
            .map(|(i, &y)| (i, (year - y).abs()))
            .collect();

        // Stable sort: equal distances keep ascending-year order.
        distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        distances.truncate(self.k);

        distances
    }
}

impl Regressor for KnnRegressor {
    fn kind(&self) -> ModelKind {
        ModelKind::Knn
    }

    fn predict_year(&self, year: f64) -> f64 {
        let neighbors = self.find_neighbors(year);

        match self.weights {
            WeightScheme::Uniform => {
                neighbors.iter().map(|&(i, _)| self.values[i]).sum::<f64>() / neighbors.len() as f64
            }
            WeightScheme::InverseDistance => {
                // An exact match dominates every other neighbor.
                let exact: Vec<f64> = neighbors
                    .iter()
                    .filter(|&&(_, d)| d == 0.0)
                    .map(|&(i, _)| self.values[i])
                    .collect();
                if !exact.is_empty() {
                    return exact.iter().sum::<f64>() / exact.len() as f64;
                }

                let mut weighted_sum = 0.0;
                let mut weight_total = 0.0;
                for &(i, distance) in &neighbors {
                    let weight = 1.0 / distance;
                    weighted_sum += weight * self.values[i];
                    weight_total += weight;
                }
                weighted_sum / weight_total
            }
        }
    }
}
