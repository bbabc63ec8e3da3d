//! Per-model hyperparameters

use popcast_spi::{PopulationError, Result};
use serde::{Deserialize, Serialize};

/// How neighbor values are combined
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightScheme {
    /// Plain mean of the k neighbors
    Uniform,
    /// Weighted by inverse year distance
    #[default]
    InverseDistance,
}

/// Nearest-neighbor settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KnnConfig {
    /// Number of neighbors
    pub k: usize,
    pub weights: WeightScheme,
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self {
            k: 5,
            weights: WeightScheme::InverseDistance,
        }
    }
}

impl KnnConfig {
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_weights(mut self, weights: WeightScheme) -> Self {
        self.weights = weights;
        self
    }
}

/// Ensemble-tree settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples a node needs before it may split
    pub min_samples_split: usize,
    /// Seed for bootstrap resampling
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
            seed: 42,
        }
    }
}

impl ForestConfig {
    pub fn with_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Polynomial trend settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolynomialConfig {
    pub degree: usize,
    /// Limit the degree to a quarter of the training points
    pub clamp_degree: bool,
}

impl Default for PolynomialConfig {
    fn default() -> Self {
        Self {
            degree: 3,
            clamp_degree: true,
        }
    }
}

impl PolynomialConfig {
    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    pub fn with_clamp(mut self, clamp_degree: bool) -> Self {
        self.clamp_degree = clamp_degree;
        self
    }
}

/// Hyperparameters for all three regressors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ModelConfig {
    pub knn: KnnConfig,
    pub forest: ForestConfig,
    pub polynomial: PolynomialConfig,
}

impl ModelConfig {
    /// Reject settings no model can be fit with.
    pub fn validate(&self) -> Result<()> {
        if self.knn.k < 1 {
            return Err(invalid("knn.k", "must be at least 1"));
        }
        if self.forest.n_trees < 1 {
            return Err(invalid("forest.n_trees", "must be at least 1"));
        }
        if self.forest.max_depth < 1 {
            return Err(invalid("forest.max_depth", "must be at least 1"));
        }
        if self.forest.min_samples_split < 2 {
            return Err(invalid("forest.min_samples_split", "must be at least 2"));
        }
        Ok(())
    }
}

pub(crate) fn invalid(name: &str, reason: &str) -> PopulationError {
    PopulationError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_reference_settings() {
        let config = ModelConfig::default();
        assert_eq!(config.knn.k, 5);
        assert_eq!(config.knn.weights, WeightScheme::InverseDistance);
        assert_eq!(config.forest.n_trees, 100);
        assert_eq!(config.forest.max_depth, 10);
        assert_eq!(config.forest.min_samples_split, 5);
        assert_eq!(config.forest.seed, 42);
        assert_eq!(config.polynomial.degree, 3);
        assert!(config.polynomial.clamp_degree);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_k_rejected() {
        let config = ModelConfig {
            knn: KnnConfig::default().with_k(0),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("knn.k"));
    }

    #[test]
    fn test_min_samples_split_rejected() {
        let mut config = ModelConfig::default();
        config.forest.min_samples_split = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builders() {
        let forest = ForestConfig::default().with_trees(10).with_seed(7).with_max_depth(3);
        assert_eq!((forest.n_trees, forest.seed, forest.max_depth), (10, 7, 3));

        let poly = PolynomialConfig::default().with_degree(2).with_clamp(false);
        assert_eq!(poly.degree, 2);
        assert!(!poly.clamp_degree);
    }
}
