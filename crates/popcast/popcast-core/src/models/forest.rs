//! Bootstrap ensemble of regression trees over the year axis

use popcast_api::ForestConfig;
use popcast_spi::{ModelKind, PopulationError, Regressor, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

#[derive(Debug, Clone)]
enum TreeNode {
    Leaf(f64),
    Split {
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict(&self, year: f64) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(value) => return *value,
                TreeNode::Split {
                    threshold,
                    left,
                    right,
                } => {
                    node = if year <= *threshold { left } else { right };
                }
            }
        }
    }
}

/// Random-forest regressor
///
/// Each tree is grown on a bootstrap resample drawn from its own RNG,
/// seeded from the configured seed plus the tree index. Trees may be grown
/// in parallel without affecting the result.
#[derive(Debug, Clone)]
pub struct ForestRegressor {
    trees: Vec<TreeNode>,
}

impl ForestRegressor {
    pub fn fit(years: &[f64], values: &[f64], config: &ForestConfig) -> Result<Self> {
        if years.is_empty() {
            return Err(PopulationError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        if config.n_trees < 1 {
            return Err(PopulationError::InvalidParameter {
                name: "n_trees".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let points: Vec<(f64, f64)> = years.iter().copied().zip(values.iter().copied()).collect();

        let trees = (0..config.n_trees)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(tree_idx as u64));
                let mut sample: Vec<(f64, f64)> = (0..points.len())
                    .map(|_| points[rng.gen_range(0..points.len())])
                    .collect();
                sample.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
                grow(&sample, 0, config)
            })
            .collect();

        Ok(Self { trees })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for ForestRegressor {
    fn kind(&self) -> ModelKind {
        ModelKind::RandomForest
    }

    fn predict_year(&self, year: f64) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict(year)).sum();
        sum / self.trees.len() as f64
    }
}

/// Grow a tree on samples sorted by year.
fn grow(samples: &[(f64, f64)], depth: usize, config: &ForestConfig) -> TreeNode {
    let n = samples.len();
    let mean = samples.iter().map(|s| s.1).sum::<f64>() / n as f64;

    if depth >= config.max_depth || n < config.min_samples_split {
        return TreeNode::Leaf(mean);
    }

    match best_split(samples) {
        Some((idx, threshold)) => TreeNode::Split {
            threshold,
            left: Box::new(grow(&samples[..idx], depth + 1, config)),
            right: Box::new(grow(&samples[idx..], depth + 1, config)),
        },
        None => TreeNode::Leaf(mean),
    }
}

/// Split position minimizing the summed squared error of both sides.
///
/// Only positions between distinct years are candidates, and the first
/// best position wins. Returns `None` when every year is equal or when no
/// split reduces the error.
fn best_split(samples: &[(f64, f64)]) -> Option<(usize, f64)> {
    let n = samples.len();
    let total: f64 = samples.iter().map(|s| s.1).sum();
    let total_sq: f64 = samples.iter().map(|s| s.1 * s.1).sum();
    let parent_sse = total_sq - total * total / n as f64;

    let mut best: Option<(usize, f64)> = None;
    let mut best_sse = parent_sse;
    let mut left_sum = 0.0;
    let mut left_sq = 0.0;

    for i in 1..n {
        let y = samples[i - 1].1;
        left_sum += y;
        left_sq += y * y;

        if samples[i - 1].0 == samples[i].0 {
            continue;
        }

        let n_left = i as f64;
        let n_right = (n - i) as f64;
        let right_sum = total - left_sum;
        let right_sq = total_sq - left_sq;
        let sse = (left_sq - left_sum * left_sum / n_left) + (right_sq - right_sum * right_sum / n_right);

        if sse < best_sse - 1e-12 {
            best_sse = sse;
            best = Some((i, (samples[i - 1].0 + samples[i].0) / 2.0));
        }
    }

    best
}
