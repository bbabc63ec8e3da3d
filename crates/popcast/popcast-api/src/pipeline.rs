//! Pipeline configuration

use crate::loader::LoaderConfig;
use crate::models::{invalid, ModelConfig};
use popcast_spi::{ModelKind, PopulationError, Result, TargetColumn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Inclusive year interval
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearWindow {
    pub start: i32,
    pub end: i32,
}

impl YearWindow {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }
}

/// Configuration for a full load → fit → evaluate → report run
///
/// Every field has a default, so a JSON document only needs the settings
/// it changes:
///
/// ```rust
/// use popcast_api::PipelineConfig;
///
/// let config = PipelineConfig::from_json_str(r#"{ "models": { "knn": { "k": 3 } } }"#).unwrap();
/// assert_eq!(config.models.knn.k, 3);
/// assert_eq!(config.models.forest.n_trees, 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub loader: LoaderConfig,
    pub models: ModelConfig,
    /// Model kinds to fit, in any order
    pub kinds: Vec<ModelKind>,
    /// Age groups to fit, in any order
    pub targets: Vec<TargetColumn>,
    /// Restrict training to this window of the historical rows
    pub training_window: Option<YearWindow>,
    /// Fit and evaluate units on the rayon thread pool
    pub parallel: bool,
    /// Minimum working-age share for a golden-population year
    pub golden_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            models: ModelConfig::default(),
            kinds: ModelKind::ALL.to_vec(),
            targets: TargetColumn::ALL.to_vec(),
            training_window: None,
            parallel: true,
            golden_threshold: 2.0 / 3.0,
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON document; absent fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PopulationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| PopulationError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn with_loader(mut self, loader: LoaderConfig) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_models(mut self, models: ModelConfig) -> Self {
        self.models = models;
        self
    }

    pub fn with_kinds(mut self, kinds: Vec<ModelKind>) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn with_targets(mut self, targets: Vec<TargetColumn>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_training_window(mut self, window: YearWindow) -> Self {
        self.training_window = Some(window);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.models.validate()?;
        if self.kinds.is_empty() {
            return Err(invalid("kinds", "at least one model kind is required"));
        }
        if self.targets.is_empty() {
            return Err(invalid("targets", "at least one target is required"));
        }
        if !(self.golden_threshold > 0.0 && self.golden_threshold <= 1.0) {
            return Err(invalid("golden_threshold", "must be in (0, 1]"));
        }
        if !(self.loader.mapping.value_scale > 0.0) {
            return Err(invalid("loader.mapping.value_scale", "must be positive"));
        }
        Ok(())
    }
}
