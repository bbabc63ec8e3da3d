//! Popcast Consumer API
//!
//! Configuration types for the population forecasting stack.
//!
//! This crate provides:
//! - Input column mapping and loader settings
//! - Per-model hyperparameters
//! - Pipeline configuration, loadable from JSON
//! - Re-exports from SPI for convenience

mod loader;
mod models;
mod pipeline;

pub use loader::{ColumnMapping, ColumnSource, LoaderConfig};
pub use models::{ForestConfig, KnnConfig, ModelConfig, PolynomialConfig, WeightScheme};
pub use pipeline::{PipelineConfig, YearWindow};

// Re-export SPI types
pub use popcast_spi::{
    Dataset, MetricResult, ModelKind, PopulationError, PopulationRecord, Regressor, Result,
    SkippedUnit, TargetColumn,
};
