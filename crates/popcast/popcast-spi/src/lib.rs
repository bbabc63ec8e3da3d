//! Popcast Service Provider Interface
//!
//! Defines the data model, error types and the fitted-regressor contract
//! shared by every crate of the population forecasting stack.
//!
//! - [`PopulationRecord`] / [`Dataset`]: the typed age-group time series
//! - [`Regressor`]: the seam every fitted model implements
//! - [`PopulationError`]: standardized error type for all operations

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::Regressor;
pub use error::{PopulationError, Result};
pub use model::{
    Dataset, MetricResult, ModelKind, PopulationRecord, SkippedUnit, TargetColumn,
};
