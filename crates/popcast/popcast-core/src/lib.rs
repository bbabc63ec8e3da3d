//! Popcast Core
//!
//! Core implementations for age-group population forecasting:
//!
//! - [`loader`]: CSV → [`Dataset`] with schema checks and projection fallback
//! - [`selector`]: inclusive, clamped year-range views
//! - [`models`]: nearest-neighbor, ensemble-tree and polynomial regressors
//! - [`metrics`] / [`evaluator`]: RMSE, MAE and R² against projection rows
//! - [`reporter`]: per-target ranking with skipped-unit reporting
//! - [`summary`]: period statistics and golden-population periods
//! - [`pipeline`] / [`refit`]: batch orchestration and interactive refits
//!
//! ## Example
//!
//! ```rust
//! use popcast_core::prelude::*;
//!
//! let records = (1950..=2030)
//!     .map(|y| {
//!         let t = (y - 1950) as f64;
//!         PopulationRecord::new(y, 10.0 + 0.05 * t, 20.0 + 0.6 * t, 1.0 + 0.1 * t)
//!     })
//!     .collect();
//! let dataset = Dataset::from_records(records, Some(2021)).unwrap();
//!
//! let report = Pipeline::new(PipelineConfig::default()).run(&dataset).unwrap();
//! assert_eq!(report.groups.len(), 3);
//! assert!(report.skipped.is_empty());
//! ```

pub mod evaluator;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod refit;
pub mod reporter;
pub mod selector;
pub mod summary;

// Re-export from API (which includes the SPI model)
pub use popcast_api::*;

// Re-export main types
pub use evaluator::evaluate;
pub use loader::{load_from_path, load_from_reader};
pub use models::{fit, predict, ModelHandle};
pub use pipeline::{ModelSet, Pipeline};
pub use refit::{CommitOutcome, RefitCoordinator, RefitTicket};
pub use reporter::{rank, ComparisonReport, RankedEntry, TargetRanking};
pub use selector::select;
pub use summary::{golden_periods, summarize, AgeShares, RangeSummary, YearSpan};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::evaluator::evaluate;
    pub use crate::loader::{load_from_path, load_from_reader};
    pub use crate::models::{fit, predict, ModelHandle};
    pub use crate::pipeline::{ModelSet, Pipeline};
    pub use crate::reporter::{rank, ComparisonReport};
    pub use crate::selector::select;
    pub use crate::summary::{golden_periods, summarize};
    pub use popcast_api::{
        Dataset, LoaderConfig, MetricResult, ModelConfig, ModelKind, PipelineConfig,
        PopulationError, PopulationRecord, Regressor, Result, SkippedUnit, TargetColumn,
    };
}
