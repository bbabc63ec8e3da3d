//! Model module containing data structures
//!
//! - [`PopulationRecord`] and [`TargetColumn`] - one year of age-group counts
//! - [`Dataset`] - an immutable, windowed view over the records
//! - [`ModelKind`] - the three regressor variants
//! - [`MetricResult`] / [`SkippedUnit`] - outcomes of one evaluation unit

mod dataset;
mod metric_result;
mod model_kind;
mod record;

pub use dataset::Dataset;
pub use metric_result::{MetricResult, SkippedUnit};
pub use model_kind::ModelKind;
pub use record::{PopulationRecord, TargetColumn};
