//! Evaluation outcomes

use super::{ModelKind, TargetColumn};
use serde::Serialize;

/// Accuracy of one (model, target) unit against the projection rows.
///
/// `r_squared` is NaN when the actual values are constant; it serializes
/// to `null` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricResult {
    pub model_kind: ModelKind,
    pub target_column: TargetColumn,
    pub rmse: f64,
    pub mae: f64,
    pub r_squared: f64,
    /// Number of projection rows scored
    pub points: usize,
}

/// A (model, target) unit that produced no metrics, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedUnit {
    pub model_kind: ModelKind,
    pub target_column: TargetColumn,
    pub reason: String,
}

impl SkippedUnit {
    pub fn new(model_kind: ModelKind, target_column: TargetColumn, reason: impl Into<String>) -> Self {
        Self {
            model_kind,
            target_column,
            reason: reason.into(),
        }
    }
}
