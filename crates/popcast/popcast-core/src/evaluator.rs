//! Forecast evaluation against projection rows

use crate::metrics::{mae, r_squared, rmse};
use crate::models::ModelHandle;
use popcast_spi::{Dataset, MetricResult, PopulationError, Regressor, Result};

/// Score a fitted handle against the rows of `projection`.
///
/// Predictions are made for exactly the projection years and compared with
/// the actual values of the handle's target column. R² is NaN when those
/// actual values are all equal.
///
/// # Errors
///
/// [`PopulationError::EmptyProjection`] when `projection` has no rows.
pub fn evaluate(handle: &ModelHandle, projection: &Dataset) -> Result<MetricResult> {
    if projection.is_empty() {
        return Err(PopulationError::EmptyProjection {
            target: handle.target(),
        });
    }

    let target = handle.target();
    let years = projection.years();
    let actual: Vec<f64> = projection.records().iter().map(|r| r.value(target)).collect();
    let predicted = handle.predict(&years);

    Ok(MetricResult {
        model_kind: handle.kind(),
        target_column: target,
        rmse: rmse(&actual, &predicted),
        mae: mae(&actual, &predicted),
        r_squared: r_squared(&actual, &predicted),
        points: actual.len(),
    })
}
