//! Forecast model set
//!
//! Three interchangeable year → value regressors, fit per age-group target:
//!
//! - [`KnnRegressor`]: weighted aggregate of the k closest historical years
//! - [`ForestRegressor`]: bootstrap ensemble of regression trees
//! - [`PolynomialRegressor`]: least-squares polynomial trend
//!
//! The variants are held in one tagged union, [`FittedModel`], behind an
//! opaque [`ModelHandle`], so evaluation and reporting never depend on which
//! approach backs a handle.

mod forest;
mod knn;
mod polynomial;

pub use forest::ForestRegressor;
pub use knn::KnnRegressor;
pub use polynomial::PolynomialRegressor;

use popcast_api::ModelConfig;
use popcast_spi::{Dataset, ModelKind, PopulationRecord, Regressor, Result, TargetColumn};

/// Fitted parameters of one regressor variant
#[derive(Debug, Clone)]
pub enum FittedModel {
    Knn(KnnRegressor),
    RandomForest(ForestRegressor),
    Polynomial(PolynomialRegressor),
}

impl FittedModel {
    fn as_regressor(&self) -> &dyn Regressor {
        match self {
            FittedModel::Knn(m) => m,
            FittedModel::RandomForest(m) => m,
            FittedModel::Polynomial(m) => m,
        }
    }
}

/// An immutable fitted regressor bound to one target column.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    target: TargetColumn,
    model: FittedModel,
    /// First and last training year
    span: (i32, i32),
    points: usize,
}

impl ModelHandle {
    pub fn kind(&self) -> ModelKind {
        self.model.as_regressor().kind()
    }

    pub fn target(&self) -> TargetColumn {
        self.target
    }

    /// Fitted parameters, for inspection.
    pub fn model(&self) -> &FittedModel {
        &self.model
    }

    /// First and last year of the training rows.
    pub fn training_span(&self) -> (i32, i32) {
        self.span
    }

    /// Number of training rows.
    pub fn training_points(&self) -> usize {
        self.points
    }
}

impl Regressor for ModelHandle {
    fn kind(&self) -> ModelKind {
        ModelHandle::kind(self)
    }

    fn predict_year(&self, year: f64) -> f64 {
        self.model.as_regressor().predict_year(year)
    }
}

/// Fit one regressor of `kind` to `target` over the historical rows.
///
/// # Errors
///
/// [`PopulationError::InsufficientData`](popcast_spi::PopulationError::InsufficientData)
/// when there are fewer rows than the configuration needs, and
/// [`PopulationError::NumericalError`](popcast_spi::PopulationError::NumericalError)
/// when the polynomial system is singular.
pub fn fit(
    kind: ModelKind,
    historical: &Dataset,
    target: TargetColumn,
    config: &ModelConfig,
) -> Result<ModelHandle> {
    let rows = historical.records();
    let (years, values) = training_points(rows, target);

    let model = match kind {
        ModelKind::Knn => FittedModel::Knn(KnnRegressor::fit(&years, &values, &config.knn)?),
        ModelKind::RandomForest => {
            FittedModel::RandomForest(ForestRegressor::fit(&years, &values, &config.forest)?)
        }
        ModelKind::Polynomial => {
            FittedModel::Polynomial(PolynomialRegressor::fit(&years, &values, &config.polynomial)?)
        }
    };

    let span = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => (first.year, last.year),
        _ => (0, 0),
    };

    Ok(ModelHandle {
        target,
        model,
        span,
        points: rows.len(),
    })
}

/// Forecast the handle's target for each year, in order.
pub fn predict(handle: &ModelHandle, years: &[i32]) -> Vec<f64> {
    handle.predict(years)
}

fn training_points(rows: &[PopulationRecord], target: TargetColumn) -> (Vec<f64>, Vec<f64>) {
    rows.iter()
        .map(|r| (f64::from(r.year), r.value(target)))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcast_spi::PopulationError;

    fn linear_history(n: i32) -> Dataset {
        let records = (0..n)
            .map(|i| PopulationRecord::new(1950 + i, 10.0 + i as f64, 30.0 + 2.0 * i as f64, 1.0))
            .collect();
        Dataset::from_records(records, None).unwrap()
    }

    #[test]
    fn test_fit_every_kind() {
        let data = linear_history(40);
        let config = ModelConfig::default();
        for kind in ModelKind::ALL {
            let handle = fit(kind, &data, TargetColumn::WorkingAge, &config).unwrap();
            assert_eq!(handle.kind(), kind);
            assert_eq!(handle.target(), TargetColumn::WorkingAge);
            assert_eq!(handle.training_span(), (1950, 1989));
            assert_eq!(handle.training_points(), 40);

            let forecast = predict(&handle, &[1960, 1995]);
            assert_eq!(forecast.len(), 2);
            assert!(forecast.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_fitting_is_deterministic() {
        let data = linear_history(30);
        let config = ModelConfig::default();
        let years: Vec<i32> = (1940..2000).collect();
        for kind in ModelKind::ALL {
            let a = fit(kind, &data, TargetColumn::Young, &config).unwrap();
            let b = fit(kind, &data, TargetColumn::Young, &config).unwrap();
            assert_eq!(predict(&a, &years), predict(&b, &years), "{} not deterministic", kind);
        }
    }

    #[test]
    fn test_single_row_boundaries() {
        let data = linear_history(1);
        let config = ModelConfig::default();

        let err = fit(ModelKind::Knn, &data, TargetColumn::Young, &config).unwrap_err();
        assert_eq!(
            err,
            PopulationError::InsufficientData {
                required: 5,
                actual: 1
            }
        );

        let mut constant = config.clone();
        constant.polynomial.degree = 0;
        let handle = fit(ModelKind::Polynomial, &data, TargetColumn::Young, &constant).unwrap();
        assert_eq!(predict(&handle, &[2000]), vec![10.0]);
    }

    #[test]
    fn test_empty_history_fails_for_every_kind() {
        let data = Dataset::empty();
        let config = ModelConfig::default();
        for kind in ModelKind::ALL {
            let err = fit(kind, &data, TargetColumn::Elderly, &config).unwrap_err();
            assert!(matches!(err, PopulationError::InsufficientData { .. }));
        }
    }

    #[test]
    fn test_handles_are_usable_as_trait_objects() {
        let data = linear_history(20);
        let handle = fit(ModelKind::Polynomial, &data, TargetColumn::Young, &ModelConfig::default())
            .unwrap();
        let regressor: &dyn Regressor = &handle;
        assert_eq!(regressor.kind(), ModelKind::Polynomial);
    }
}
