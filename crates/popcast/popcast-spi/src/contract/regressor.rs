//! Fitted regressor contract

use crate::model::ModelKind;

/// A fitted, immutable year → value regressor.
///
/// Implementations hold only the parameters learned at fit time, so a
/// regressor can be shared across threads and queried concurrently.
///
/// # Example
///
/// ```rust,ignore
/// use popcast_spi::Regressor;
///
/// fn next_decade<R: Regressor>(model: &R, from: i32) -> Vec<f64> {
///     let years: Vec<i32> = (from..from + 10).collect();
///     model.predict(&years)
/// }
/// ```
pub trait Regressor: Send + Sync {
    /// Which approach produced this model
    fn kind(&self) -> ModelKind;

    /// Forecast the target value for a single year
    fn predict_year(&self, year: f64) -> f64;

    /// Forecast the target value for every year, in order
    fn predict(&self, years: &[i32]) -> Vec<f64> {
        years.iter().map(|&y| self.predict_year(f64::from(y))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock implementation: a straight line through the origin year 2000.
    struct LinearMock {
        slope: f64,
    }

    impl Regressor for LinearMock {
        fn kind(&self) -> ModelKind {
            ModelKind::Polynomial
        }

        fn predict_year(&self, year: f64) -> f64 {
            (year - 2000.0) * self.slope
        }
    }

    #[test]
    fn test_default_predict_maps_every_year() {
        let model = LinearMock { slope: 2.0 };
        assert_eq!(model.predict(&[2000, 2001, 2005]), vec![0.0, 2.0, 10.0]);
    }

    #[test]
    fn test_predict_empty_years() {
        let model = LinearMock { slope: 1.0 };
        assert!(model.predict(&[]).is_empty());
    }

    #[test]
    fn test_regressor_is_object_safe() {
        let boxed: Box<dyn Regressor> = Box::new(LinearMock { slope: 1.0 });
        assert_eq!(boxed.kind(), ModelKind::Polynomial);
        assert_eq!(boxed.predict_year(2003.0), 3.0);
    }
}
