//! Least-squares polynomial trend

use popcast_api::PolynomialConfig;
use popcast_spi::{ModelKind, PopulationError, Regressor, Result};
use tracing::warn;

/// Polynomial regressor on standardized years
///
/// Years are centered and scaled before fitting so the normal equations
/// stay well conditioned for calendar-year inputs.
#[derive(Debug, Clone)]
pub struct PolynomialRegressor {
    /// Coefficients, constant term first
    coefficients: Vec<f64>,
    center: f64,
    scale: f64,
}

impl PolynomialRegressor {
    pub fn fit(years: &[f64], values: &[f64], config: &PolynomialConfig) -> Result<Self> {
        let n = years.len();
        if n == 0 {
            return Err(PopulationError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        let degree = if config.clamp_degree {
            let limit = n / 4;
            if config.degree > limit {
                warn!(
                    requested = config.degree,
                    effective = limit,
                    points = n,
                    "polynomial degree clamped to a quarter of the training points"
                );
            }
            config.degree.min(limit)
        } else {
            if n < config.degree + 1 {
                return Err(PopulationError::InsufficientData {
                    required: config.degree + 1,
                    actual: n,
                });
            }
            config.degree
        };

        let center = years.iter().sum::<f64>() / n as f64;
        let variance = years.iter().map(|y| (y - center).powi(2)).sum::<f64>() / n as f64;
        let scale = if variance > 0.0 { variance.sqrt() } else { 1.0 };

        let size = degree + 1;
        let mut gram = vec![0.0; size * size];
        let mut rhs = vec![0.0; size];
        for (&year, &value) in years.iter().zip(values.iter()) {
            let z = (year - center) / scale;
            let powers: Vec<f64> = (0..size).map(|p| z.powi(p as i32)).collect();
            for i in 0..size {
                rhs[i] += powers[i] * value;
                for j in 0..size {
                    gram[i * size + j] += powers[i] * powers[j];
                }
            }
        }

        let coefficients = solve_system(gram, rhs, size)?;

        Ok(Self {
            coefficients,
            center,
            scale,
        })
    }

    /// Effective degree after clamping.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }
}

impl Regressor for PolynomialRegressor {
    fn kind(&self) -> ModelKind {
        ModelKind::Polynomial
    }

    fn predict_year(&self, year: f64) -> f64 {
        let z = (year - self.center) / self.scale;
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * z + c)
    }
}

/// Solve `a * x = b` by Gauss-Jordan elimination with partial pivoting.
///
/// `a` is row-major `n × n`.
fn solve_system(mut a: Vec<f64>, mut b: Vec<f64>, n: usize) -> Result<Vec<f64>> {
    let magnitude = a.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let tolerance = magnitude.max(1.0) * 1e-12;

    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k * n + i].abs() > a[max_row * n + i].abs() {
                max_row = k;
            }
        }

        if max_row != i {
            for j in 0..n {
                a.swap(i * n + j, max_row * n + j);
            }
            b.swap(i, max_row);
        }

        let pivot = a[i * n + i];
        if pivot.abs() < tolerance {
            return Err(PopulationError::NumericalError(format!(
                "singular normal equations at column {}",
                i
            )));
        }

        for j in 0..n {
            a[i * n + j] /= pivot;
        }
        b[i] /= pivot;

        for k in 0..n {
            if k != i {
                let factor = a[k * n + i];
                if factor != 0.0 {
                    for j in 0..n {
                        a[k * n + j] -= factor * a[i * n + j];
                    }
                    b[k] -= factor * b[i];
                }
            }
        }
    }

    if b.iter().any(|v| !v.is_finite()) {
        return Err(PopulationError::NumericalError(
            "non-finite polynomial coefficient".to_string(),
        ));
    }

    Ok(b)
}
