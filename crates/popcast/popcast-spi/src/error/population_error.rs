//! Population forecasting error types

use crate::model::TargetColumn;
use thiserror::Error;

/// Errors that can occur while loading, fitting or evaluating
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PopulationError {
    /// A required column is missing from the input
    #[error("Schema error: required column '{column}' not found")]
    Schema { column: String },

    /// Year data is missing, non-numeric or not strictly increasing,
    /// or a population cell could not be used
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Too few historical points for the requested model configuration
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// No ground-truth rows to score a forecast against
    #[error("Empty projection: no ground-truth rows to score {target} against")]
    EmptyProjection { target: TargetColumn },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Numerical computation error
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Failure reading the input source
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PopulationError {
    /// Whether this error belongs to the load stage, which aborts the whole run.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            PopulationError::Schema { .. }
                | PopulationError::MalformedInput(_)
                | PopulationError::Io(_)
        )
    }
}
