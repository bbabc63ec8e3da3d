//! Error module containing error types and result aliases

mod population_error;

pub use population_error::PopulationError;

/// Result type for popcast operations
pub type Result<T> = std::result::Result<T, PopulationError>;
