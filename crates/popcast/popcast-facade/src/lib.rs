//! Popcast Facade
//!
//! High-level API for population forecasting. Re-exports all public types
//! from the popcast stack for convenient usage.

// Re-export everything from core (which includes API and SPI)
pub use popcast_core::*;

// Explicit re-exports for documentation
pub use popcast_core::prelude;

// Re-export core modules for direct access
pub use popcast_core::{evaluator, loader, metrics, models, pipeline, refit, reporter, selector, summary};

// Re-export SPI contract types
pub use popcast_spi::{PopulationError, Regressor, Result};
