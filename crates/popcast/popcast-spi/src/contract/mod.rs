//! Contract traits for regressor implementations
//!
//! - [`Regressor`]: a fitted model that maps a year to a forecast value

mod regressor;

pub use regressor::Regressor;
