//! # Series Math
//!
//! Numeric building blocks shared by the forecasting crates.
//! Nothing in here knows about windows, scalers or predictors.

use thiserror::Error;

pub mod metrics;
pub mod trend;

pub use trend::LinearTrend;

/// Errors that can occur in series calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
