//! Error types for the window_forecast crate

use thiserror::Error;

/// Custom error types for the window_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The scaler was fit on values that all share one value
    #[error("Degenerate range: {0}")]
    DegenerateRange(String),

    /// Sequence too short for the requested operation
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Train/test split ratio outside (0, 1)
    #[error("Invalid ratio: {0}")]
    InvalidRatio(String),

    /// A predictor call failed, returned the wrong shape or a non-finite value
    #[error("Prediction failure: {0}")]
    PredictionFailure(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or loading
    #[error("Data error: {0}")]
    DataError(String),

    /// Error raised by a predictor implementation
    #[error("Model error: {0}")]
    ModelError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from model (de)serialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Error from loading configuration
    #[error("Config error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Error from the numeric helpers
    #[error("Math error: {0}")]
    MathError(#[from] series_math::MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
