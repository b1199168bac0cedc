//! Forecast output

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Forecast result containing predicted values in original units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Forecasted values, chronological
    values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
    /// Timestamps (optional)
    timestamps: Option<Vec<DateTime<Utc>>>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(ForecastError::DataError(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self {
            values,
            horizons,
            timestamps: None,
        })
    }

    /// Attach one timestamp per forecast value
    pub fn with_timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Result<Self> {
        if timestamps.len() != self.horizons {
            return Err(ForecastError::DataError(format!(
                "Timestamps length ({}) doesn't match horizons ({})",
                timestamps.len(),
                self.horizons
            )));
        }

        self.timestamps = Some(timestamps);
        Ok(self)
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Get the timestamps, if available
    pub fn timestamps(&self) -> Option<&[DateTime<Utc>]> {
        self.timestamps.as_deref()
    }

    /// Calculate mean absolute error between forecast and actual values
    pub fn mean_absolute_error(&self, actual: &[f64]) -> Result<f64> {
        Ok(series_math::metrics::mean_absolute_error(actual, &self.values)?)
    }

    /// Serialize the forecast as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for ForecastResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast ({} steps):", self.horizons)?;
        for (i, value) in self.values.iter().enumerate() {
            match self.timestamps.as_ref().and_then(|ts| ts.get(i)) {
                Some(ts) => writeln!(
                    f,
                    "  {:>3}  {}  {:.2}",
                    i + 1,
                    ts.format("%Y-%m-%d %H:%M"),
                    value
                )?,
                None => writeln!(f, "  {:>3}  {:.2}", i + 1, value)?,
            }
        }
        Ok(())
    }
}
