//! Min-max scaling with an explicit, immutable fitted state

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Which part of the series the scaler bounds are taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerFit {
    /// Fit on the training split only; test values may fall outside [0, 1]
    #[default]
    TrainOnly,
    /// Fit on the whole series before splitting
    FullSeries,
}

/// Bounds recorded by [`ScalerState::fit`]
///
/// Once produced the state never changes. Every normalize/denormalize call in
/// a pipeline run goes through the same value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScalerBounds")]
pub struct ScalerState {
    min: f64,
    max: f64,
}

/// Unchecked wire form of [`ScalerState`]
#[derive(Deserialize)]
struct ScalerBounds {
    min: f64,
    max: f64,
}

impl TryFrom<ScalerBounds> for ScalerState {
    type Error = ForecastError;

    fn try_from(bounds: ScalerBounds) -> Result<Self> {
        Self::from_bounds(bounds.min, bounds.max)
    }
}

impl ScalerState {
    /// Record the minimum and maximum of `values`
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::InsufficientData(
                "Cannot fit a scaler on an empty sequence".to_string(),
            ));
        }

        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Cannot fit a scaler on non-finite value {}",
                bad
            )));
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if max == min {
            return Err(ForecastError::DegenerateRange(format!(
                "All {} values equal {}; min-max scaling would divide by zero",
                values.len(),
                min
            )));
        }

        Self::from_bounds(min, max)
    }

    /// Build a state from known bounds, with the same checks as `fit`
    pub fn from_bounds(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Scaler bounds must be finite, got [{}, {}]",
                min, max
            )));
        }

        // max - min may still overflow for finite bounds
        let range = max - min;
        if !(range.is_finite() && range > 0.0) {
            return Err(ForecastError::DegenerateRange(format!(
                "Range of [{}, {}] is {}; min-max scaling needs a finite positive range",
                min, max, range
            )));
        }

        Ok(Self { min, max })
    }

    /// Lower bound seen during fit
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound seen during fit
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of the fitted range, always positive
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Map a single value into scaled space
    pub fn normalize_value(&self, value: f64) -> f64 {
        (value - self.min) / self.range()
    }

    /// Map a single scaled value back to the original units
    pub fn denormalize_value(&self, value: f64) -> f64 {
        value * self.range() + self.min
    }

    /// Elementwise `(v - min) / (max - min)`, no clamping
    pub fn normalize(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.normalize_value(v)).collect()
    }

    /// Elementwise `v * (max - min) + min`
    pub fn denormalize(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.denormalize_value(v)).collect()
    }
}
