//! Least-squares linear trend over an ordered window
//!
//! Positions are the sample indices `0..n`, so a trend fit on a window can be
//! extrapolated directly to the next index.

use crate::{MathError, Result};

/// Ordinary least-squares line through a sequence of values
#[derive(Debug, Clone, PartialEq)]
pub struct LinearTrend {
    slope: f64,
    intercept: f64,
    len: usize,
    ss_total: f64,
    ss_residual: f64,
}

impl LinearTrend {
    /// Fit a line through `values`, using the index of each value as `x`
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(format!(
                "Need at least 2 points for a linear trend, got {}",
                values.len()
            )));
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Linear trend input contains non-finite values".to_string(),
            ));
        }

        let n = values.len() as f64;
        let x_mean = (values.len() - 1) as f64 / 2.0;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let dx = i as f64 - x_mean;
            numerator += dx * (y - y_mean);
            denominator += dx * dx;
        }

        // x values are distinct indices, so this only trips on overflow
        if denominator.abs() < 1e-12 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let fitted = slope * i as f64 + intercept;
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - fitted).powi(2);
        }

        Ok(Self {
            slope,
            intercept,
            len: values.len(),
            ss_total,
            ss_residual,
        })
    }

    /// Slope per step
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Value of the line at index 0
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of points the line was fit on
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a trend needs at least two points
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value of the line at an arbitrary position
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Extrapolate `periods_ahead` steps past the last fitted point
    pub fn forecast(&self, periods_ahead: usize) -> f64 {
        self.value_at((self.len - 1 + periods_ahead) as f64)
    }

    /// Coefficient of determination of the fit
    pub fn r_squared(&self) -> Result<f64> {
        if self.ss_total.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate R-squared: total sum of squares is too small".to_string(),
            ));
        }

        Ok(1.0 - self.ss_residual / self.ss_total)
    }
}
