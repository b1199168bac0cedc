//! Regression metrics comparing actual and predicted values
//!
//! All functions take `(actual, predicted)` of equal, non-zero length.

use crate::{MathError, Result};
use statrs::statistics::Statistics;

fn check_pair(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() {
        return Err(MathError::InvalidInput(format!(
            "Actual length ({}) doesn't match predicted length ({})",
            actual.len(),
            predicted.len()
        )));
    }

    if actual.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot score an empty set of predictions".to_string(),
        ));
    }

    Ok(())
}

/// Mean squared error
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Root mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    Ok(mean_squared_error(actual, predicted)?.sqrt())
}

/// Mean absolute error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Share of the variance of `actual` explained by `predicted`
///
/// Uses population variances. A constant `actual` scores 1.0 when the
/// residuals are constant too, 0.0 otherwise.
pub fn explained_variance_score(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    let residuals: Vec<f64> = actual.iter().zip(predicted).map(|(a, p)| a - p).collect();
    let residual_variance = residuals.iter().population_variance();
    let actual_variance = actual.iter().population_variance();

    Ok(score_ratio(residual_variance, actual_variance))
}

/// Coefficient of determination (R²)
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_residual: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_total: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    Ok(score_ratio(ss_residual, ss_total))
}

fn score_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() < f64::EPSILON {
        if numerator.abs() < f64::EPSILON {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - numerator / denominator
    }
}

/// Mean gamma deviance; both inputs must be strictly positive
pub fn mean_gamma_deviance(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    if actual.iter().chain(predicted).any(|&v| v <= 0.0) {
        return Err(MathError::InvalidInput(
            "Mean gamma deviance requires strictly positive values".to_string(),
        ));
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| 2.0 * ((p / a).ln() + a / p - 1.0))
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Mean Poisson deviance; `actual` must be non-negative, `predicted` positive
pub fn mean_poisson_deviance(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    if actual.iter().any(|&a| a < 0.0) || predicted.iter().any(|&p| p <= 0.0) {
        return Err(MathError::InvalidInput(
            "Mean Poisson deviance requires non-negative actuals and positive predictions"
                .to_string(),
        ));
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| {
            // a * ln(a / p) tends to 0 as a -> 0
            let log_term = if a == 0.0 { 0.0 } else { a * (a / p).ln() };
            2.0 * (log_term - a + p)
        })
        .sum();

    Ok(sum / actual.len() as f64)
}
