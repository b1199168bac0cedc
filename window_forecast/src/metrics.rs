//! Diagnostics for predicted vs. actual values

use crate::error::Result;
use serde::Serialize;
use series_math::metrics::{
    explained_variance_score, mean_absolute_error, mean_gamma_deviance, mean_poisson_deviance,
    mean_squared_error, r2_score,
};

/// Regression scores on values in original units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Number of scored points
    pub samples: usize,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Explained variance regression score
    pub explained_variance: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Mean gamma deviance, when every value is positive
    pub mean_gamma_deviance: Option<f64>,
    /// Mean Poisson deviance, when actuals are non-negative and predictions positive
    pub mean_poisson_deviance: Option<f64>,
}

/// Score `predicted` against `actual`
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<EvaluationReport> {
    let mse = mean_squared_error(actual, predicted)?;

    Ok(EvaluationReport {
        samples: actual.len(),
        rmse: mse.sqrt(),
        mse,
        mae: mean_absolute_error(actual, predicted)?,
        explained_variance: explained_variance_score(actual, predicted)?,
        r2: r2_score(actual, predicted)?,
        mean_gamma_deviance: mean_gamma_deviance(actual, predicted).ok(),
        mean_poisson_deviance: mean_poisson_deviance(actual, predicted).ok(),
    })
}

impl std::fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  Samples:            {}", self.samples)?;
        writeln!(f, "  RMSE:               {:.4}", self.rmse)?;
        writeln!(f, "  MSE:                {:.4}", self.mse)?;
        writeln!(f, "  MAE:                {:.4}", self.mae)?;
        writeln!(f, "  Explained variance: {:.4}", self.explained_variance)?;
        writeln!(f, "  R2:                 {:.4}", self.r2)?;
        match self.mean_gamma_deviance {
            Some(v) => writeln!(f, "  MGD:                {:.6}", v)?,
            None => writeln!(f, "  MGD:                n/a")?,
        }
        match self.mean_poisson_deviance {
            Some(v) => writeln!(f, "  MPD:                {:.6}", v)?,
            None => writeln!(f, "  MPD:                n/a")?,
        }
        Ok(())
    }
}
