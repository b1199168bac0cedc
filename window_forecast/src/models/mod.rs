//! Reference sequence predictors
//!
//! None of these are meant to be good models. They give the pipeline something
//! concrete to drive and serve as baselines for real sequence models.

use crate::error::{ForecastError, Result};
use crate::predictor::Batch;

pub mod autoregressive;
pub mod linear_trend;
pub mod naive;

pub use autoregressive::{LinearAutoRegressor, TrainingParams};
pub use linear_trend::LinearTrendPredictor;
pub use naive::NaivePredictor;

/// Reject batches that aren't `[_, time_step, 1]`
fn check_batch(name: &str, batch: &Batch, time_step: Option<usize>) -> Result<()> {
    if batch.features() != 1 {
        return Err(ForecastError::ModelError(format!(
            "{} expects 1 feature per step, got {}",
            name,
            batch.features()
        )));
    }

    if let Some(expected) = time_step {
        if batch.time_steps() != expected {
            return Err(ForecastError::ModelError(format!(
                "{} expects windows of {}, got {}",
                name,
                expected,
                batch.time_steps()
            )));
        }
    }

    Ok(())
}
