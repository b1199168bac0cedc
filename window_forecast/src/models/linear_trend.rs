//! Per-window linear extrapolation

use super::check_batch;
use crate::error::Result;
use crate::predictor::{Batch, SequencePredictor, TrainablePredictor, TrainingReport};
use crate::window::Windows;
use series_math::LinearTrend;

/// Fits a least-squares line through each window and extends it one step
#[derive(Debug, Clone)]
pub struct LinearTrendPredictor {
    name: String,
}

impl LinearTrendPredictor {
    /// Create a new trend predictor
    pub fn new() -> Self {
        Self {
            name: "Linear trend".to_string(),
        }
    }
}

impl Default for LinearTrendPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl SequencePredictor for LinearTrendPredictor {
    fn predict(&self, batch: &Batch) -> Result<Vec<Vec<f64>>> {
        check_batch(&self.name, batch, None)?;

        batch
            .iter_samples()
            .map(|sample| {
                // a single point has no slope
                if sample.len() < 2 {
                    return Ok(vec![sample[0]]);
                }
                let trend = LinearTrend::fit(sample)?;
                Ok(vec![trend.forecast(1)])
            })
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainablePredictor for LinearTrendPredictor {
    fn fit(&mut self, _train: &Windows, _validation: &Windows) -> Result<TrainingReport> {
        Ok(TrainingReport::untrained())
    }
}
