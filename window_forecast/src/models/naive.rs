//! Persistence baseline: the next value equals the last one

use super::check_batch;
use crate::error::Result;
use crate::predictor::{Batch, SequencePredictor, TrainablePredictor, TrainingReport};
use crate::window::Windows;

/// Predicts the last value of every window
#[derive(Debug, Clone)]
pub struct NaivePredictor {
    name: String,
}

impl NaivePredictor {
    /// Create a new persistence predictor
    pub fn new() -> Self {
        Self {
            name: "Naive (last value)".to_string(),
        }
    }
}

impl Default for NaivePredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl SequencePredictor for NaivePredictor {
    fn predict(&self, batch: &Batch) -> Result<Vec<Vec<f64>>> {
        check_batch(&self.name, batch, None)?;

        Ok(batch
            .iter_samples()
            .map(|sample| vec![sample[sample.len() - 1]])
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainablePredictor for NaivePredictor {
    fn fit(&mut self, _train: &Windows, _validation: &Windows) -> Result<TrainingReport> {
        Ok(TrainingReport::untrained())
    }
}
