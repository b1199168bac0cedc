//! Trainable linear autoregressive model
//!
//! `y = w · window + b`, fit by mini-batch gradient descent on squared error.
//! Batches are taken in chronological order, so training is deterministic.
//! Early stopping watches the validation MAE and keeps the best weights.

use super::check_batch;
use crate::error::{ForecastError, Result};
use crate::predictor::{
    Batch, EpochLoss, SequencePredictor, TrainablePredictor, TrainingReport,
};
use crate::window::Windows;
use serde::{Deserialize, Serialize};
use series_math::metrics::{mean_absolute_error, mean_squared_error};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Gradient descent and early stopping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParams {
    /// Step size for gradient descent
    pub learning_rate: f64,
    /// Upper bound on training epochs
    pub epochs: usize,
    /// Windows per gradient step
    pub batch_size: usize,
    /// Epochs without improvement before stopping
    pub patience: usize,
    /// Smallest loss decrease that counts as an improvement
    pub min_delta: f64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            epochs: 200,
            batch_size: 32,
            patience: 5,
            min_delta: 0.0,
        }
    }
}

impl TrainingParams {
    /// Check that the settings can drive a training run
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.epochs == 0 {
            return Err(ForecastError::InvalidParameter(
                "epochs must be at least 1".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if !(self.min_delta.is_finite() && self.min_delta >= 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "min_delta must be non-negative, got {}",
                self.min_delta
            )));
        }
        Ok(())
    }
}

/// Linear model over a fixed-length window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearAutoRegressor {
    name: String,
    time_step: usize,
    weights: Vec<f64>,
    bias: f64,
    params: TrainingParams,
    trained: bool,
}

impl LinearAutoRegressor {
    /// Create an untrained model for windows of `time_step`
    ///
    /// Weights start as a plain moving average of the window.
    pub fn new(time_step: usize) -> Result<Self> {
        if time_step == 0 {
            return Err(ForecastError::InvalidParameter(
                "time_step must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Linear AR (time_step={})", time_step),
            time_step,
            weights: vec![1.0 / time_step as f64; time_step],
            bias: 0.0,
            params: TrainingParams::default(),
            trained: false,
        })
    }

    /// Replace the training settings
    pub fn with_params(mut self, params: TrainingParams) -> Result<Self> {
        params.validate()?;
        self.params = params;
        Ok(self)
    }

    /// Training settings
    pub fn params(&self) -> &TrainingParams {
        &self.params
    }

    /// One weight per window position, oldest first
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Whether `fit` has completed on this model
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Write the model as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(writer, self)?;
        log::info!("saved {} to {}", self.name, path.as_ref().display());
        Ok(())
    }

    /// Read a model written by [`LinearAutoRegressor::save`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let model: Self = serde_json::from_reader(reader)?;

        if model.time_step == 0 || model.weights.len() != model.time_step {
            return Err(ForecastError::ModelError(format!(
                "Model file has {} weights for time_step {}",
                model.weights.len(),
                model.time_step
            )));
        }
        if model.weights.iter().any(|w| !w.is_finite()) || !model.bias.is_finite() {
            return Err(ForecastError::ModelError(
                "Model file contains non-finite weights".to_string(),
            ));
        }

        log::info!("loaded {} from {}", model.name, path.as_ref().display());
        Ok(model)
    }

    fn predict_one(&self, window: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(window)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias
    }

    fn predict_all(&self, windows: &Windows) -> Vec<f64> {
        windows
            .inputs()
            .iter()
            .map(|w| self.predict_one(w))
            .collect()
    }

    fn check_windows(&self, windows: &Windows, role: &str) -> Result<()> {
        if !windows.is_empty() && windows.time_step() != self.time_step {
            return Err(ForecastError::ModelError(format!(
                "{} windows have length {}, model expects {}",
                role,
                windows.time_step(),
                self.time_step
            )));
        }
        Ok(())
    }

    fn gradient_step(&mut self, inputs: &[Vec<f64>], labels: &[f64]) {
        let mut grad_w = vec![0.0; self.time_step];
        let mut grad_b = 0.0;

        for (window, &label) in inputs.iter().zip(labels) {
            let error = self.predict_one(window) - label;
            for (g, x) in grad_w.iter_mut().zip(window) {
                *g += 2.0 * error * x;
            }
            grad_b += 2.0 * error;
        }

        let scale = self.params.learning_rate / labels.len() as f64;
        for (w, g) in self.weights.iter_mut().zip(&grad_w) {
            *w -= scale * g;
        }
        self.bias -= scale * grad_b;
    }
}

impl SequencePredictor for LinearAutoRegressor {
    fn predict(&self, batch: &Batch) -> Result<Vec<Vec<f64>>> {
        check_batch(&self.name, batch, Some(self.time_step))?;

        Ok(batch
            .iter_samples()
            .map(|sample| vec![self.predict_one(sample)])
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn time_step(&self) -> Option<usize> {
        Some(self.time_step)
    }
}

impl TrainablePredictor for LinearAutoRegressor {
    fn fit(&mut self, train: &Windows, validation: &Windows) -> Result<TrainingReport> {
        if train.is_empty() {
            return Err(ForecastError::InsufficientData(
                "Cannot train on zero windows".to_string(),
            ));
        }
        self.check_windows(train, "Training")?;
        self.check_windows(validation, "Validation")?;

        let mut report = TrainingReport::default();
        let mut best_weights = self.weights.clone();
        let mut best_bias = self.bias;
        let mut best_loss = f64::INFINITY;
        let mut epochs_without_improvement = 0;

        for epoch in 1..=self.params.epochs {
            for (inputs, labels) in train
                .inputs()
                .chunks(self.params.batch_size)
                .zip(train.labels().chunks(self.params.batch_size))
            {
                self.gradient_step(inputs, labels);
            }

            let train_loss = mean_squared_error(train.labels(), &self.predict_all(train))?;
            if !train_loss.is_finite() {
                return Err(ForecastError::ModelError(format!(
                    "Training diverged at epoch {} (learning_rate {})",
                    epoch, self.params.learning_rate
                )));
            }

            let validation_loss = if validation.is_empty() {
                None
            } else {
                Some(mean_absolute_error(
                    validation.labels(),
                    &self.predict_all(validation),
                )?)
            };

            log::debug!(
                "epoch {}: train mse {:.6}, validation mae {:?}",
                epoch,
                train_loss,
                validation_loss
            );

            report.epochs_run = epoch;
            report.history.push(EpochLoss {
                epoch,
                train_loss,
                validation_loss,
            });

            let monitored = validation_loss.unwrap_or(train_loss);
            if monitored < best_loss - self.params.min_delta {
                best_loss = monitored;
                best_weights = self.weights.clone();
                best_bias = self.bias;
                report.best_epoch = Some(epoch);
                epochs_without_improvement = 0;
            } else {
                epochs_without_improvement += 1;
                if epochs_without_improvement >= self.params.patience {
                    report.stopped_early = true;
                    break;
                }
            }
        }

        self.weights = best_weights;
        self.bias = best_bias;
        self.trained = true;
        report.best_validation_loss = (!validation.is_empty()).then_some(best_loss);

        log::info!(
            "trained {} for {} epochs (best epoch {:?}, early stop: {})",
            self.name,
            report.epochs_run,
            report.best_epoch,
            report.stopped_early
        );

        Ok(report)
    }
}
