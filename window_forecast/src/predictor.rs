//! Capability traits for sequence predictors
//!
//! The forecasting core only ever talks to a predictor through these traits.
//! Any model that maps a `[samples, time_steps, 1]` batch to one value per
//! sample can be plugged in.

use crate::error::{ForecastError, Result};
use crate::window::Windows;
use serde::Serialize;
use std::fmt::Debug;

/// Dense `samples × time_steps × features` input block
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    values: Vec<f64>,
    samples: usize,
    time_steps: usize,
    features: usize,
}

impl Batch {
    /// A batch holding a single window: shape `[1, window.len(), 1]`
    pub fn single(window: &[f64]) -> Result<Self> {
        if window.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Cannot build a batch from an empty window".to_string(),
            ));
        }

        Ok(Self {
            values: window.to_vec(),
            samples: 1,
            time_steps: window.len(),
            features: 1,
        })
    }

    /// Stack equally long windows into `[windows.len(), time_steps, 1]`
    pub fn from_windows(windows: &[Vec<f64>]) -> Result<Self> {
        let time_steps = match windows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => {
                return Err(ForecastError::InvalidParameter(
                    "Cannot build a batch without non-empty windows".to_string(),
                ))
            }
        };

        if let Some(bad) = windows.iter().find(|w| w.len() != time_steps) {
            return Err(ForecastError::InvalidParameter(format!(
                "Window length {} doesn't match batch time_steps {}",
                bad.len(),
                time_steps
            )));
        }

        Ok(Self {
            values: windows.concat(),
            samples: windows.len(),
            time_steps,
            features: 1,
        })
    }

    /// `[samples, time_steps, features]`
    pub fn shape(&self) -> [usize; 3] {
        [self.samples, self.time_steps, self.features]
    }

    /// Number of samples
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Number of time steps per sample
    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    /// Number of features per time step
    pub fn features(&self) -> usize {
        self.features
    }

    /// Flattened values of one sample
    pub fn sample(&self, index: usize) -> Option<&[f64]> {
        let width = self.time_steps * self.features;
        self.values.get(index * width..(index + 1) * width)
    }

    /// Iterate over the flattened samples in order
    pub fn iter_samples(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.values.chunks_exact(self.time_steps * self.features)
    }

    /// All values, sample-major
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Something that can score a batch of windows
pub trait SequencePredictor: Debug {
    /// Predict one value per sample; the result has shape `[samples, 1]`
    fn predict(&self, batch: &Batch) -> Result<Vec<Vec<f64>>>;

    /// Name of the predictor
    fn name(&self) -> &str;

    /// Window length the predictor was built for, if it is fixed
    fn time_step(&self) -> Option<usize> {
        None
    }
}

/// A predictor that can be trained on supervised windows
pub trait TrainablePredictor: SequencePredictor {
    /// Train on `train`, using `validation` for monitoring
    fn fit(&mut self, train: &Windows, validation: &Windows) -> Result<TrainingReport>;
}

/// Loss recorded after one training epoch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpochLoss {
    pub epoch: usize,
    pub train_loss: f64,
    pub validation_loss: Option<f64>,
}

/// Summary of a `fit` call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingReport {
    /// Number of epochs that ran
    pub epochs_run: usize,
    /// Epoch whose weights were kept
    pub best_epoch: Option<usize>,
    /// Validation loss of the kept weights
    pub best_validation_loss: Option<f64>,
    /// Whether early stopping ended training
    pub stopped_early: bool,
    /// Per-epoch losses
    pub history: Vec<EpochLoss>,
}

impl TrainingReport {
    /// Report for predictors that have nothing to learn
    pub fn untrained() -> Self {
        Self::default()
    }
}

/// Run `predictor` over `batch` and flatten the `[samples, 1]` result
///
/// Fails with `PredictionFailure` if the output shape doesn't match the batch
/// or any value is non-finite.
pub fn predict_column<P>(predictor: &P, batch: &Batch) -> Result<Vec<f64>>
where
    P: SequencePredictor + ?Sized,
{
    let rows = predictor.predict(batch).map_err(|e| {
        ForecastError::PredictionFailure(format!("{} failed: {}", predictor.name(), e))
    })?;

    if rows.len() != batch.samples() {
        return Err(ForecastError::PredictionFailure(format!(
            "{} returned {} rows for {} samples",
            predictor.name(),
            rows.len(),
            batch.samples()
        )));
    }

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row.as_slice() {
            [value] if value.is_finite() => Ok(*value),
            [value] => Err(ForecastError::PredictionFailure(format!(
                "{} returned non-finite value {} for sample {}",
                predictor.name(),
                value,
                i
            ))),
            other => Err(ForecastError::PredictionFailure(format!(
                "{} returned {} values for sample {}, expected 1",
                predictor.name(),
                other.len(),
                i
            ))),
        })
        .collect()
}
