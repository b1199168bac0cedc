//! Supervised windows over an ordered sequence
//!
//! A window starting at `i` holds `sequence[i..i + time_step]` and is labelled
//! with `sequence[i + time_step]`. Windows keep the chronological order of the
//! source sequence.

use crate::error::{ForecastError, Result};
use crate::predictor::Batch;

/// Input windows and their labels, in chronological order
#[derive(Debug, Clone, PartialEq)]
pub struct Windows {
    time_step: usize,
    inputs: Vec<Vec<f64>>,
    labels: Vec<f64>,
}

impl Windows {
    /// No pairs at all, e.g. to train without a validation set
    pub fn empty(time_step: usize) -> Self {
        Self {
            time_step,
            inputs: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Window length
    pub fn time_step(&self) -> usize {
        self.time_step
    }

    /// Input windows, each `time_step` long
    pub fn inputs(&self) -> &[Vec<f64>] {
        &self.inputs
    }

    /// The value following each input window
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// Number of (window, label) pairs
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if there are no pairs
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over `(window, label)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], f64)> + '_ {
        self.inputs
            .iter()
            .map(Vec::as_slice)
            .zip(self.labels.iter().copied())
    }

    /// Lay the inputs out as a `[len, time_step, 1]` batch
    pub fn to_batch(&self) -> Result<Batch> {
        Batch::from_windows(&self.inputs)
    }
}

/// Turns a flat sequence into supervised windows of a fixed length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBuilder {
    time_step: usize,
}

impl WindowBuilder {
    /// Create a builder for windows of `time_step` observations
    pub fn new(time_step: usize) -> Result<Self> {
        if time_step == 0 {
            return Err(ForecastError::InvalidParameter(
                "time_step must be at least 1".to_string(),
            ));
        }

        Ok(Self { time_step })
    }

    /// Window length
    pub fn time_step(&self) -> usize {
        self.time_step
    }

    /// Number of pairs `build` produces for a sequence of `len` values
    pub fn pair_count(&self, len: usize) -> usize {
        len.saturating_sub(self.time_step + 1)
    }

    /// Build `len - time_step - 1` (window, label) pairs
    pub fn build(&self, sequence: &[f64]) -> Result<Windows> {
        if sequence.len() <= self.time_step + 1 {
            return Err(ForecastError::InsufficientData(format!(
                "Need more than {} observations for time_step {}, got {}",
                self.time_step + 1,
                self.time_step,
                sequence.len()
            )));
        }

        // last start index is len - time_step - 2; the trailing pair is never emitted
        let count = self.pair_count(sequence.len());
        let mut inputs = Vec::with_capacity(count);
        let mut labels = Vec::with_capacity(count);

        for pair in sequence.windows(self.time_step + 1).take(count) {
            inputs.push(pair[..self.time_step].to_vec());
            labels.push(pair[self.time_step]);
        }

        log::trace!(
            "built {} windows of length {} from {} observations",
            count,
            self.time_step,
            sequence.len()
        );

        Ok(Windows {
            time_step: self.time_step,
            inputs,
            labels,
        })
    }
}
