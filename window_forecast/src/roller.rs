//! Autoregressive multi-step forecasting
//!
//! A rollout keeps a buffer of the `time_step` most recent normalized values.
//! Each step feeds the buffer to the predictor, records the prediction, then
//! evicts the oldest value and appends the prediction. Step `i + 1` depends on
//! step `i`, so the loop is strictly sequential.

use crate::error::{ForecastError, Result};
use crate::predictor::{predict_column, Batch, SequencePredictor};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Bounds applied to a rollout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollerConfig {
    /// Largest horizon a caller may request
    pub max_steps: Option<usize>,
    /// Longest a single predictor call may take
    ///
    /// Checked once the call returns: a slow result counts as a failed
    /// attempt, but a call that never returns is not interrupted.
    pub call_timeout: Option<Duration>,
    /// Extra attempts for one failed predictor call
    pub max_retries: usize,
}

/// Fixed-length window of the most recent values, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct RolloutBuffer {
    values: VecDeque<f64>,
    capacity: usize,
}

impl RolloutBuffer {
    /// Copy `seed` into a new buffer whose length stays `seed.len()`
    pub fn seeded(seed: &[f64]) -> Result<Self> {
        if seed.is_empty() {
            return Err(ForecastError::InsufficientData(
                "Cannot seed a rollout with an empty window".to_string(),
            ));
        }

        if let Some(bad) = seed.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Seed window contains non-finite value {}",
                bad
            )));
        }

        Ok(Self {
            values: seed.iter().copied().collect(),
            capacity: seed.len(),
        })
    }

    /// Current length, always equal to the capacity
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Never true for a seeded buffer
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The fixed window length
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the buffer, oldest first
    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Reshape into a `[1, capacity, 1]` batch
    pub fn to_batch(&self) -> Result<Batch> {
        Batch::single(&self.to_vec())
    }

    /// Evict the oldest value and append `value`
    pub fn advance(&mut self, value: f64) {
        self.values.pop_front();
        self.values.push_back(value);
        debug_assert_eq!(self.values.len(), self.capacity);
    }
}

/// An in-progress rollout
///
/// Drive it with [`Rollout::step`] or run it to completion with
/// [`Rollout::finish`]. After any step fails the rollout is poisoned and
/// every later call fails too.
#[derive(Debug)]
pub struct Rollout<'a, P: ?Sized> {
    predictor: &'a P,
    config: &'a RollerConfig,
    buffer: RolloutBuffer,
    remaining: usize,
    forecast: Vec<f64>,
    failed: bool,
}

impl<'a, P> Rollout<'a, P>
where
    P: SequencePredictor + ?Sized,
{
    /// Steps still to run
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Check if every requested step has run
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// The current buffer
    pub fn buffer(&self) -> &RolloutBuffer {
        &self.buffer
    }

    /// Run one step, returning the new prediction or `None` when finished
    pub fn step(&mut self) -> Result<Option<f64>> {
        if self.failed {
            return Err(ForecastError::PredictionFailure(
                "Rollout already failed; its buffer can't be trusted".to_string(),
            ));
        }

        if self.remaining == 0 {
            return Ok(None);
        }

        let y_hat = match self.predict_next() {
            Ok(value) => value,
            Err(e) => {
                self.failed = true;
                return Err(e);
            }
        };

        self.forecast.push(y_hat);
        self.buffer.advance(y_hat);
        self.remaining -= 1;

        log::trace!(
            "rollout step {} -> {} ({} left)",
            self.forecast.len(),
            y_hat,
            self.remaining
        );

        Ok(Some(y_hat))
    }

    /// Run the remaining steps and hand back the whole forecast
    pub fn finish(mut self) -> Result<Vec<f64>> {
        while self.step()?.is_some() {}
        Ok(self.forecast)
    }

    fn predict_next(&self) -> Result<f64> {
        let step = self.forecast.len() + 1;
        let batch = self.buffer.to_batch()?;
        let attempts = self.config.max_retries + 1;
        let mut last_reason = String::new();

        for attempt in 1..=attempts {
            match self.call_once(&batch) {
                Ok(value) => return Ok(value),
                Err(reason) => {
                    if attempt < attempts {
                        log::warn!(
                            "predictor call for step {} failed (attempt {}/{}): {}",
                            step,
                            attempt,
                            attempts,
                            reason
                        );
                    }
                    last_reason = reason;
                }
            }
        }

        Err(ForecastError::PredictionFailure(format!(
            "step {} failed after {} attempt(s): {}",
            step, attempts, last_reason
        )))
    }

    fn call_once(&self, batch: &Batch) -> std::result::Result<f64, String> {
        let started = Instant::now();
        let outcome = predict_column(self.predictor, batch);
        let elapsed = started.elapsed();

        if let Some(limit) = self.config.call_timeout {
            if elapsed > limit {
                return Err(format!(
                    "{} took {:?}, limit is {:?}",
                    self.predictor.name(),
                    elapsed,
                    limit
                ));
            }
        }

        match outcome {
            Ok(values) => match values.as_slice() {
                [value] => Ok(*value),
                other => Err(format!("expected 1 value, got {}", other.len())),
            },
            Err(ForecastError::PredictionFailure(reason)) => Err(reason),
            Err(other) => Err(other.to_string()),
        }
    }
}

/// Rolls a predictor forward from a seed window
#[derive(Debug, Clone, Default)]
pub struct ForecastRoller {
    config: RollerConfig,
}

impl ForecastRoller {
    /// Create a roller with the given bounds
    pub fn new(config: RollerConfig) -> Self {
        Self { config }
    }

    /// The bounds in use
    pub fn config(&self) -> &RollerConfig {
        &self.config
    }

    /// Validate the inputs and set up a rollout without running any step
    pub fn start<'a, P>(
        &'a self,
        predictor: &'a P,
        seed_window: &[f64],
        steps: usize,
    ) -> Result<Rollout<'a, P>>
    where
        P: SequencePredictor + ?Sized,
    {
        if let Some(max_steps) = self.config.max_steps {
            if steps > max_steps {
                return Err(ForecastError::InvalidParameter(format!(
                    "Requested {} steps, at most {} allowed",
                    steps, max_steps
                )));
            }
        }

        if let Some(expected) = predictor.time_step() {
            if expected != seed_window.len() {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} expects windows of {}, seed has {}",
                    predictor.name(),
                    expected,
                    seed_window.len()
                )));
            }
        }

        let buffer = RolloutBuffer::seeded(seed_window)?;

        Ok(Rollout {
            predictor,
            config: &self.config,
            buffer,
            remaining: steps,
            forecast: Vec::with_capacity(steps),
            failed: false,
        })
    }

    /// Produce exactly `steps` normalized predictions
    ///
    /// Either every step succeeds or the call fails with `PredictionFailure`;
    /// no partial forecast is returned.
    pub fn roll<P>(&self, predictor: &P, seed_window: &[f64], steps: usize) -> Result<Vec<f64>>
    where
        P: SequencePredictor + ?Sized,
    {
        log::debug!(
            "rolling {} for {} steps from a seed of {}",
            predictor.name(),
            steps,
            seed_window.len()
        );

        self.start(predictor, seed_window, steps)?.finish()
    }
}
