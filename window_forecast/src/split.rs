//! Chronological train/test split

use crate::error::{ForecastError, Result};

/// Split `sequence` into a training prefix and a testing suffix
///
/// `train_size = floor(len * train_ratio)`. Nothing is shuffled, so every
/// training observation precedes every test observation.
pub fn split(sequence: &[f64], train_ratio: f64) -> Result<(Vec<f64>, Vec<f64>)> {
    let train_size = train_size(sequence.len(), train_ratio)?;

    Ok((
        sequence[..train_size].to_vec(),
        sequence[train_size..].to_vec(),
    ))
}

/// Size of the training prefix for a sequence of `len` values
pub fn train_size(len: usize, train_ratio: f64) -> Result<usize> {
    if !(train_ratio > 0.0 && train_ratio < 1.0) {
        return Err(ForecastError::InvalidRatio(format!(
            "train_ratio must be in (0, 1), got {}",
            train_ratio
        )));
    }

    Ok((len as f64 * train_ratio).floor() as usize)
}
