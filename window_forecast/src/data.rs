//! Observation series and CSV loading

use crate::error::{ForecastError, Result};
use crate::utils::{future_timestamps, parse_interval, parse_timestamp, random_walk};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Ordered observations, one per time step
///
/// Immutable once built. Values are finite; timestamps, when present, are
/// strictly increasing and line up one-to-one with the values.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSeries {
    values: Vec<f64>,
    timestamps: Option<Vec<DateTime<Utc>>>,
}

impl ObservationSeries {
    /// Create a series without timestamps
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if let Some((i, bad)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Observation {} is not finite: {}",
                i, bad
            )));
        }

        Ok(Self {
            values,
            timestamps: None,
        })
    }

    /// Create a series with one timestamp per value
    pub fn with_timestamps(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Got {} timestamps for {} values",
                timestamps.len(),
                values.len()
            )));
        }

        if let Some(pair) = timestamps.windows(2).find(|pair| pair[1] <= pair[0]) {
            return Err(ForecastError::DataError(format!(
                "Timestamps must be strictly increasing: {} is followed by {}",
                pair[0], pair[1]
            )));
        }

        let mut series = Self::new(values)?;
        series.timestamps = Some(timestamps);
        Ok(series)
    }

    /// The observed values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The timestamps, if available
    pub fn timestamps(&self) -> Option<&[DateTime<Utc>]> {
        self.timestamps.as_deref()
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Timestamp of the first observation
    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.as_ref().and_then(|ts| ts.first().copied())
    }

    /// Timestamp of the last observation
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.as_ref().and_then(|ts| ts.last().copied())
    }

    /// Sampling interval taken from the last two timestamps
    pub fn interval(&self) -> Option<Duration> {
        match self.timestamps.as_deref() {
            Some([.., before, last]) => Some(*last - *before),
            _ => None,
        }
    }

    /// Keep only observations strictly after `cutoff`
    pub fn since(&self, cutoff: DateTime<Utc>) -> Result<Self> {
        let timestamps = self.timestamps.as_ref().ok_or_else(|| {
            ForecastError::DataError("Cannot filter a series without timestamps".to_string())
        })?;

        let start = timestamps.partition_point(|ts| *ts <= cutoff);

        Ok(Self {
            values: self.values[start..].to_vec(),
            timestamps: Some(timestamps[start..].to_vec()),
        })
    }

    /// Seeded random-walk closes starting at 30 000, one per `frequency` step
    ///
    /// `frequency` is any name [`parse_interval`] accepts; the first
    /// observation is stamped `start`.
    pub fn synthetic(
        len: usize,
        start: DateTime<Utc>,
        frequency: &str,
        seed: u64,
    ) -> Result<Self> {
        let interval = parse_interval(frequency)?;
        let values = random_walk(len, 30_000.0, 0.01, seed)?;

        let mut timestamps = Vec::with_capacity(len);
        if len > 0 {
            timestamps.push(start);
            timestamps.extend(future_timestamps(start, len - 1, interval)?);
        }

        Self::with_timestamps(timestamps, values)
    }
}

/// Which CSV columns to read and which rows to keep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetOptions {
    /// Column holding the observation time; `None` for untimed data
    pub time_column: Option<String>,
    /// Column holding the observed value
    pub value_column: String,
    /// Drop observations at or before this instant
    pub since: Option<DateTime<Utc>>,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            time_column: Some("open_time".to_string()),
            value_column: "close".to_string(),
            since: None,
        }
    }
}

/// Data loader for observation series
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load an observation series from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P, options: &DatasetOptions) -> Result<ObservationSeries> {
        let file = File::open(path.as_ref())?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        let value_index = Self::column_index(&headers, &options.value_column)?;
        let time_index = options
            .time_column
            .as_deref()
            .map(|name| Self::column_index(&headers, name))
            .transpose()?;

        let mut values = Vec::new();
        let mut timestamps = Vec::new();

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            // header is line 1
            let line = row + 2;

            let raw = record.get(value_index).unwrap_or_default();
            let value = raw.parse::<f64>().map_err(|e| {
                ForecastError::DataError(format!(
                    "Line {}: cannot parse {:?} in column '{}': {}",
                    line, raw, options.value_column, e
                ))
            })?;
            values.push(value);

            if let Some(index) = time_index {
                let raw = record.get(index).unwrap_or_default();
                let ts = parse_timestamp(raw).map_err(|e| {
                    ForecastError::DataError(format!("Line {}: {}", line, e))
                })?;
                timestamps.push(ts);
            }
        }

        let mut series = if time_index.is_some() {
            ObservationSeries::with_timestamps(timestamps, values)?
        } else {
            ObservationSeries::new(values)?
        };

        log::info!(
            "loaded {} observations from {}",
            series.len(),
            path.as_ref().display()
        );

        if let Some(cutoff) = options.since {
            series = series.since(cutoff)?;
            log::info!("{} observations after {}", series.len(), cutoff);
        }

        if let (Some(first), Some(last)) = (series.first_timestamp(), series.last_timestamp()) {
            log::info!("date range: {} .. {}", first, last);
        }

        Ok(series)
    }

    fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Column '{}' not found; available: {}",
                    name,
                    headers.iter().collect::<Vec<_>>().join(", ")
                ))
            })
    }
}
