//! Utility functions for the window_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

/// Parse a timestamp cell
///
/// Accepts epoch milliseconds, RFC 3339, `%Y-%m-%d %H:%M:%S` and `%Y-%m-%d`.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(millis) = raw.parse::<i64>() {
        return Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
            ForecastError::DataError(format!("Epoch milliseconds out of range: {}", millis))
        });
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    if let Some(naive) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    Err(ForecastError::DataError(format!(
        "Unrecognised timestamp: {:?}",
        raw
    )))
}

/// Map a frequency name to a step length
pub fn parse_interval(frequency: &str) -> Result<Duration> {
    match frequency {
        "daily" | "d" | "1d" => Ok(Duration::days(1)),
        "weekly" | "w" | "1w" => Ok(Duration::weeks(1)),
        "hourly" | "h" | "1h" => Ok(Duration::hours(1)),
        "minute" | "min" | "1min" | "1m" => Ok(Duration::minutes(1)),
        _ => Err(ForecastError::InvalidParameter(format!(
            "Unsupported frequency: {}",
            frequency
        ))),
    }
}

/// Timestamps for the `horizon` steps following `last_timestamp`
pub fn future_timestamps(
    last_timestamp: DateTime<Utc>,
    horizon: usize,
    interval: Duration,
) -> Result<Vec<DateTime<Utc>>> {
    if interval <= Duration::zero() {
        return Err(ForecastError::InvalidParameter(format!(
            "Interval must be positive, got {}",
            interval
        )));
    }

    let mut timestamps = Vec::with_capacity(horizon);
    let mut current = last_timestamp;

    for _ in 0..horizon {
        current += interval;
        timestamps.push(current);
    }

    Ok(timestamps)
}

/// Deterministic geometric random walk
///
/// Each step multiplies the price by `1 + r`, `r ~ N(0, volatility)`.
/// Prices never drop below 1% of `start`.
pub fn random_walk(len: usize, start: f64, volatility: f64, seed: u64) -> Result<Vec<f64>> {
    if !(start.is_finite() && start > 0.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "Start price must be positive, got {}",
            start
        )));
    }

    let normal = Normal::new(0.0, volatility)
        .map_err(|e| ForecastError::InvalidParameter(format!("Bad volatility: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(seed);
    let floor = start * 0.01;

    let mut price = start;
    let mut prices = Vec::with_capacity(len);
    for _ in 0..len {
        prices.push(price);
        let r: f64 = rng.sample(normal);
        price = (price * (1.0 + r)).max(floor);
    }

    Ok(prices)
}
