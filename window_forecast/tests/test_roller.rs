use pretty_assertions::assert_eq;
use rstest::rstest;
use std::cell::Cell;
use std::time::Duration;
use window_forecast::error::Result;
use window_forecast::models::{LinearAutoRegressor, NaivePredictor};
use window_forecast::predictor::{Batch, SequencePredictor};
use window_forecast::roller::{ForecastRoller, RollerConfig, RolloutBuffer};
use window_forecast::ForecastError;

/// Predicts the oldest value in the window plus one
#[derive(Debug)]
struct OldestPlusOne;

impl SequencePredictor for OldestPlusOne {
    fn predict(&self, batch: &Batch) -> Result<Vec<Vec<f64>>> {
        Ok(batch.iter_samples().map(|s| vec![s[0] + 1.0]).collect())
    }

    fn name(&self) -> &str {
        "oldest + 1"
    }
}

/// Returns `[samples, 2]` instead of `[samples, 1]`
#[derive(Debug)]
struct WrongShape;

impl SequencePredictor for WrongShape {
    fn predict(&self, batch: &Batch) -> Result<Vec<Vec<f64>>> {
        Ok(vec![vec![0.5, 0.5]; batch.samples()])
    }

    fn name(&self) -> &str {
        "wrong shape"
    }
}

/// Succeeds for `good_calls` calls, then returns NaN or an error
#[derive(Debug)]
struct Failing {
    good_calls: usize,
    calls: Cell<usize>,
    nan: bool,
}

impl Failing {
    fn new(good_calls: usize, nan: bool) -> Self {
        Self {
            good_calls,
            calls: Cell::new(0),
            nan,
        }
    }
}

impl SequencePredictor for Failing {
    fn predict(&self, batch: &Batch) -> Result<Vec<Vec<f64>>> {
        let call = self.calls.get();
        self.calls.set(call + 1);

        if call < self.good_calls {
            return Ok(vec![vec![0.25]; batch.samples()]);
        }
        if self.nan {
            return Ok(vec![vec![f64::NAN]; batch.samples()]);
        }
        Err(ForecastError::ModelError("backend unavailable".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Fails every other call, starting with the first
#[derive(Debug, Default)]
struct Flaky {
    calls: Cell<usize>,
}

impl SequencePredictor for Flaky {
    fn predict(&self, batch: &Batch) -> Result<Vec<Vec<f64>>> {
        let call = self.calls.get();
        self.calls.set(call + 1);

        if call % 2 == 0 {
            return Err(ForecastError::ModelError("transient".to_string()));
        }
        Ok(vec![vec![batch.as_slice()[batch.time_steps() - 1] + 0.1]; batch.samples()])
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

#[derive(Debug)]
struct Slow;

impl SequencePredictor for Slow {
    fn predict(&self, batch: &Batch) -> Result<Vec<Vec<f64>>> {
        std::thread::sleep(Duration::from_millis(20));
        Ok(vec![vec![0.0]; batch.samples()])
    }

    fn name(&self) -> &str {
        "slow"
    }
}

#[test]
fn test_rollout_feeds_predictions_back_oldest_first() {
    let roller = ForecastRoller::default();
    let mut rollout = roller.start(&OldestPlusOne, &[1.0, 2.0, 3.0], 2).unwrap();

    assert_eq!(rollout.step().unwrap(), Some(2.0));
    assert_eq!(rollout.buffer().to_vec(), vec![2.0, 3.0, 2.0]);

    assert_eq!(rollout.step().unwrap(), Some(3.0));
    assert_eq!(rollout.buffer().to_vec(), vec![3.0, 2.0, 3.0]);

    assert!(rollout.is_finished());
    assert_eq!(rollout.step().unwrap(), None);

    let forecast = roller.roll(&OldestPlusOne, &[1.0, 2.0, 3.0], 2).unwrap();
    assert_eq!(forecast, vec![2.0, 3.0]);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(500)]
fn test_rollout_returns_exactly_steps_values(#[case] steps: usize) {
    let roller = ForecastRoller::default();
    let seed = [0.1, 0.4, 0.3, 0.8];

    let forecast = roller.roll(&NaivePredictor::new(), &seed, steps).unwrap();
    assert_eq!(forecast.len(), steps);
    assert!(forecast.iter().all(|v| *v == 0.8));
}

#[test]
fn test_buffer_length_never_changes() {
    let roller = ForecastRoller::default();
    let seed = [0.2, 0.4, 0.6, 0.8, 1.0];
    let mut rollout = roller.start(&OldestPlusOne, &seed, 25).unwrap();

    while rollout.step().unwrap().is_some() {
        assert_eq!(rollout.buffer().len(), seed.len());
    }
    assert_eq!(rollout.remaining(), 0);
}

#[test]
fn test_buffer_advance_evicts_oldest() {
    let mut buffer = RolloutBuffer::seeded(&[1.0, 2.0, 3.0]).unwrap();
    buffer.advance(9.0);

    assert_eq!(buffer.to_vec(), vec![2.0, 3.0, 9.0]);
    assert_eq!(buffer.capacity(), 3);
    assert_eq!(buffer.to_batch().unwrap().shape(), [1, 3, 1]);
}

#[test]
fn test_wrong_shape_fails_without_partial_forecast() {
    let roller = ForecastRoller::default();
    let result = roller.roll(&WrongShape, &[0.1, 0.2, 0.3], 5);

    assert!(matches!(result, Err(ForecastError::PredictionFailure(_))));
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_failure_mid_rollout_discards_forecast(#[case] nan: bool) {
    let roller = ForecastRoller::default();
    let predictor = Failing::new(3, nan);

    let result = roller.roll(&predictor, &[0.1, 0.2, 0.3], 10);
    assert!(matches!(result, Err(ForecastError::PredictionFailure(_))));
    assert_eq!(predictor.calls.get(), 4);
}

#[test]
fn test_failed_rollout_stays_failed() {
    let roller = ForecastRoller::default();
    let predictor = Failing::new(1, false);
    let mut rollout = roller.start(&predictor, &[0.1, 0.2], 5).unwrap();

    assert_eq!(rollout.step().unwrap(), Some(0.25));
    assert!(rollout.step().is_err());
    assert!(matches!(
        rollout.step(),
        Err(ForecastError::PredictionFailure(_))
    ));
}

#[test]
fn test_retry_recovers_without_advancing_twice() {
    let roller = ForecastRoller::new(RollerConfig {
        max_retries: 1,
        ..RollerConfig::default()
    });
    let predictor = Flaky::default();

    let forecast = roller.roll(&predictor, &[0.0, 0.5, 1.0], 3).unwrap();

    assert_eq!(forecast.len(), 3);
    assert_eq!(predictor.calls.get(), 6);
    assert!((forecast[0] - 1.1).abs() < 1e-12);
    assert!((forecast[2] - 1.3).abs() < 1e-12);
}

#[test]
fn test_no_retries_by_default() {
    let roller = ForecastRoller::default();
    let result = roller.roll(&Flaky::default(), &[0.0, 0.5, 1.0], 3);

    assert!(matches!(result, Err(ForecastError::PredictionFailure(_))));
}

#[test]
fn test_slow_call_exceeds_timeout() {
    let roller = ForecastRoller::new(RollerConfig {
        call_timeout: Some(Duration::from_millis(1)),
        ..RollerConfig::default()
    });

    let result = roller.roll(&Slow, &[0.0, 1.0], 1);
    assert!(matches!(result, Err(ForecastError::PredictionFailure(_))));
}

#[test]
fn test_max_steps_is_enforced() {
    let roller = ForecastRoller::new(RollerConfig {
        max_steps: Some(10),
        ..RollerConfig::default()
    });

    assert!(roller.roll(&NaivePredictor::new(), &[0.5, 0.6], 10).is_ok());
    assert!(matches!(
        roller.roll(&NaivePredictor::new(), &[0.5, 0.6], 11),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_seed_must_match_predictor_time_step() {
    let roller = ForecastRoller::default();
    let model = LinearAutoRegressor::new(4).unwrap();

    let result = roller.roll(&model, &[0.1, 0.2, 0.3], 2);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_seed_must_be_usable() {
    let roller = ForecastRoller::default();

    assert!(matches!(
        roller.roll(&NaivePredictor::new(), &[], 2),
        Err(ForecastError::InsufficientData(_))
    ));
    assert!(matches!(
        roller.roll(&NaivePredictor::new(), &[0.1, f64::INFINITY], 2),
        Err(ForecastError::DataError(_))
    ));
}
