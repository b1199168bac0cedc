//! End-to-end forecasting pipeline
//!
//! scale → split → window → train → score → roll → denormalize.
//! The scaler is fit exactly once per run and every later transform reuses
//! that state.

use crate::data::ObservationSeries;
use crate::error::{ForecastError, Result};
use crate::forecast::ForecastResult;
use crate::metrics::{evaluate, EvaluationReport};
use crate::predictor::{predict_column, SequencePredictor, TrainablePredictor, TrainingReport};
use crate::roller::{ForecastRoller, RollerConfig};
use crate::scaler::{ScalerFit, ScalerState};
use crate::split::split;
use crate::utils::future_timestamps;
use crate::window::{WindowBuilder, Windows};
use serde::{Deserialize, Serialize};

/// Shape of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Window length fed to the predictor
    pub time_step: usize,
    /// Share of the series used for training
    pub train_ratio: f64,
    /// Number of future steps to forecast
    pub pred_days: usize,
    /// Where the scaler bounds come from
    pub scaler_fit: ScalerFit,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            time_step: 15,
            train_ratio: 0.7,
            pred_days: 30,
            scaler_fit: ScalerFit::TrainOnly,
        }
    }
}

impl PipelineConfig {
    /// Check the settings before any data is touched
    pub fn validate(&self) -> Result<()> {
        if self.time_step == 0 {
            return Err(ForecastError::InvalidParameter(
                "time_step must be at least 1".to_string(),
            ));
        }
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            return Err(ForecastError::InvalidRatio(format!(
                "train_ratio must be in (0, 1), got {}",
                self.train_ratio
            )));
        }
        Ok(())
    }
}

/// Normalized splits and their windows
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// The run's only scaler state
    pub scaler: ScalerState,
    /// Normalized training split
    pub train: Vec<f64>,
    /// Normalized test split
    pub test: Vec<f64>,
    pub train_windows: Windows,
    pub test_windows: Windows,
}

impl PreparedData {
    /// The last `time_step` normalized test values
    pub fn seed_window(&self, time_step: usize) -> Result<&[f64]> {
        if time_step == 0 || self.test.len() < time_step {
            return Err(ForecastError::InsufficientData(format!(
                "Test split has {} values, seed needs {}",
                self.test.len(),
                time_step
            )));
        }

        Ok(&self.test[self.test.len() - time_step..])
    }
}

/// Result of a full pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    /// Forecast in original units
    pub forecast: ForecastResult,
    /// The same forecast in normalized space
    pub normalized_forecast: Vec<f64>,
    /// Present when the predictor was trained during the run
    pub training: Option<TrainingReport>,
    /// In-sample scores on the training windows
    pub train_scores: EvaluationReport,
    /// Scores on the test windows
    pub test_scores: EvaluationReport,
}

/// Composes scaling, splitting, windowing, training and rollout
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    roller: ForecastRoller,
}

impl Pipeline {
    /// Create a pipeline after validating its settings
    pub fn new(config: PipelineConfig, roller_config: RollerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            roller: ForecastRoller::new(roller_config),
        })
    }

    /// Get the pipeline settings
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fit the scaler, normalize, split and build windows for both splits
    pub fn prepare(&self, series: &ObservationSeries) -> Result<PreparedData> {
        let values = series.values();

        let (scaler, train, test) = match self.config.scaler_fit {
            ScalerFit::TrainOnly => {
                let (train_raw, test_raw) = split(values, self.config.train_ratio)?;
                let scaler = ScalerState::fit(&train_raw).map_err(|e| in_split("training", e))?;
                let train = scaler.normalize(&train_raw);
                let test = scaler.normalize(&test_raw);
                (scaler, train, test)
            }
            ScalerFit::FullSeries => {
                let scaler = ScalerState::fit(values)?;
                let (train, test) = split(&scaler.normalize(values), self.config.train_ratio)?;
                (scaler, train, test)
            }
        };

        log::info!(
            "scaler fit on {:?}: min {:.4}, max {:.4}",
            self.config.scaler_fit,
            scaler.min(),
            scaler.max()
        );
        log::info!("train split: {}, test split: {}", train.len(), test.len());

        let builder = WindowBuilder::new(self.config.time_step)?;
        let train_windows = builder.build(&train).map_err(|e| in_split("training", e))?;
        let test_windows = builder.build(&test).map_err(|e| in_split("test", e))?;

        log::info!(
            "windows: train [{}, {}, 1], test [{}, {}, 1]",
            train_windows.len(),
            self.config.time_step,
            test_windows.len(),
            self.config.time_step
        );

        Ok(PreparedData {
            scaler,
            train,
            test,
            train_windows,
            test_windows,
        })
    }

    /// Train the predictor, validating on the test windows
    pub fn train<P>(&self, prepared: &PreparedData, predictor: &mut P) -> Result<TrainingReport>
    where
        P: TrainablePredictor + ?Sized,
    {
        log::info!("training {}", predictor.name());
        predictor.fit(&prepared.train_windows, &prepared.test_windows)
    }

    /// Score the predictor on both splits in original units
    pub fn evaluate<P>(
        &self,
        prepared: &PreparedData,
        predictor: &P,
    ) -> Result<(EvaluationReport, EvaluationReport)>
    where
        P: SequencePredictor + ?Sized,
    {
        let train_scores = score(prepared, &prepared.train_windows, predictor)?;
        let test_scores = score(prepared, &prepared.test_windows, predictor)?;

        log::info!(
            "train rmse {:.4}, test rmse {:.4}",
            train_scores.rmse,
            test_scores.rmse
        );

        Ok((train_scores, test_scores))
    }

    /// Roll the predictor forward from the end of the test split
    ///
    /// Returns the normalized forecast and the denormalized result.
    pub fn forecast<P>(
        &self,
        prepared: &PreparedData,
        predictor: &P,
        series: &ObservationSeries,
    ) -> Result<(Vec<f64>, ForecastResult)>
    where
        P: SequencePredictor + ?Sized,
    {
        let seed = prepared.seed_window(self.config.time_step)?;
        let normalized = self.roller.roll(predictor, seed, self.config.pred_days)?;
        let values = prepared.scaler.denormalize(&normalized);

        let mut result = ForecastResult::new(values, self.config.pred_days)?;
        if let (Some(last), Some(interval)) = (series.last_timestamp(), series.interval()) {
            result = result.with_timestamps(future_timestamps(
                last,
                self.config.pred_days,
                interval,
            )?)?;
        }

        log::info!("forecast {} steps with {}", result.horizons(), predictor.name());

        Ok((normalized, result))
    }

    /// Prepare, train, score and forecast
    pub fn run<P>(&self, series: &ObservationSeries, predictor: &mut P) -> Result<PipelineOutput>
    where
        P: TrainablePredictor + ?Sized,
    {
        let prepared = self.prepare(series)?;
        let training = self.train(&prepared, predictor)?;
        self.finish(&prepared, &*predictor, series, Some(training))
    }

    /// Same as [`Pipeline::run`] for a predictor that is already trained
    pub fn run_trained<P>(&self, series: &ObservationSeries, predictor: &P) -> Result<PipelineOutput>
    where
        P: SequencePredictor + ?Sized,
    {
        let prepared = self.prepare(series)?;
        self.finish(&prepared, predictor, series, None)
    }

    fn finish<P>(
        &self,
        prepared: &PreparedData,
        predictor: &P,
        series: &ObservationSeries,
        training: Option<TrainingReport>,
    ) -> Result<PipelineOutput>
    where
        P: SequencePredictor + ?Sized,
    {
        let (train_scores, test_scores) = self.evaluate(prepared, predictor)?;
        let (normalized_forecast, forecast) = self.forecast(prepared, predictor, series)?;

        Ok(PipelineOutput {
            forecast,
            normalized_forecast,
            training,
            train_scores,
            test_scores,
        })
    }
}

fn score<P>(prepared: &PreparedData, windows: &Windows, predictor: &P) -> Result<EvaluationReport>
where
    P: SequencePredictor + ?Sized,
{
    let predicted = predict_column(predictor, &windows.to_batch()?)?;
    let actual = prepared.scaler.denormalize(windows.labels());
    evaluate(&actual, &prepared.scaler.denormalize(&predicted))
}

fn in_split(name: &str, error: ForecastError) -> ForecastError {
    match error {
        ForecastError::InsufficientData(msg) => {
            ForecastError::InsufficientData(format!("{} split: {}", name, msg))
        }
        ForecastError::DegenerateRange(msg) => {
            ForecastError::DegenerateRange(format!("{} split: {}", name, msg))
        }
        other => other,
    }
}
