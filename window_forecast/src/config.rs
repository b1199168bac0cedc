//! Application configuration
//!
//! Settings come from an optional YAML/TOML/JSON file, then from
//! `BTC_FORECAST__<SECTION>__<KEY>` environment variables, e.g.
//! `BTC_FORECAST__PIPELINE__TIME_STEP=30`.

use crate::data::DatasetOptions;
use crate::error::{ForecastError, Result};
use crate::models::TrainingParams;
use crate::pipeline::PipelineConfig;
use crate::roller::RollerConfig;
use chrono::{DateTime, Utc};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG: &str = "config.yaml";
pub const ENV_PREFIX: &str = "BTC_FORECAST";

/// Top-level settings for the `btc_forecast` binary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub pipeline: PipelineConfig,
    pub rollout: RolloutConfig,
    pub model: ModelConfig,
    pub verbose: bool,
}

/// Where the observations come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// CSV file with a header row
    pub path: Option<PathBuf>,
    pub time_column: Option<String>,
    pub value_column: String,
    /// Drop observations at or before this instant
    pub since: Option<DateTime<Utc>>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        let options = DatasetOptions::default();
        Self {
            path: None,
            time_column: options.time_column,
            value_column: options.value_column,
            since: options.since,
        }
    }
}

impl DatasetConfig {
    /// Loader options for this dataset
    pub fn options(&self) -> DatasetOptions {
        DatasetOptions {
            time_column: self.time_column.clone(),
            value_column: self.value_column.clone(),
            since: self.since,
        }
    }
}

/// Rollout guards, with the timeout in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolloutConfig {
    pub max_steps: Option<usize>,
    pub call_timeout_ms: Option<u64>,
    pub max_retries: usize,
}

impl RolloutConfig {
    pub fn roller_config(&self) -> RollerConfig {
        RollerConfig {
            max_steps: self.max_steps,
            call_timeout: self.call_timeout_ms.map(Duration::from_millis),
            max_retries: self.max_retries,
        }
    }
}

/// Model persistence and training settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Saved model; loaded when present, written after training otherwise
    pub path: Option<PathBuf>,
    pub training: TrainingParams,
}

impl AppConfig {
    /// Check every section before the pipeline runs
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        self.model.training.validate()?;

        if self.dataset.value_column.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "dataset.value_column must not be empty".to_string(),
            ));
        }

        if let Some(max_steps) = self.rollout.max_steps {
            if self.pipeline.pred_days > max_steps {
                return Err(ForecastError::InvalidParameter(format!(
                    "pipeline.pred_days ({}) exceeds rollout.max_steps ({})",
                    self.pipeline.pred_days, max_steps
                )));
            }
        }

        Ok(())
    }
}

/// Load settings from `path` (if given) and the environment
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path));
    }

    let settings = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = settings.try_deserialize::<AppConfig>()?;
    config.validate()?;

    log::debug!("loaded configuration: {:?}", config);

    Ok(config)
}
