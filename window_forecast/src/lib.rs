//! # Window Forecast
//!
//! Windowed autoregressive forecasting of univariate price series, built for
//! hourly BTC closes but usable with any ordered series.
//!
//! ## Features
//!
//! - Min-max scaling with a single, reusable scaler state
//! - Supervised window construction and chronological train/test splits
//! - A predictor capability trait, with naive, linear-trend and linear
//!   autoregressive reference models
//! - Multi-step rollout that feeds each prediction back into the window
//! - CSV loading, evaluation reports and a `btc_forecast` command line tool
//!
//! ## Quick Start
//!
//! ```rust
//! use window_forecast::models::LinearAutoRegressor;
//! use window_forecast::pipeline::{Pipeline, PipelineConfig};
//! use window_forecast::roller::RollerConfig;
//! use window_forecast::utils::random_walk;
//! use window_forecast::ObservationSeries;
//!
//! // Synthetic hourly closes
//! let series = ObservationSeries::new(random_walk(500, 30_000.0, 0.01, 7)?)?;
//!
//! let config = PipelineConfig {
//!     time_step: 15,
//!     pred_days: 10,
//!     ..PipelineConfig::default()
//! };
//! let pipeline = Pipeline::new(config, RollerConfig::default())?;
//!
//! let mut model = LinearAutoRegressor::new(15)?;
//! let output = pipeline.run(&series, &mut model)?;
//!
//! assert_eq!(output.forecast.values().len(), 10);
//! # Ok::<(), window_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod predictor;
pub mod roller;
pub mod scaler;
pub mod split;
pub mod utils;
pub mod window;

// Re-export commonly used types
pub use crate::data::{DataLoader, DatasetOptions, ObservationSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::forecast::ForecastResult;
pub use crate::pipeline::{Pipeline, PipelineConfig, PipelineOutput};
pub use crate::predictor::{Batch, SequencePredictor, TrainablePredictor, TrainingReport};
pub use crate::roller::{ForecastRoller, RollerConfig};
pub use crate::scaler::{ScalerFit, ScalerState};
pub use crate::window::{WindowBuilder, Windows};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
