//! Train (or load) a linear autoregressor on hourly closes and forecast ahead

use anyhow::{bail, Context, Result};
use chrono::{TimeZone, Utc};
use clap::Parser;
use std::path::PathBuf;
use window_forecast::config::{load_config, AppConfig, DEFAULT_CONFIG};
use window_forecast::models::LinearAutoRegressor;
use window_forecast::{
    DataLoader, ObservationSeries, Pipeline, PipelineOutput, SequencePredictor,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./config.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV dataset, overrides `dataset.path`
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Use N synthetic closes instead of a dataset
    #[arg(long, value_name = "N")]
    synthetic: Option<usize>,

    /// Step between synthetic closes (hourly, daily, weekly or minute)
    #[arg(long, default_value = "hourly")]
    frequency: String,

    /// Seed for the synthetic series
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Train even when a saved model exists
    #[arg(long, default_value_t = false)]
    retrain: bool,

    /// Print the run as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG);
        default.exists().then_some(default)
    });
    let config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("failed to load config from {}", path.display()),
        None => "failed to load config from the environment".to_string(),
    })?;

    let level = if config.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let series = load_series(&cli, &config)?;
    let pipeline = Pipeline::new(config.pipeline.clone(), config.rollout.roller_config())?;
    let output = run_model(&cli, &config, &pipeline, &series)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&output);
    }

    Ok(())
}

fn load_series(cli: &Cli, config: &AppConfig) -> Result<ObservationSeries> {
    if let Some(len) = cli.synthetic {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .context("invalid synthetic start time")?;
        let series = ObservationSeries::synthetic(len, start, &cli.frequency, cli.seed)?;

        log::info!("generated {} synthetic {} closes", len, cli.frequency);
        return Ok(series);
    }

    let Some(path) = cli.dataset.as_ref().or(config.dataset.path.as_ref()) else {
        bail!("no dataset given; pass --dataset, set dataset.path or use --synthetic");
    };

    DataLoader::from_csv(path, &config.dataset.options())
        .with_context(|| format!("failed to load dataset {}", path.display()))
}

fn run_model(
    cli: &Cli,
    config: &AppConfig,
    pipeline: &Pipeline,
    series: &ObservationSeries,
) -> Result<PipelineOutput> {
    let time_step = config.pipeline.time_step;
    let saved = config.model.path.as_ref().filter(|path| path.exists());

    if let (Some(path), false) = (saved, cli.retrain) {
        let model = LinearAutoRegressor::load(path)?;
        if model.time_step() != Some(time_step) {
            bail!(
                "{} was trained for time_step {:?}, pipeline uses {}; rerun with --retrain",
                path.display(),
                model.time_step(),
                time_step
            );
        }
        return Ok(pipeline.run_trained(series, &model)?);
    }

    let mut model =
        LinearAutoRegressor::new(time_step)?.with_params(config.model.training.clone())?;
    let output = pipeline.run(series, &mut model)?;

    if let Some(path) = &config.model.path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        model.save(path)?;
    }

    Ok(output)
}

fn print_report(output: &PipelineOutput) {
    if let Some(training) = &output.training {
        println!(
            "Training: {} epochs, best epoch {:?}, early stop: {}",
            training.epochs_run, training.best_epoch, training.stopped_early
        );
    }

    println!("\nTrain scores:");
    print!("{}", output.train_scores);
    println!("\nTest scores:");
    print!("{}", output.test_scores);
    println!();
    print!("{}", output.forecast);
}
