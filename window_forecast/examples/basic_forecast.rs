use window_forecast::models::{LinearAutoRegressor, NaivePredictor};
use window_forecast::pipeline::{Pipeline, PipelineConfig};
use window_forecast::roller::RollerConfig;
use window_forecast::utils::random_walk;
use window_forecast::ObservationSeries;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Window Forecast: Basic Forecasting Example");
    println!("==========================================\n");

    // Two weeks of synthetic hourly closes
    let prices = random_walk(24 * 14, 42_000.0, 0.008, 2024)?;
    let series = ObservationSeries::new(prices)?;
    println!("Sample data created: {} hourly closes\n", series.len());

    let config = PipelineConfig {
        time_step: 15,
        train_ratio: 0.7,
        pred_days: 12,
        ..PipelineConfig::default()
    };
    let pipeline = Pipeline::new(config, RollerConfig::default())?;

    // Baseline first
    let mut naive = NaivePredictor::new();
    let baseline = pipeline.run(&series, &mut naive)?;
    println!("Naive baseline test RMSE: {:.2}", baseline.test_scores.rmse);

    // Linear autoregressor trained on the windows
    let mut model = LinearAutoRegressor::new(15)?;
    let output = pipeline.run(&series, &mut model)?;

    if let Some(training) = &output.training {
        println!(
            "Linear AR trained for {} epochs (best epoch {:?})",
            training.epochs_run, training.best_epoch
        );
    }
    println!("Linear AR test RMSE:      {:.2}\n", output.test_scores.rmse);

    println!("Test scores:");
    print!("{}", output.test_scores);
    println!();
    print!("{}", output.forecast);

    Ok(())
}
