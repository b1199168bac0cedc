use assert_approx_eq::assert_approx_eq;
use std::fs;
use std::io::Write;
use tempfile::tempdir;
use window_forecast::config::load_config;
use window_forecast::models::{LinearAutoRegressor, NaivePredictor};
use window_forecast::utils::random_walk;
use window_forecast::{DataLoader, Pipeline};

// 2024-01-01T00:00:00Z in epoch milliseconds
const START_MS: i64 = 1_704_067_200_000;
const HOUR_MS: i64 = 3_600_000;

#[test]
fn test_csv_to_forecast_with_saved_model() {
    let dir = tempdir().unwrap();
    let data_path = dir.path().join("btcusdt_1h.csv");
    let model_path = dir.path().join("model.json");
    let config_path = dir.path().join("config.yaml");

    let closes = random_walk(400, 42_000.0, 0.01, 99).unwrap();
    let mut file = fs::File::create(&data_path).unwrap();
    writeln!(file, "open_time,close").unwrap();
    for (i, close) in closes.iter().enumerate() {
        writeln!(file, "{},{}", START_MS + i as i64 * HOUR_MS, close).unwrap();
    }
    drop(file);

    fs::write(
        &config_path,
        format!(
            "dataset:\n  path: {}\npipeline:\n  time_step: 12\n  pred_days: 24\nrollout:\n  max_steps: 48\nmodel:\n  path: {}\n  training:\n    epochs: 30\n",
            data_path.display(),
            model_path.display()
        ),
    )
    .unwrap();

    let config = load_config(Some(config_path.as_path())).unwrap();
    let series = DataLoader::from_csv(
        config.dataset.path.as_ref().unwrap(),
        &config.dataset.options(),
    )
    .unwrap();
    assert_eq!(series.len(), 400);

    let pipeline = Pipeline::new(config.pipeline.clone(), config.rollout.roller_config()).unwrap();

    let mut model = LinearAutoRegressor::new(12)
        .unwrap()
        .with_params(config.model.training.clone())
        .unwrap();
    let trained = pipeline.run(&series, &mut model).unwrap();

    assert_eq!(trained.forecast.values().len(), 24);
    assert!(trained.forecast.values().iter().all(|v| v.is_finite()));
    assert_eq!(trained.forecast.timestamps().unwrap().len(), 24);
    assert!(trained.training.as_ref().unwrap().epochs_run <= 30);

    model.save(config.model.path.as_ref().unwrap()).unwrap();
    let loaded = LinearAutoRegressor::load(&model_path).unwrap();
    let reloaded = pipeline.run_trained(&series, &loaded).unwrap();

    for (a, b) in trained
        .forecast
        .values()
        .iter()
        .zip(reloaded.forecast.values())
    {
        assert_approx_eq!(*a, *b, 1e-6);
    }
    assert_approx_eq!(trained.test_scores.rmse, reloaded.test_scores.rmse, 1e-6);

    let json = serde_json::to_string(&reloaded).unwrap();
    assert!(json.contains("\"forecast\""));
    assert!(json.contains("\"test_scores\""));
}

#[test]
fn test_baseline_comparison_on_same_split() {
    let series =
        window_forecast::ObservationSeries::new(random_walk(300, 30_000.0, 0.005, 3).unwrap())
            .unwrap();
    let pipeline = Pipeline::new(Default::default(), Default::default()).unwrap();

    let naive = pipeline.run(&series, &mut NaivePredictor::new()).unwrap();
    let mut model = LinearAutoRegressor::new(15).unwrap();
    let linear = pipeline.run(&series, &mut model).unwrap();

    assert_eq!(naive.test_scores.samples, linear.test_scores.samples);
    assert_eq!(naive.forecast.values().len(), 30);
    assert_eq!(linear.forecast.values().len(), 30);
}
