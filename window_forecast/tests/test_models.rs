use assert_approx_eq::assert_approx_eq;
use std::fs;
use tempfile::tempdir;
use window_forecast::models::{
    LinearAutoRegressor, LinearTrendPredictor, NaivePredictor, TrainingParams,
};
use window_forecast::predictor::{predict_column, Batch, SequencePredictor, TrainablePredictor};
use window_forecast::window::{WindowBuilder, Windows};
use window_forecast::ForecastError;

fn sine_windows(len: usize, time_step: usize) -> (Windows, Windows) {
    let sequence: Vec<f64> = (0..len)
        .map(|i| 0.5 + 0.4 * (i as f64 * 0.2).sin())
        .collect();
    let cut = len * 7 / 10;
    let builder = WindowBuilder::new(time_step).unwrap();

    (
        builder.build(&sequence[..cut]).unwrap(),
        builder.build(&sequence[cut..]).unwrap(),
    )
}

#[test]
fn test_naive_predictor_repeats_last_value() {
    let batch = Batch::from_windows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
    let output = NaivePredictor::new().predict(&batch).unwrap();

    assert_eq!(output, vec![vec![3.0], vec![6.0]]);
}

#[test]
fn test_linear_trend_predictor_extends_line() {
    let predictor = LinearTrendPredictor::new();

    let batch = Batch::single(&[1.0, 2.0, 3.0]).unwrap();
    let output = predict_column(&predictor, &batch).unwrap();
    assert_approx_eq!(output[0], 4.0);

    let single = Batch::single(&[5.0]).unwrap();
    assert_eq!(predict_column(&predictor, &single).unwrap(), vec![5.0]);
}

#[test]
fn test_untrainable_predictors_report_no_epochs() {
    let (train, validation) = sine_windows(60, 5);

    let report = NaivePredictor::new().fit(&train, &validation).unwrap();
    assert_eq!(report.epochs_run, 0);
    assert!(report.history.is_empty());

    let report = LinearTrendPredictor::new().fit(&train, &validation).unwrap();
    assert_eq!(report.epochs_run, 0);
}

#[test]
fn test_autoregressor_starts_as_moving_average() {
    let model = LinearAutoRegressor::new(4).unwrap();

    assert_eq!(model.weights(), &[0.25; 4]);
    assert_eq!(model.bias(), 0.0);
    assert!(!model.is_trained());
    assert_eq!(model.time_step(), Some(4));

    let batch = Batch::single(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_approx_eq!(predict_column(&model, &batch).unwrap()[0], 2.5);
}

#[test]
fn test_autoregressor_training_report() {
    let (train, validation) = sine_windows(200, 6);
    let params = TrainingParams {
        epochs: 40,
        patience: 40,
        ..TrainingParams::default()
    };
    let mut model = LinearAutoRegressor::new(6).unwrap().with_params(params).unwrap();

    let report = model.fit(&train, &validation).unwrap();

    assert!(model.is_trained());
    assert!(report.epochs_run >= 1 && report.epochs_run <= 40);
    assert_eq!(report.history.len(), report.epochs_run);
    assert!(report.best_epoch.is_some());

    let best = report.best_validation_loss.unwrap();
    let first = report.history[0].validation_loss.unwrap();
    assert!(best <= first);
    assert!(report
        .history
        .iter()
        .all(|epoch| epoch.validation_loss.unwrap() >= best));
}

#[test]
fn test_autoregressor_monitors_train_loss_without_validation() {
    let (train, _) = sine_windows(100, 3);
    let empty_validation = Windows::empty(3);
    let params = TrainingParams {
        epochs: 5,
        ..TrainingParams::default()
    };
    let mut model = LinearAutoRegressor::new(3).unwrap().with_params(params).unwrap();

    let report = model.fit(&train, &empty_validation).unwrap();
    assert!(report.history.iter().all(|e| e.validation_loss.is_none()));
    assert!(report.best_validation_loss.is_none());
    assert!(report.best_epoch.is_some());
}

#[test]
fn test_autoregressor_rejects_mismatched_windows() {
    let (train, validation) = sine_windows(80, 5);
    let mut model = LinearAutoRegressor::new(4).unwrap();

    assert!(matches!(
        model.fit(&train, &validation),
        Err(ForecastError::ModelError(_))
    ));

    let batch = Batch::single(&[0.1, 0.2, 0.3]).unwrap();
    assert!(matches!(
        model.predict(&batch),
        Err(ForecastError::ModelError(_))
    ));
    assert!(matches!(
        predict_column(&model, &batch),
        Err(ForecastError::PredictionFailure(_))
    ));
}

#[test]
fn test_invalid_training_params() {
    let params = TrainingParams {
        learning_rate: 0.0,
        ..TrainingParams::default()
    };
    assert!(matches!(
        LinearAutoRegressor::new(3).unwrap().with_params(params),
        Err(ForecastError::InvalidParameter(_))
    ));

    let params = TrainingParams {
        batch_size: 0,
        ..TrainingParams::default()
    };
    assert!(params.validate().is_err());

    assert!(LinearAutoRegressor::new(0).is_err());
}

#[test]
fn test_autoregressor_save_and_load() {
    let (train, validation) = sine_windows(120, 5);
    let params = TrainingParams {
        epochs: 10,
        ..TrainingParams::default()
    };
    let mut model = LinearAutoRegressor::new(5).unwrap().with_params(params).unwrap();
    model.fit(&train, &validation).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    model.save(&path).unwrap();

    let loaded = LinearAutoRegressor::load(&path).unwrap();
    assert!(loaded.is_trained());
    assert_eq!(loaded.time_step(), Some(5));
    assert_eq!(loaded.params(), model.params());
    for (a, b) in loaded.weights().iter().zip(model.weights()) {
        assert_approx_eq!(*a, *b, 1e-12);
    }
    assert_approx_eq!(loaded.bias(), model.bias(), 1e-12);
}

#[test]
fn test_load_rejects_inconsistent_model_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(
        &path,
        r#"{"name":"broken","time_step":3,"weights":[0.1,0.2],"bias":0.0,"params":{},"trained":true}"#,
    )
    .unwrap();

    assert!(matches!(
        LinearAutoRegressor::load(&path),
        Err(ForecastError::ModelError(_))
    ));

    assert!(matches!(
        LinearAutoRegressor::load(dir.path().join("missing.json")),
        Err(ForecastError::IoError(_))
    ));

    fs::write(&path, "not json").unwrap();
    assert!(matches!(
        LinearAutoRegressor::load(&path),
        Err(ForecastError::SerializationError(_))
    ));
}
