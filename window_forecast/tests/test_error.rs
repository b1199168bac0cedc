use std::io;
use window_forecast::ForecastError;

#[test]
fn test_error_display() {
    let error = ForecastError::DegenerateRange("all values equal 5".to_string());
    assert_eq!(error.to_string(), "Degenerate range: all values equal 5");

    let error = ForecastError::InsufficientData("need 17, got 2".to_string());
    assert_eq!(error.to_string(), "Insufficient data: need 17, got 2");

    let error = ForecastError::InvalidRatio("got 1.5".to_string());
    assert_eq!(error.to_string(), "Invalid ratio: got 1.5");

    let error = ForecastError::PredictionFailure("step 3".to_string());
    assert_eq!(error.to_string(), "Prediction failure: step 3");
}

#[test]
fn test_error_conversions() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "missing");
    let error: ForecastError = io_error.into();
    assert!(matches!(error, ForecastError::IoError(_)));

    let json_error = serde_json::from_str::<Vec<f64>>("[1.0,").unwrap_err();
    let error: ForecastError = json_error.into();
    assert!(matches!(error, ForecastError::SerializationError(_)));

    let math_error = series_math::MathError::InsufficientData("empty".to_string());
    let error: ForecastError = math_error.into();
    assert!(matches!(error, ForecastError::MathError(_)));
    assert!(error.to_string().contains("empty"));
}
