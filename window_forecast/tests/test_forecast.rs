use assert_approx_eq::assert_approx_eq;
use chrono::{Duration, TimeZone, Utc};
use window_forecast::utils::future_timestamps;
use window_forecast::{ForecastError, ForecastResult};

#[test]
fn test_forecast_result_accessors() {
    let forecast = ForecastResult::new(vec![101.0, 102.5, 103.0], 3).unwrap();

    assert_eq!(forecast.values(), &[101.0, 102.5, 103.0]);
    assert_eq!(forecast.horizons(), 3);
    assert!(forecast.timestamps().is_none());

    let mae = forecast.mean_absolute_error(&[100.0, 103.0, 103.0]).unwrap();
    assert_approx_eq!(mae, 0.5);
}

#[test]
fn test_forecast_result_length_checks() {
    assert!(matches!(
        ForecastResult::new(vec![1.0, 2.0], 3),
        Err(ForecastError::DataError(_))
    ));

    let last = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let forecast = ForecastResult::new(vec![1.0, 2.0], 2).unwrap();
    let too_few = future_timestamps(last, 1, Duration::hours(1)).unwrap();
    assert!(forecast.with_timestamps(too_few).is_err());
}

#[test]
fn test_forecast_result_output() {
    let last = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let forecast = ForecastResult::new(vec![64_000.0, 64_100.0], 2)
        .unwrap()
        .with_timestamps(future_timestamps(last, 2, Duration::hours(1)).unwrap())
        .unwrap();

    let table = forecast.to_string();
    assert!(table.contains("Forecast (2 steps)"));
    assert!(table.contains("2024-05-01 13:00"));
    assert!(table.contains("64100.00"));

    let json: serde_json::Value = serde_json::from_str(&forecast.to_json().unwrap()).unwrap();
    assert_eq!(json["horizons"], 2);
    assert_eq!(json["values"][1], 64_100.0);
    assert!(json["timestamps"][0].as_str().unwrap().starts_with("2024-05-01T13:00:00"));
}
