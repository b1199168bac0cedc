// This program walks through each stage of the forecasting pipeline
use btc_forecast_workspace::series_math::LinearTrend;
use btc_forecast_workspace::window_forecast::models::NaivePredictor;
use btc_forecast_workspace::window_forecast::roller::{ForecastRoller, RollerConfig};
use btc_forecast_workspace::window_forecast::split::split;
use btc_forecast_workspace::window_forecast::utils::random_walk;
use btc_forecast_workspace::window_forecast::{ScalerState, WindowBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Exploring the BTC forecast workspace\n");

    for (name, version) in btc_forecast_workspace::versions() {
        println!("{} {}", name, version);
    }

    let closes = random_walk(48, 42_000.0, 0.01, 1)?;

    println!("\n=== Split ===");
    let (train, test) = split(&closes, 0.7)?;
    println!("train: {} closes, test: {} closes", train.len(), test.len());

    println!("\n=== Scale ===");
    let scaler = ScalerState::fit(&train)?;
    println!("min {:.2}, max {:.2}", scaler.min(), scaler.max());
    let train = scaler.normalize(&train);
    let test = scaler.normalize(&test);

    println!("\n=== Window ===");
    let builder = WindowBuilder::new(6)?;
    let windows = builder.build(&train)?;
    println!("{} windows of {}", windows.len(), builder.time_step());
    if let Some((input, label)) = windows.iter().next() {
        println!("first window {:?} -> {:.4}", input, label);
    }

    println!("\n=== Trend of the test split ===");
    let trend = LinearTrend::fit(&test)?;
    println!("slope {:.5} per step, r2 {:.3}", trend.slope(), trend.r_squared()?);

    println!("\n=== Rollout ===");
    let roller = ForecastRoller::new(RollerConfig::default());
    let seed = &test[test.len() - 6..];
    let forecast = roller.roll(&NaivePredictor::new(), seed, 5)?;
    println!("{:?}", scaler.denormalize(&forecast));

    println!("\nDone exploring");
    Ok(())
}
