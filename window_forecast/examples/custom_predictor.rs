//! Plugging a hand-written predictor into the rollout

use window_forecast::error::Result;
use window_forecast::predictor::{Batch, SequencePredictor};
use window_forecast::roller::{ForecastRoller, RollerConfig};
use window_forecast::scaler::ScalerState;

/// Mean of the window plus a fixed drift
#[derive(Debug)]
struct DriftingMean {
    drift: f64,
}

impl SequencePredictor for DriftingMean {
    fn predict(&self, batch: &Batch) -> Result<Vec<Vec<f64>>> {
        Ok(batch
            .iter_samples()
            .map(|sample| {
                let mean = sample.iter().sum::<f64>() / sample.len() as f64;
                vec![mean + self.drift]
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Drifting mean"
    }
}

fn main() -> Result<()> {
    let closes = [
        41_250.0, 41_310.5, 41_280.0, 41_402.2, 41_455.9, 41_390.1, 41_520.0, 41_610.4,
    ];

    let scaler = ScalerState::fit(&closes)?;
    let normalized = scaler.normalize(&closes);

    let roller = ForecastRoller::new(RollerConfig {
        max_steps: Some(48),
        max_retries: 1,
        ..RollerConfig::default()
    });

    let predictor = DriftingMean { drift: 0.01 };
    let seed = &normalized[normalized.len() - 4..];

    let mut rollout = roller.start(&predictor, seed, 6)?;
    while let Some(value) = rollout.step()? {
        println!(
            "step -> {:.2}  buffer {:?}",
            scaler.denormalize_value(value),
            rollout
                .buffer()
                .to_vec()
                .iter()
                .map(|v| format!("{:.3}", v))
                .collect::<Vec<_>>()
        );
    }

    Ok(())
}
