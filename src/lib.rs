//! # BTC Forecast
//!
//! Umbrella crate for the workspace. `window_forecast` holds the windowing,
//! scaling, rollout and pipeline code; `series_math` holds the numeric
//! helpers it scores and extrapolates with.
//!
//! ## Example
//!
//! ```
//! use btc_forecast_workspace::window_forecast::{ScalerState, WindowBuilder};
//!
//! let closes = [100.0, 102.0, 101.0, 105.0, 107.0, 106.0];
//! let scaler = ScalerState::fit(&closes).unwrap();
//! let windows = WindowBuilder::new(2).unwrap().build(&scaler.normalize(&closes)).unwrap();
//!
//! assert_eq!(windows.len(), 3);
//! ```

pub use series_math;
pub use window_forecast;

/// Crate versions in this workspace, as `(name, version)`
pub fn versions() -> [(&'static str, &'static str); 2] {
    [
        (window_forecast::NAME, window_forecast::VERSION),
        ("series_math", series_math::VERSION),
    ]
}
