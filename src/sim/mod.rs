pub mod runner;
pub mod temperature_reporting_op;

pub use runner::{ObserverCost, SimOp, SimOpHandle, SimRunner};
pub use temperature_reporting_op::TemperatureReportingOp;

use serde::{Deserialize, Serialize};

/// Anything advanced by a frame delta in seconds.
pub trait Steppable {
    fn step(&mut self, dt: f64);
}

/// Anything that can return to its freshly constructed state.
pub trait Resettable {
    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeSpeed {
    #[default]
    Normal,
    Slow,
}

impl TimeSpeed {
    pub fn factor(&self, slow_speed_factor: f64) -> f64 {
        match self {
            TimeSpeed::Normal => 1.0,
            TimeSpeed::Slow => slow_speed_factor,
        }
    }
}

/// Clamp a frame delta to `[0, max_dt]`. Negative or non-finite deltas become 0.
pub(crate) fn clamp_dt(dt: f64, max_dt: f64) -> f64 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    if dt > max_dt {
        log::warn!("frame delta {dt:.3}s clamped to {max_dt:.3}s");
        return max_dt;
    }
    dt
}
