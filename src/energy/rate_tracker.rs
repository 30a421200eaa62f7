use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Sliding-window energy accumulator. Each step contributes `(dt, energy)`;
/// the reported rate is the energy inside the window divided by its duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyRateTracker {
    window_s: f64,
    entries: VecDeque<(f64, f64)>,
    total_time_s: f64,
    total_energy_j: f64,
    energy_rate_w: f64,
}

impl EnergyRateTracker {
    pub fn new(window_s: f64) -> Self {
        Self {
            window_s,
            entries: VecDeque::new(),
            total_time_s: 0.0,
            total_energy_j: 0.0,
            energy_rate_w: 0.0,
        }
    }

    pub fn add_energy_info(&mut self, dt: f64, energy_j: f64) {
        if dt <= 0.0 {
            return;
        }
        self.entries.push_back((dt, energy_j));
        self.total_time_s += dt;
        self.total_energy_j += energy_j;
        while let Some(&(oldest_dt, oldest_energy)) = self.entries.front() {
            if self.total_time_s - oldest_dt < self.window_s - 1e-9 {
                break;
            }
            self.entries.pop_front();
            self.total_time_s -= oldest_dt;
            self.total_energy_j -= oldest_energy;
        }
        self.energy_rate_w = if self.total_time_s > 0.0 {
            self.total_energy_j / self.total_time_s
        } else {
            0.0
        };
    }

    /// Average power over the window in watts.
    pub fn energy_rate_w(&self) -> f64 {
        self.energy_rate_w
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.total_time_s = 0.0;
        self.total_energy_j = 0.0;
        self.energy_rate_w = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn constant_input_gives_constant_rate() {
        let mut tracker = EnergyRateTracker::new(1.0);
        for _ in 0..50 {
            tracker.add_energy_info(0.1, 5.0);
        }
        assert_abs_diff_eq!(tracker.energy_rate_w(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn old_energy_leaves_the_window() {
        let mut tracker = EnergyRateTracker::new(1.0);
        tracker.add_energy_info(0.1, 100.0);
        for _ in 0..20 {
            tracker.add_energy_info(0.1, 0.0);
        }
        assert_abs_diff_eq!(tracker.energy_rate_w(), 0.0, epsilon = 1e-9);
        tracker.reset();
        assert_eq!(tracker.energy_rate_w(), 0.0);
    }
}
