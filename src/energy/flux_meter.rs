use crate::energy::energy_packet::{EnergyDirection, EnergyPacket};
use crate::energy::rate_tracker::EnergyRateTracker;
use crate::error::{check_range, Result};
use crate::photon::WavelengthClass;
use serde::{Deserialize, Serialize};

/// Movable sensor reporting the energy flowing through one altitude,
/// split by band and direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluxMeter {
    sensor_altitude: f64,
    initial_altitude: f64,
    max_altitude: f64,
    surface_area_m2: f64,
    visible_down: EnergyRateTracker,
    visible_up: EnergyRateTracker,
    infrared_down: EnergyRateTracker,
    infrared_up: EnergyRateTracker,
}

/// One flux meter reading in W/m².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxReading {
    pub visible_down: f64,
    pub visible_up: f64,
    pub infrared_down: f64,
    pub infrared_up: f64,
}

impl FluxMeter {
    pub fn new(sensor_altitude: f64, max_altitude: f64, surface_area_m2: f64, window_s: f64) -> Self {
        Self {
            sensor_altitude,
            initial_altitude: sensor_altitude,
            max_altitude,
            surface_area_m2,
            visible_down: EnergyRateTracker::new(window_s),
            visible_up: EnergyRateTracker::new(window_s),
            infrared_down: EnergyRateTracker::new(window_s),
            infrared_up: EnergyRateTracker::new(window_s),
        }
    }

    pub fn sensor_altitude(&self) -> f64 {
        self.sensor_altitude
    }

    pub fn set_sensor_altitude(&mut self, altitude: f64) -> Result<()> {
        check_range("flux sensor altitude", altitude, 0.0, self.max_altitude)?;
        self.sensor_altitude = altitude;
        Ok(())
    }

    /// Record the packets that crossed the sensor during the last packet step.
    pub fn measure(&mut self, packets: &[EnergyPacket], dt: f64) {
        let mut visible_down = 0.0;
        let mut visible_up = 0.0;
        let mut infrared_down = 0.0;
        let mut infrared_up = 0.0;
        for packet in packets.iter().filter(|p| p.crossed_altitude(self.sensor_altitude)) {
            match (packet.wavelength, packet.direction) {
                (WavelengthClass::Visible, EnergyDirection::Down) => visible_down += packet.energy_j,
                (WavelengthClass::Visible, EnergyDirection::Up) => visible_up += packet.energy_j,
                (WavelengthClass::Infrared, EnergyDirection::Down) => infrared_down += packet.energy_j,
                (WavelengthClass::Infrared, EnergyDirection::Up) => infrared_up += packet.energy_j,
                _ => {}
            }
        }
        self.visible_down.add_energy_info(dt, visible_down);
        self.visible_up.add_energy_info(dt, visible_up);
        self.infrared_down.add_energy_info(dt, infrared_down);
        self.infrared_up.add_energy_info(dt, infrared_up);
    }

    pub fn reading(&self) -> FluxReading {
        let per_m2 = |tracker: &EnergyRateTracker| tracker.energy_rate_w() / self.surface_area_m2;
        FluxReading {
            visible_down: per_m2(&self.visible_down),
            visible_up: per_m2(&self.visible_up),
            infrared_down: per_m2(&self.infrared_down),
            infrared_up: per_m2(&self.infrared_up),
        }
    }

    pub fn reset(&mut self) {
        self.sensor_altitude = self.initial_altitude;
        self.visible_down.reset();
        self.visible_up.reset();
        self.infrared_down.reset();
        self.infrared_up.reset();
    }
}
