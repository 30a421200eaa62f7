use crate::constants::MIN_PACKET_ENERGY_J;
use crate::energy::energy_packet::{EnergyDirection, EnergyPacket};
use crate::error::{check_unit_interval, Result};
use crate::photon::WavelengthClass;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A cloud reflects part of the downward sunlight. It is invisible to infrared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    /// Center of the cloud; `y` is its altitude.
    pub position: DVec2,
    pub width: f64,
    pub height: f64,
    reflectivity: f64,
    enabled: bool,
    initial_enabled: bool,
}

impl Cloud {
    pub fn new(position: DVec2, width: f64, height: f64, reflectivity: f64, enabled: bool) -> Result<Self> {
        check_unit_interval("cloud reflectivity", reflectivity)?;
        Ok(Self {
            position,
            width,
            height,
            reflectivity,
            enabled,
            initial_enabled: enabled,
        })
    }

    pub fn altitude(&self) -> f64 {
        self.position.y
    }

    pub fn reflectivity(&self) -> f64 {
        self.reflectivity
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether a vertical ray at `x` passes through the cloud.
    pub fn spans_x(&self, x: f64) -> bool {
        (x - self.position.x).abs() <= self.width / 2.0
    }

    /// Reflect the cloud's share of every downward visible packet that crossed
    /// its altitude this step.
    pub fn interact_with_packets(&self, packets: &mut [EnergyPacket], reflected: &mut Vec<EnergyPacket>) {
        if !self.enabled || self.reflectivity == 0.0 {
            return;
        }
        for packet in packets.iter_mut() {
            if packet.is_visible()
                && packet.direction == EnergyDirection::Down
                && packet.crossed_altitude(self.altitude())
            {
                let reflected_j = packet.energy_j * self.reflectivity;
                packet.energy_j -= reflected_j;
                if reflected_j >= MIN_PACKET_ENERGY_J {
                    reflected.push(EnergyPacket::new(
                        WavelengthClass::Visible,
                        reflected_j,
                        self.altitude(),
                        EnergyDirection::Up,
                    ));
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.enabled = self.initial_enabled;
    }
}
