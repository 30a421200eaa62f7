use crate::photon::WavelengthClass;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyDirection {
    Up,
    Down,
}

impl EnergyDirection {
    pub fn sign(&self) -> f64 {
        match self {
            EnergyDirection::Up => 1.0,
            EnergyDirection::Down => -1.0,
        }
    }
}

/// A quantity of radiant energy in flight between the bodies of the layer
/// model. Packets are one dimensional: they span the whole modelled surface
/// and only carry an altitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyPacket {
    pub wavelength: WavelengthClass,
    pub energy_j: f64,
    pub altitude: f64,
    pub previous_altitude: f64,
    pub direction: EnergyDirection,
}

impl EnergyPacket {
    /// New packet at `altitude`; it has not yet crossed anything.
    pub fn new(wavelength: WavelengthClass, energy_j: f64, altitude: f64, direction: EnergyDirection) -> Self {
        Self {
            wavelength,
            energy_j,
            altitude,
            previous_altitude: altitude,
            direction,
        }
    }

    pub fn step(&mut self, dt: f64, speed: f64) {
        self.previous_altitude = self.altitude;
        self.altitude += self.direction.sign() * speed * dt;
    }

    /// Whether the last step carried this packet through `altitude`.
    /// A packet emitted exactly at `altitude` does not count as crossing it.
    pub fn crossed_altitude(&self, altitude: f64) -> bool {
        match self.direction {
            EnergyDirection::Up => self.previous_altitude < altitude && self.altitude >= altitude,
            EnergyDirection::Down => self.previous_altitude > altitude && self.altitude <= altitude,
        }
    }

    pub fn is_infrared(&self) -> bool {
        self.wavelength == WavelengthClass::Infrared
    }

    pub fn is_visible(&self) -> bool {
        self.wavelength == WavelengthClass::Visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_is_directional() {
        let mut packet = EnergyPacket::new(WavelengthClass::Infrared, 1.0, 0.0, EnergyDirection::Up);
        packet.step(1.0, 100.0);
        assert!(packet.crossed_altitude(50.0));
        assert!(packet.crossed_altitude(100.0));
        assert!(!packet.crossed_altitude(0.0));
        assert!(!packet.crossed_altitude(150.0));

        let mut down = EnergyPacket::new(WavelengthClass::Visible, 1.0, 100.0, EnergyDirection::Down);
        down.step(1.0, 100.0);
        assert!(down.crossed_altitude(0.0));
        assert!(!down.crossed_altitude(100.0));
    }
}
