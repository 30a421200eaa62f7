use crate::constants::{DEFAULT_SUN_OUTPUT_MULTIPLIER, SUNLIGHT_SPHERE_FRACTION};
use crate::energy::energy_packet::{EnergyDirection, EnergyPacket};
use crate::error::{check_range, Result};
use crate::photon::WavelengthClass;
use serde::{Deserialize, Serialize};

/// Injects sunlight at the top of the modelled atmosphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunEnergySource {
    is_shining: bool,
    initial_shining: bool,
    output_multiplier: f64,
    multiplier_range: (f64, f64),
    solar_constant_w_per_m2: f64,
    surface_area_m2: f64,
    top_altitude: f64,
}

impl SunEnergySource {
    pub fn new(
        solar_constant_w_per_m2: f64,
        surface_area_m2: f64,
        top_altitude: f64,
        multiplier_range: (f64, f64),
        is_shining: bool,
    ) -> Self {
        Self {
            is_shining,
            initial_shining: is_shining,
            output_multiplier: DEFAULT_SUN_OUTPUT_MULTIPLIER,
            multiplier_range,
            solar_constant_w_per_m2,
            surface_area_m2,
            top_altitude,
        }
    }

    pub fn is_shining(&self) -> bool {
        self.is_shining
    }

    pub fn set_shining(&mut self, shining: bool) {
        self.is_shining = shining;
    }

    pub fn output_multiplier(&self) -> f64 {
        self.output_multiplier
    }

    pub fn set_output_multiplier(&mut self, multiplier: f64) -> Result<()> {
        let (min, max) = self.multiplier_range;
        check_range("sun output multiplier", multiplier, min, max)?;
        self.output_multiplier = multiplier;
        Ok(())
    }

    /// Average flux arriving at the top of the atmosphere in W/m².
    pub fn incident_flux_w_per_m2(&self) -> f64 {
        if self.is_shining {
            self.solar_constant_w_per_m2 * SUNLIGHT_SPHERE_FRACTION * self.output_multiplier
        } else {
            0.0
        }
    }

    /// Emit this step's sunlight as a single downward packet; returns the energy emitted.
    pub fn produce_energy(&self, dt: f64, packets: &mut Vec<EnergyPacket>) -> f64 {
        let energy = self.incident_flux_w_per_m2() * self.surface_area_m2 * dt;
        if energy > 0.0 {
            packets.push(EnergyPacket::new(
                WavelengthClass::Visible,
                energy,
                self.top_altitude,
                EnergyDirection::Down,
            ));
        }
        energy
    }

    pub fn reset(&mut self) {
        self.is_shining = self.initial_shining;
        self.output_multiplier = DEFAULT_SUN_OUTPUT_MULTIPLIER;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn produces_scaled_sunlight() {
        let mut sun = SunEnergySource::new(1361.0, 2.0, 50_000.0, (0.5, 2.0), true);
        let mut packets = Vec::new();
        let energy = sun.produce_energy(0.5, &mut packets);
        assert_relative_eq!(energy, 1361.0 * 0.25 * 2.0 * 0.5, max_relative = 1e-12);
        assert_eq!(packets.len(), 1);

        sun.set_output_multiplier(2.0).unwrap();
        assert_relative_eq!(sun.incident_flux_w_per_m2(), 680.5, max_relative = 1e-12);
        assert!(sun.set_output_multiplier(2.5).is_err());

        sun.set_shining(false);
        assert_eq!(sun.produce_energy(0.5, &mut packets), 0.0);
        assert_eq!(packets.len(), 1);
    }
}
