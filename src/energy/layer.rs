/// Stefan-Boltzmann bodies of the layer model: the ground and the stacked
/// atmosphere layers. Each body accumulates absorbed energy during a step and
/// settles its temperature in `radiate`, which also returns what it emitted.

use crate::constants::{MIN_PACKET_ENERGY_J, STEFAN_BOLTZMANN_CONSTANT};
use crate::energy::energy_packet::{EnergyDirection, EnergyPacket};
use crate::energy::substance::LayerSubstance;
use crate::error::{check_unit_interval, Result};
use crate::photon::WavelengthClass;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyAbsorbingEmittingLayer {
    altitude: f64,
    substance: LayerSubstance,
    surface_area_m2: f64,
    temperature_k: f64,
    initial_temperature_k: f64,
    minimum_temperature_k: f64,
    energy_absorption_proportion: f64,
    initial_absorption_proportion: f64,
    is_active: bool,
    initial_active: bool,
    /// Energy absorbed since the last `radiate` call.
    pending_absorbed_j: f64,
    /// Energy radiated during the last `radiate` call.
    last_radiated_j: f64,
}

impl EnergyAbsorbingEmittingLayer {
    /// Create a layer resting at its minimum temperature.
    pub fn new(
        altitude: f64,
        substance: LayerSubstance,
        surface_area_m2: f64,
        minimum_temperature_k: f64,
        energy_absorption_proportion: f64,
        is_active: bool,
    ) -> Result<Self> {
        check_unit_interval("energy absorption proportion", energy_absorption_proportion)?;
        Ok(Self {
            altitude,
            substance,
            surface_area_m2,
            temperature_k: minimum_temperature_k,
            initial_temperature_k: minimum_temperature_k,
            minimum_temperature_k,
            energy_absorption_proportion,
            initial_absorption_proportion: energy_absorption_proportion,
            is_active,
            initial_active: is_active,
            pending_absorbed_j: 0.0,
            last_radiated_j: 0.0,
        })
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn substance(&self) -> LayerSubstance {
        self.substance
    }

    pub fn surface_area_m2(&self) -> f64 {
        self.surface_area_m2
    }

    pub fn temperature_k(&self) -> f64 {
        self.temperature_k
    }

    pub fn minimum_temperature_k(&self) -> f64 {
        self.minimum_temperature_k
    }

    pub fn energy_absorption_proportion(&self) -> f64 {
        self.energy_absorption_proportion
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn last_radiated_j(&self) -> f64 {
        self.last_radiated_j
    }

    pub fn heat_capacity_j_per_k(&self) -> f64 {
        self.substance.profile().heat_capacity_j_per_k(self.surface_area_m2)
    }

    /// Emissivity equals absorptivity for atmosphere layers; the ground is a blackbody.
    pub fn emissivity(&self) -> f64 {
        match self.substance {
            LayerSubstance::Ground => 1.0,
            LayerSubstance::Air => self.energy_absorption_proportion,
        }
    }

    pub fn set_energy_absorption_proportion(&mut self, proportion: f64) -> Result<()> {
        check_unit_interval("energy absorption proportion", proportion)?;
        self.energy_absorption_proportion = proportion;
        Ok(())
    }

    /// Deactivated layers drop back to their initial temperature so they
    /// start cold when switched on again.
    pub fn set_active(&mut self, active: bool) {
        if self.is_active != active {
            log::debug!(
                "{} layer at {:.0} m {}",
                self.substance.as_str(),
                self.altitude,
                if active { "activated" } else { "deactivated" }
            );
        }
        if !active {
            self.temperature_k = self.initial_temperature_k;
            self.pending_absorbed_j = 0.0;
            self.last_radiated_j = 0.0;
        }
        self.is_active = active;
    }

    pub fn absorb_energy(&mut self, energy_j: f64) {
        if self.is_active {
            self.pending_absorbed_j += energy_j;
        }
    }

    /// Absorb this layer's share of every infrared packet that crossed it
    /// during the last packet step. Visible light passes through.
    pub fn interact_with_packets(&mut self, packets: &mut [EnergyPacket]) {
        if !self.is_active || self.energy_absorption_proportion == 0.0 {
            return;
        }
        for packet in packets.iter_mut() {
            if packet.is_infrared() && packet.crossed_altitude(self.altitude) {
                let absorbed = packet.energy_j * self.energy_absorption_proportion;
                packet.energy_j -= absorbed;
                self.absorb_energy(absorbed);
            }
        }
    }

    /// Explicit-Euler energy balance for one step: settle the absorbed energy,
    /// radiate `ε·σ·T⁴·A·dt` per face and clamp at the temperature floor.
    /// Returns the energy radiated.
    pub fn radiate(&mut self, dt: f64) -> f64 {
        if !self.is_active {
            self.pending_absorbed_j = 0.0;
            self.last_radiated_j = 0.0;
            return 0.0;
        }
        let faces = self.substance.profile().radiating_faces as f64;
        let radiated = self.emissivity()
            * STEFAN_BOLTZMANN_CONSTANT
            * self.temperature_k.powi(4)
            * self.surface_area_m2
            * dt
            * faces;
        let delta_t = (self.pending_absorbed_j - radiated) / self.heat_capacity_j_per_k();
        self.temperature_k = (self.temperature_k + delta_t).max(self.minimum_temperature_k);
        self.pending_absorbed_j = 0.0;
        self.last_radiated_j = radiated;
        radiated
    }

    /// Turn the energy radiated this step into infrared packets leaving the layer.
    pub fn emit_packets(&self, radiated_j: f64, packets: &mut Vec<EnergyPacket>) {
        if radiated_j < MIN_PACKET_ENERGY_J {
            return;
        }
        match self.substance {
            LayerSubstance::Ground => packets.push(EnergyPacket::new(
                WavelengthClass::Infrared,
                radiated_j,
                self.altitude,
                EnergyDirection::Up,
            )),
            LayerSubstance::Air => {
                for direction in [EnergyDirection::Up, EnergyDirection::Down] {
                    packets.push(EnergyPacket::new(
                        WavelengthClass::Infrared,
                        radiated_j / 2.0,
                        self.altitude,
                        direction,
                    ));
                }
            }
        }
    }

    /// Outgoing radiative flux in W/m² per face at the current temperature.
    pub fn radiative_flux_w_per_m2(&self) -> f64 {
        if !self.is_active {
            return 0.0;
        }
        self.emissivity() * STEFAN_BOLTZMANN_CONSTANT * self.temperature_k.powi(4)
    }

    pub fn reset(&mut self) {
        self.temperature_k = self.initial_temperature_k;
        self.energy_absorption_proportion = self.initial_absorption_proportion;
        self.is_active = self.initial_active;
        self.pending_absorbed_j = 0.0;
        self.last_radiated_j = 0.0;
    }
}

/// The planet surface: absorbs all arriving infrared, absorbs the non-reflected
/// share of arriving sunlight and radiates upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundLayer {
    layer: EnergyAbsorbingEmittingLayer,
    albedo: f64,
    initial_albedo: f64,
}

impl GroundLayer {
    pub fn new(surface_area_m2: f64, minimum_temperature_k: f64, albedo: f64) -> Result<Self> {
        check_unit_interval("ground albedo", albedo)?;
        let layer = EnergyAbsorbingEmittingLayer::new(
            0.0,
            LayerSubstance::Ground,
            surface_area_m2,
            minimum_temperature_k,
            1.0,
            true,
        )?;
        Ok(Self {
            layer,
            albedo,
            initial_albedo: albedo,
        })
    }

    pub fn layer(&self) -> &EnergyAbsorbingEmittingLayer {
        &self.layer
    }

    pub fn temperature_k(&self) -> f64 {
        self.layer.temperature_k()
    }

    pub fn minimum_temperature_k(&self) -> f64 {
        self.layer.minimum_temperature_k()
    }

    pub fn albedo(&self) -> f64 {
        self.albedo
    }

    pub fn set_albedo(&mut self, albedo: f64) -> Result<()> {
        check_unit_interval("ground albedo", albedo)?;
        self.albedo = albedo;
        Ok(())
    }

    /// Consume every downward packet that reached the surface. Reflected
    /// sunlight is appended to `reflected` as upward visible packets.
    pub fn interact_with_packets(&mut self, packets: &mut [EnergyPacket], reflected: &mut Vec<EnergyPacket>) {
        for packet in packets.iter_mut() {
            if packet.direction != EnergyDirection::Down || packet.altitude > 0.0 {
                continue;
            }
            match packet.wavelength {
                WavelengthClass::Visible => {
                    let reflected_j = packet.energy_j * self.albedo;
                    self.layer.absorb_energy(packet.energy_j - reflected_j);
                    if reflected_j >= MIN_PACKET_ENERGY_J {
                        reflected.push(EnergyPacket::new(
                            WavelengthClass::Visible,
                            reflected_j,
                            0.0,
                            EnergyDirection::Up,
                        ));
                    }
                }
                _ => self.layer.absorb_energy(packet.energy_j),
            }
            packet.energy_j = 0.0;
        }
    }

    pub fn radiate(&mut self, dt: f64) -> f64 {
        self.layer.radiate(dt)
    }

    pub fn emit_packets(&self, radiated_j: f64, packets: &mut Vec<EnergyPacket>) {
        self.layer.emit_packets(radiated_j, packets);
    }

    pub fn reset(&mut self) {
        self.layer.reset();
        self.albedo = self.initial_albedo;
    }
}
