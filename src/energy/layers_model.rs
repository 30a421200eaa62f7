//! Multi-layer radiative energy balance.
//!
//! The sun drops a visible packet at the top of the atmosphere every step,
//! packets travel at the configured light speed, and each body (clouds,
//! atmosphere layers, ground) takes its share of the packets that crossed
//! it before radiating new infrared packets of its own.

use crate::config::SimConfig;
use crate::constants::MIN_PACKET_ENERGY_J;
use crate::energy::cloud::Cloud;
use crate::energy::energy_packet::{EnergyDirection, EnergyPacket};
use crate::energy::flux_meter::{FluxMeter, FluxReading};
use crate::energy::layer::{EnergyAbsorbingEmittingLayer, GroundLayer};
use crate::energy::rate_tracker::EnergyRateTracker;
use crate::energy::substance::LayerSubstance;
use crate::energy::sun::SunEnergySource;
use crate::error::{check_range, GreenhouseError, Result};
use serde::{Deserialize, Serialize};

/// Construction parameters that differ between screens.
#[derive(Debug, Clone)]
pub struct LayersModelParams {
    pub layer_count: usize,
    pub initially_active_layers: usize,
    pub initial_absorption_proportion: f64,
    pub clouds: Vec<Cloud>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayersModel {
    height_m: f64,
    surface_area_m2: f64,
    light_speed_m_per_s: f64,
    albedo_range: (f64, f64),
    balance_threshold_w_per_m2: f64,
    initially_active_layers: usize,
    sun: SunEnergySource,
    ground: GroundLayer,
    atmosphere_layers: Vec<EnergyAbsorbingEmittingLayer>,
    clouds: Vec<Cloud>,
    packets: Vec<EnergyPacket>,
    flux_meter: FluxMeter,
    incoming_energy: EnergyRateTracker,
    outgoing_energy: EnergyRateTracker,
    elapsed_s: f64,
}

impl LayersModel {
    pub fn new(config: &SimConfig, params: LayersModelParams) -> Result<Self> {
        let atmo = &config.atmosphere;
        if params.initially_active_layers > params.layer_count {
            return Err(GreenhouseError::InvalidParam(format!(
                "{} active layers requested but only {} exist",
                params.initially_active_layers, params.layer_count
            )));
        }

        // Evenly spaced strictly below the top of the atmosphere.
        let spacing = atmo.height_m / (params.layer_count as f64 + 1.0);
        let atmosphere_layers = (0..params.layer_count)
            .map(|i| {
                EnergyAbsorbingEmittingLayer::new(
                    spacing * (i as f64 + 1.0),
                    LayerSubstance::Air,
                    atmo.surface_area_m2,
                    atmo.layer_minimum_temperature_k,
                    params.initial_absorption_proportion,
                    i < params.initially_active_layers,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let ground = GroundLayer::new(atmo.surface_area_m2, atmo.ground_minimum_temperature_k, atmo.ground_albedo)?;
        let sun = SunEnergySource::new(
            atmo.solar_constant_w_per_m2,
            atmo.surface_area_m2,
            atmo.height_m,
            config.layer_model.sun_output_multiplier_range,
            true,
        );
        let window = atmo.energy_accumulation_period_s;

        Ok(Self {
            height_m: atmo.height_m,
            surface_area_m2: atmo.surface_area_m2,
            light_speed_m_per_s: atmo.light_speed_m_per_s,
            albedo_range: config.layer_model.albedo_range,
            balance_threshold_w_per_m2: atmo.radiative_balance_threshold_w_per_m2,
            initially_active_layers: params.initially_active_layers,
            sun,
            ground,
            atmosphere_layers,
            clouds: params.clouds,
            packets: Vec::new(),
            flux_meter: FluxMeter::new(atmo.height_m * 0.75, atmo.height_m, atmo.surface_area_m2, window),
            incoming_energy: EnergyRateTracker::new(window),
            outgoing_energy: EnergyRateTracker::new(window),
            elapsed_s: 0.0,
        })
    }

    pub fn step(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        self.elapsed_s += dt;

        let incoming = self.sun.produce_energy(dt, &mut self.packets);
        self.incoming_energy.add_energy_info(dt, incoming);

        for packet in self.packets.iter_mut() {
            packet.step(dt, self.light_speed_m_per_s);
        }

        let mut new_packets = Vec::new();
        for cloud in &self.clouds {
            cloud.interact_with_packets(&mut self.packets, &mut new_packets);
        }
        for layer in self.atmosphere_layers.iter_mut() {
            layer.interact_with_packets(&mut self.packets);
        }
        self.ground.interact_with_packets(&mut self.packets, &mut new_packets);
        self.flux_meter.measure(&self.packets, dt);

        let ground_radiated = self.ground.radiate(dt);
        self.ground.emit_packets(ground_radiated, &mut new_packets);
        for layer in self.atmosphere_layers.iter_mut() {
            let radiated = layer.radiate(dt);
            layer.emit_packets(radiated, &mut new_packets);
        }

        let top = self.height_m;
        let mut outgoing = 0.0;
        self.packets.retain(|packet| {
            if packet.direction == EnergyDirection::Up && packet.altitude >= top {
                outgoing += packet.energy_j;
                return false;
            }
            packet.energy_j >= MIN_PACKET_ENERGY_J
        });
        self.outgoing_energy.add_energy_info(dt, outgoing);
        self.packets.append(&mut new_packets);
    }

    pub fn reset(&mut self) {
        self.sun.reset();
        self.ground.reset();
        for layer in self.atmosphere_layers.iter_mut() {
            layer.reset();
        }
        for cloud in self.clouds.iter_mut() {
            cloud.reset();
        }
        self.packets.clear();
        self.flux_meter.reset();
        self.incoming_energy.reset();
        self.outgoing_energy.reset();
        self.elapsed_s = 0.0;
    }

    pub fn height_m(&self) -> f64 {
        self.height_m
    }

    pub fn surface_area_m2(&self) -> f64 {
        self.surface_area_m2
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    pub fn sun(&self) -> &SunEnergySource {
        &self.sun
    }

    pub fn ground(&self) -> &GroundLayer {
        &self.ground
    }

    pub fn surface_temperature_k(&self) -> f64 {
        self.ground.temperature_k()
    }

    pub fn atmosphere_layers(&self) -> &[EnergyAbsorbingEmittingLayer] {
        &self.atmosphere_layers
    }

    pub fn active_layer_count(&self) -> usize {
        self.atmosphere_layers.iter().filter(|l| l.is_active()).count()
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn packets(&self) -> &[EnergyPacket] {
        &self.packets
    }

    pub fn flux_meter(&self) -> &FluxMeter {
        &self.flux_meter
    }

    pub fn flux_reading(&self) -> FluxReading {
        self.flux_meter.reading()
    }

    pub fn set_flux_sensor_altitude(&mut self, altitude: f64) -> Result<()> {
        self.flux_meter.set_sensor_altitude(altitude)
    }

    pub fn set_sun_shining(&mut self, shining: bool) {
        self.sun.set_shining(shining);
    }

    pub fn set_sun_output_multiplier(&mut self, multiplier: f64) -> Result<()> {
        self.sun.set_output_multiplier(multiplier)
    }

    pub fn set_ground_albedo(&mut self, albedo: f64) -> Result<()> {
        let (min, max) = self.albedo_range;
        check_range("ground albedo", albedo, min, max)?;
        self.ground.set_albedo(albedo)
    }

    /// Switch layers on from the bottom of the stack upward.
    pub fn set_active_layer_count(&mut self, count: usize) -> Result<()> {
        if count > self.atmosphere_layers.len() {
            return Err(GreenhouseError::InvalidParam(format!(
                "{} active layers requested but only {} exist",
                count,
                self.atmosphere_layers.len()
            )));
        }
        for (i, layer) in self.atmosphere_layers.iter_mut().enumerate() {
            layer.set_active(i < count);
        }
        Ok(())
    }

    pub fn set_layer_absorption(&mut self, index: usize, proportion: f64) -> Result<()> {
        let layer = self.atmosphere_layers.get_mut(index).ok_or_else(|| {
            GreenhouseError::InvalidParam(format!("no atmosphere layer at index {index}"))
        })?;
        layer.set_energy_absorption_proportion(proportion)
    }

    pub fn set_all_layer_absorption(&mut self, proportion: f64) -> Result<()> {
        crate::error::check_unit_interval("energy absorption proportion", proportion)?;
        for layer in self.atmosphere_layers.iter_mut() {
            layer.set_energy_absorption_proportion(proportion)?;
        }
        Ok(())
    }

    pub fn set_cloud_enabled(&mut self, index: usize, enabled: bool) -> Result<()> {
        let cloud = self
            .clouds
            .get_mut(index)
            .ok_or_else(|| GreenhouseError::InvalidParam(format!("no cloud at index {index}")))?;
        cloud.set_enabled(enabled);
        Ok(())
    }

    /// Sunlight entering the top of the atmosphere, averaged over the window (W).
    pub fn energy_in_rate_w(&self) -> f64 {
        self.incoming_energy.energy_rate_w()
    }

    /// Energy leaving the top of the atmosphere, averaged over the window (W).
    pub fn energy_out_rate_w(&self) -> f64 {
        self.outgoing_energy.energy_rate_w()
    }

    pub fn net_energy_rate_w(&self) -> f64 {
        self.energy_in_rate_w() - self.energy_out_rate_w()
    }

    /// Net flux at the top of the atmosphere is within the balance threshold.
    pub fn is_in_radiative_balance(&self) -> bool {
        self.elapsed_s > 0.0
            && (self.net_energy_rate_w() / self.surface_area_m2).abs() < self.balance_threshold_w_per_m2
    }

    pub fn initially_active_layers(&self) -> usize {
        self.initially_active_layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temp_utils::radiative_equilibrium_kelvin;
    use approx::assert_abs_diff_eq;
    use more_asserts::{assert_gt, assert_le};

    fn model(layers: usize, active: usize, proportion: f64) -> LayersModel {
        LayersModel::new(
            &SimConfig::default(),
            LayersModelParams {
                layer_count: layers,
                initially_active_layers: active,
                initial_absorption_proportion: proportion,
                clouds: Vec::new(),
            },
        )
        .unwrap()
    }

    #[test]
    fn layers_are_spaced_below_top() {
        let model = model(3, 1, 1.0);
        let altitudes: Vec<f64> = model.atmosphere_layers().iter().map(|l| l.altitude()).collect();
        assert_eq!(altitudes, vec![12_500.0, 25_000.0, 37_500.0]);
        assert_eq!(model.active_layer_count(), 1);
        assert!(model.atmosphere_layers()[0].is_active());
    }

    #[test]
    fn activation_is_bottom_up() {
        let mut model = model(3, 0, 1.0);
        model.set_active_layer_count(2).unwrap();
        let active: Vec<bool> = model.atmosphere_layers().iter().map(|l| l.is_active()).collect();
        assert_eq!(active, vec![true, true, false]);
        assert!(model.set_active_layer_count(4).is_err());
    }

    #[test]
    fn bare_ground_approaches_radiative_equilibrium() {
        let mut model = model(3, 0, 1.0);
        let expected = radiative_equilibrium_kelvin(1361.0 * 0.25 * 0.7);
        for _ in 0..6_000 {
            model.step(0.1);
            assert_le!(model.surface_temperature_k(), expected + 0.5);
        }
        assert_abs_diff_eq!(model.surface_temperature_k(), expected, epsilon = 1.0);
        assert!(model.is_in_radiative_balance());
    }

    #[test]
    fn inactive_layers_add_no_warming() {
        let mut opaque = model(3, 0, 1.0);
        let mut clear = model(3, 0, 0.0);
        for _ in 0..3_000 {
            opaque.step(0.1);
            clear.step(0.1);
        }
        assert_abs_diff_eq!(opaque.surface_temperature_k(), clear.surface_temperature_k(), epsilon = 1e-9);
    }

    #[test]
    fn single_opaque_layer_warms_surface() {
        let mut model = model(1, 1, 1.0);
        for _ in 0..6_000 {
            model.step(0.1);
        }
        // Classic one-layer result: Ts = 2^(1/4) · Te
        let te = radiative_equilibrium_kelvin(1361.0 * 0.25 * 0.7);
        assert_abs_diff_eq!(model.surface_temperature_k(), te * 2f64.powf(0.25), epsilon = 2.0);
        assert_abs_diff_eq!(model.atmosphere_layers()[0].temperature_k(), te, epsilon = 2.0);
    }

    #[test]
    fn setters_validate() {
        let mut model = model(3, 1, 1.0);
        assert!(model.set_ground_albedo(0.95).is_err());
        assert!(model.set_sun_output_multiplier(0.1).is_err());
        assert!(model.set_layer_absorption(5, 0.5).is_err());
        assert!(model.set_layer_absorption(0, 1.5).is_err());
        assert!(model.set_cloud_enabled(0, true).is_err());
        model.set_layer_absorption(0, 0.5).unwrap();
        assert_eq!(model.atmosphere_layers()[0].energy_absorption_proportion(), 0.5);
    }

    #[test]
    fn sun_off_means_no_incoming_energy() {
        let mut model = model(3, 3, 1.0);
        model.set_sun_shining(false);
        for _ in 0..100 {
            model.step(0.1);
        }
        assert_eq!(model.energy_in_rate_w(), 0.0);
        assert_abs_diff_eq!(model.surface_temperature_k(), model.ground().minimum_temperature_k(), epsilon = 1e-9);
    }

    #[test]
    fn reset_restores_construction_state() {
        let fresh = model(3, 1, 1.0);
        let mut model = fresh.clone();
        model.set_active_layer_count(3).unwrap();
        for _ in 0..100 {
            model.step(0.1);
        }
        assert_gt!(model.surface_temperature_k(), 125.0);
        model.reset();
        assert_eq!(model, fresh);
    }
}
