//! Discrete photons for the Photons screen.
//!
//! Photons are a visual stand-in for the energy packets of the layers model:
//! they read the model's state (sun, ground temperature, active layers) but
//! never feed energy back into it.

use crate::config::SimConfig;
use crate::energy::layers_model::LayersModel;
use crate::photon::{Photon, PhotonId, WavelengthClass};
use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotonCollection {
    photons: Vec<Photon>,
    next_id: PhotonId,
    visible_creation_countdown_s: f64,
    ir_emission_accumulator_s: f64,
    visible_creation_rate: f64,
    ir_emission_scale: f64,
    speed_m_per_s: f64,
    ir_angle_jitter_rad: f64,
    sunlight_span_m: f64,
    height_m: f64,
}

impl PhotonCollection {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            photons: Vec::new(),
            next_id: 0,
            visible_creation_countdown_s: 0.0,
            ir_emission_accumulator_s: 0.0,
            visible_creation_rate: config.photons.visible_creation_rate,
            ir_emission_scale: config.photons.ir_emission_scale,
            speed_m_per_s: config.photons.speed_m_per_s,
            ir_angle_jitter_rad: config.photons.ir_angle_jitter_rad,
            sunlight_span_m: config.atmosphere.sunlight_span_m,
            height_m: config.atmosphere.height_m,
        }
    }

    pub fn photons(&self) -> &[Photon] {
        &self.photons
    }

    pub fn len(&self) -> usize {
        self.photons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photons.is_empty()
    }

    /// Insert a photon directly, bypassing the sun and ground sources.
    pub fn add_photon(&mut self, position: DVec2, velocity: DVec2, wavelength: WavelengthClass) -> PhotonId {
        let id = self.next_id;
        self.next_id += 1;
        self.photons.push(Photon::new(id, position, velocity, wavelength));
        id
    }

    /// Infrared photons per second leaving the ground at its current temperature.
    pub fn ground_emission_rate(&self, model: &LayersModel) -> f64 {
        let ground = model.ground();
        let excess = ground.temperature_k() - ground.minimum_temperature_k();
        if excess <= 0.0 {
            0.0
        } else {
            excess * self.ir_emission_scale
        }
    }

    pub fn step<R: Rng + ?Sized>(&mut self, dt: f64, model: &LayersModel, rng: &mut R) {
        if dt <= 0.0 {
            return;
        }
        self.create_sunlight(dt, model, rng);
        self.create_ground_infrared(dt, model, rng);
        self.propagate(dt, model, rng);

        let top = self.height_m;
        self.photons.retain(|photon| {
            let exited_top = photon.velocity.y > 0.0 && photon.position.y >= top;
            let hit_ground = photon.velocity.y < 0.0 && photon.position.y <= 0.0;
            !(exited_top || hit_ground)
        });
    }

    pub fn reset(&mut self) {
        self.photons.clear();
        self.next_id = 0;
        self.visible_creation_countdown_s = 0.0;
        self.ir_emission_accumulator_s = 0.0;
    }

    fn random_x<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        (rng.random::<f64>() - 0.5) * self.sunlight_span_m
    }

    fn create_sunlight<R: Rng + ?Sized>(&mut self, dt: f64, model: &LayersModel, rng: &mut R) {
        if !model.sun().is_shining() || self.visible_creation_rate <= 0.0 {
            return;
        }
        self.visible_creation_countdown_s -= dt;
        while self.visible_creation_countdown_s <= 0.0 {
            let x = self.random_x(rng);
            self.add_photon(
                DVec2::new(x, self.height_m),
                DVec2::new(0.0, -self.speed_m_per_s),
                WavelengthClass::Visible,
            );
            self.visible_creation_countdown_s += 1.0 / self.visible_creation_rate;
        }
    }

    fn create_ground_infrared<R: Rng + ?Sized>(&mut self, dt: f64, model: &LayersModel, rng: &mut R) {
        let rate = self.ground_emission_rate(model);
        if rate <= 0.0 {
            self.ir_emission_accumulator_s = 0.0;
            return;
        }
        let interval = 1.0 / rate;
        self.ir_emission_accumulator_s += dt;
        while self.ir_emission_accumulator_s >= interval {
            self.ir_emission_accumulator_s -= interval;
            let x = self.random_x(rng);
            let angle = (rng.random::<f64>() * 2.0 - 1.0) * self.ir_angle_jitter_rad;
            self.add_photon(
                DVec2::new(x, 0.0),
                DVec2::new(angle.sin(), angle.cos()) * self.speed_m_per_s,
                WavelengthClass::Infrared,
            );
        }
    }

    fn propagate<R: Rng + ?Sized>(&mut self, dt: f64, model: &LayersModel, rng: &mut R) {
        for photon in self.photons.iter_mut() {
            let previous = photon.step(dt);

            if photon.is_infrared() {
                for layer in model.atmosphere_layers().iter().filter(|l| l.is_active()) {
                    let altitude = layer.altitude();
                    if !straddles(previous.y, photon.position.y, photon.velocity.y, altitude) {
                        continue;
                    }
                    if rng.random::<f64>() < layer.energy_absorption_proportion() {
                        reverse_at(photon, altitude);
                        log::trace!("photon {} reversed at {:.0} m", photon.id, altitude);
                        break;
                    }
                }
            } else if photon.is_visible() && photon.velocity.y < 0.0 {
                for cloud in model.clouds().iter().filter(|c| c.is_enabled()) {
                    if !cloud.spans_x(photon.position.x)
                        || !straddles(previous.y, photon.position.y, photon.velocity.y, cloud.altitude())
                    {
                        continue;
                    }
                    if rng.random::<f64>() < cloud.reflectivity() {
                        reverse_at(photon, cloud.altitude());
                        break;
                    }
                }
            }
        }
    }
}

/// A photon that starts exactly on an altitude counts as crossing it.
fn straddles(previous_y: f64, current_y: f64, velocity_y: f64, altitude: f64) -> bool {
    if velocity_y > 0.0 {
        previous_y <= altitude && current_y > altitude
    } else if velocity_y < 0.0 {
        previous_y >= altitude && current_y < altitude
    } else {
        false
    }
}

/// Flip vertical travel and mirror the overshoot back across the altitude so
/// the photon ends the step on the side it came from.
fn reverse_at(photon: &mut Photon, altitude: f64) {
    photon.velocity.y = -photon.velocity.y;
    photon.position.y = 2.0 * altitude - photon.position.y;
}
