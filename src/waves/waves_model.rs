//! Continuous-wave light for the Waves screen.
//!
//! Like the photons, the waves are driven by the energy model's state and
//! do not feed energy back into it.

use crate::config::SimConfig;
use crate::energy::layers_model::LayersModel;
use crate::error::Result;
use crate::photon::WavelengthClass;
use crate::waves::wave::{AttenuatorSource, Wave, WaveId};
use crate::waves::wave_source::EMWaveSource;
use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Downward wave a layer re-emits in response to one incident upward wave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerEmission {
    pub layer: usize,
    pub incident: WaveId,
    pub emitted: WaveId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavesModel {
    waves: Vec<Wave>,
    next_wave_id: WaveId,
    sun_source: EMWaveSource,
    ground_source: EMWaveSource,
    layer_emissions: Vec<LayerEmission>,
    speed_m_per_s: f64,
    phase_rate_rad_per_s: f64,
    ir_full_intensity_temperature_k: f64,
}

impl WavesModel {
    /// Stepping never fails: source paths are checked here, and the per-step
    /// intensities and attenuations are clamped into [0, 1].
    pub fn new(config: &SimConfig) -> Result<Self> {
        let waves = &config.waves;
        let height = config.atmosphere.height_m;
        let lifetime = (waves.lifetime_min_s, waves.lifetime_max_s);
        Ok(Self {
            waves: Vec::new(),
            next_wave_id: 0,
            sun_source: EMWaveSource::new(
                WavelengthClass::Visible,
                height,
                DVec2::NEG_Y,
                0.0,
                &waves.sun_source_x_pairs,
                lifetime,
                waves.time_between_waves_s,
            )?,
            ground_source: EMWaveSource::new(
                WavelengthClass::Infrared,
                0.0,
                DVec2::Y,
                height,
                &waves.ground_source_x_pairs,
                lifetime,
                waves.time_between_waves_s,
            )?,
            layer_emissions: Vec::new(),
            speed_m_per_s: waves.speed_m_per_s,
            phase_rate_rad_per_s: waves.phase_rate_rad_per_s,
            ir_full_intensity_temperature_k: waves.ir_full_intensity_temperature_k,
        })
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn sun_source(&self) -> &EMWaveSource {
        &self.sun_source
    }

    pub fn ground_source(&self) -> &EMWaveSource {
        &self.ground_source
    }

    pub fn layer_emissions(&self) -> &[LayerEmission] {
        &self.layer_emissions
    }

    /// Ground infrared intensity: 0 at the ground's floor, 1 at the configured
    /// full-intensity temperature.
    pub fn ground_ir_intensity(&self, model: &LayersModel) -> f64 {
        let ground = model.ground();
        let span = self.ir_full_intensity_temperature_k - ground.minimum_temperature_k();
        if span <= 0.0 {
            return 1.0;
        }
        ((ground.temperature_k() - ground.minimum_temperature_k()) / span).clamp(0.0, 1.0)
    }

    pub fn step<R: Rng + ?Sized>(&mut self, dt: f64, model: &LayersModel, rng: &mut R) {
        if dt <= 0.0 {
            return;
        }
        self.sun_source.set_producing(model.sun().is_shining());
        let ir_intensity = self.ground_ir_intensity(model);
        self.ground_source.drive_intensity(ir_intensity);
        self.ground_source.set_producing(ir_intensity > 0.0);

        self.sun_source.step(dt, &mut self.waves, &mut self.next_wave_id, rng);
        self.ground_source.step(dt, &mut self.waves, &mut self.next_wave_id, rng);

        for wave in self.waves.iter_mut() {
            wave.step(dt, self.speed_m_per_s, self.phase_rate_rad_per_s);
        }

        self.update_attenuators(model);
        self.update_layer_emissions(model);

        self.waves.retain(|wave| !wave.is_complete());
        let waves = &self.waves;
        self.layer_emissions
            .retain(|e| waves.iter().any(|w| w.id() == e.emitted && w.is_sourced()));
    }

    fn update_attenuators(&mut self, model: &LayersModel) {
        for wave in self.waves.iter_mut() {
            match wave.wavelength() {
                WavelengthClass::Visible if !wave.is_moving_up() => {
                    for (i, cloud) in model.clouds().iter().enumerate() {
                        let source = AttenuatorSource::Cloud(i);
                        let distance = wave.distance_to_altitude(cloud.altitude());
                        let covered = distance.is_some() && cloud.spans_x(wave.x_at_altitude(cloud.altitude()));
                        match distance {
                            Some(d) if covered && cloud.is_enabled() => {
                                wave.attenuate(source, cloud.reflectivity(), d)
                            }
                            _ => wave.remove_attenuator(source),
                        }
                    }
                }
                WavelengthClass::Infrared => {
                    for (i, layer) in model.atmosphere_layers().iter().enumerate() {
                        let source = AttenuatorSource::Layer(i);
                        match wave.distance_to_altitude(layer.altitude()) {
                            Some(d) if layer.is_active() && layer.energy_absorption_proportion() > 0.0 => {
                                wave.attenuate(source, layer.energy_absorption_proportion(), d)
                            }
                            _ => wave.remove_attenuator(source),
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Each active layer sends a share of every upward infrared wave crossing
    /// it back down as its own sourced wave.
    fn update_layer_emissions(&mut self, model: &LayersModel) {
        let mut wanted: Vec<LayerEmission> = Vec::new();
        let mut intensities: Vec<(f64, f64)> = Vec::new();
        for (i, layer) in model.atmosphere_layers().iter().enumerate() {
            if !layer.is_active() || layer.energy_absorption_proportion() <= 0.0 {
                continue;
            }
            let altitude = layer.altitude();
            // a downward wave from here must have room to reach the ground
            if altitude <= 0.0 {
                continue;
            }
            let incident_waves = self
                .waves
                .iter()
                .filter(|w| w.wavelength() == WavelengthClass::Infrared && w.is_moving_up());
            for wave in incident_waves {
                let Some(d) = wave.distance_to_altitude(altitude) else {
                    continue;
                };
                let intensity = wave.intensity_reaching(d, AttenuatorSource::Layer(i))
                    * layer.energy_absorption_proportion();
                if intensity > 0.0 {
                    wanted.push(LayerEmission {
                        layer: i,
                        incident: wave.id(),
                        emitted: 0,
                    });
                    intensities.push((wave.x_at_altitude(altitude), intensity.min(1.0)));
                }
            }
        }

        // Stop emissions whose incident wave no longer crosses an active layer.
        let mut kept = Vec::with_capacity(wanted.len());
        for emission in std::mem::take(&mut self.layer_emissions) {
            if wanted.iter().any(|w| w.layer == emission.layer && w.incident == emission.incident) {
                kept.push(emission);
            } else if let Some(wave) = self.waves.iter_mut().find(|w| w.id() == emission.emitted) {
                wave.detach();
                log::debug!("layer {} stopped re-emitting wave {}", emission.layer, emission.emitted);
            }
        }
        self.layer_emissions = kept;

        for (want, (x, intensity)) in wanted.into_iter().zip(intensities) {
            let existing = self
                .layer_emissions
                .iter()
                .find(|e| e.layer == want.layer && e.incident == want.incident)
                .map(|e| e.emitted);
            match existing {
                Some(id) => {
                    if let Some(wave) = self.waves.iter_mut().find(|w| w.id() == id) {
                        wave.drive_intensity_at_start(intensity);
                    }
                }
                None => {
                    let id = self.next_wave_id;
                    self.next_wave_id += 1;
                    let altitude = model.atmosphere_layers()[want.layer].altitude();
                    self.waves.push(Wave::on_checked_path(
                        id,
                        WavelengthClass::Infrared,
                        DVec2::new(x, altitude),
                        DVec2::NEG_Y,
                        0.0,
                        intensity,
                    ));
                    self.layer_emissions.push(LayerEmission { emitted: id, ..want });
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.waves.clear();
        self.next_wave_id = 0;
        self.sun_source.reset();
        self.ground_source.reset();
        self.layer_emissions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::cloud::Cloud;
    use crate::energy::layers_model::LayersModelParams;
    use more_asserts::{assert_gt, assert_le};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layers(active: usize, clouds: Vec<Cloud>) -> LayersModel {
        LayersModel::new(
            &SimConfig::default(),
            LayersModelParams {
                layer_count: 3,
                initially_active_layers: active,
                initial_absorption_proportion: 0.5,
                clouds,
            },
        )
        .unwrap()
    }

    #[test]
    fn cold_ground_sends_no_infrared() {
        let model = layers(1, Vec::new());
        let mut waves = WavesModel::new(&SimConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        waves.step(0.1, &model, &mut rng);
        assert_eq!(waves.ground_ir_intensity(&model), 0.0);
        assert!(waves.waves().iter().all(|w| w.wavelength() == WavelengthClass::Visible));
        assert_eq!(waves.waves().len(), 2);
    }

    #[test]
    fn cloud_attenuates_sunlight() {
        let cloud = Cloud::new(DVec2::new(-10_000.0, 30_000.0), 8_000.0, 2_000.0, 0.6, true).unwrap();
        let model = layers(0, vec![cloud]);
        let mut waves = WavesModel::new(&SimConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..10 {
            waves.step(0.1, &model, &mut rng);
        }
        let under_cloud = waves.waves().iter().find(|w| w.origin().x < 0.0).unwrap();
        assert!(under_cloud.has_attenuator(AttenuatorSource::Cloud(0)));
        let clear = waves.waves().iter().find(|w| w.origin().x > 0.0).unwrap();
        assert!(clear.attenuators().is_empty());
    }

    #[test]
    fn warm_ground_waves_are_reemitted_by_layers() {
        let mut model = layers(2, Vec::new());
        for _ in 0..2_000 {
            model.step(0.1);
        }
        let mut waves = WavesModel::new(&SimConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..30 {
            waves.step(0.1, &model, &mut rng);
        }
        assert_gt!(waves.ground_ir_intensity(&model), 0.0);
        let downward_ir = waves
            .waves()
            .iter()
            .filter(|w| w.wavelength() == WavelengthClass::Infrared && !w.is_moving_up())
            .count();
        // two ground waves, each re-emitted by both active layers
        assert_eq!(downward_ir, 4);
        assert_eq!(waves.layer_emissions().len(), 4);
        for wave in waves.waves() {
            assert_le!(wave.intensity_at_start(), 1.0);
            let end = wave.end_point().y;
            assert!((-1e-9..=model.height_m() + 1e-9).contains(&end));
        }
    }
}
