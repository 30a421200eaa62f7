//! Top-level model behind the Waves, Photons and Layer Model screens.
//!
//! The energy model always steps; the light representation (photons or
//! waves) then reads its state. All randomness comes from one seeded
//! generator owned here.

use crate::config::SimConfig;
use crate::constants::*;
use crate::energy::cloud::Cloud;
use crate::energy::concentration_model::{ConcentrationControlMode, ConcentrationDate, ConcentrationModel};
use crate::energy::flux_meter::FluxReading;
use crate::energy::layers_model::{LayersModel, LayersModelParams};
use crate::error::{GreenhouseError, Result};
use crate::photon::Photon;
use crate::photon_collection::PhotonCollection;
use crate::sim::{clamp_dt, Resettable, Steppable, TimeSpeed};
use crate::temp_utils::TemperatureUnits;
use crate::waves::{Wave, WavesModel};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Waves,
    Photons,
    LayerModel,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Waves => "waves",
            Screen::Photons => "photons",
            Screen::LayerModel => "layer model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AtmosphereModel {
    Concentration(ConcentrationModel),
    Layers(LayersModel),
}

impl AtmosphereModel {
    pub fn layers(&self) -> &LayersModel {
        match self {
            AtmosphereModel::Concentration(model) => model.layers(),
            AtmosphereModel::Layers(model) => model,
        }
    }

    fn layers_mut(&mut self) -> &mut LayersModel {
        match self {
            AtmosphereModel::Concentration(model) => model.layers_mut(),
            AtmosphereModel::Layers(model) => model,
        }
    }

    fn step(&mut self, dt: f64) {
        match self {
            AtmosphereModel::Concentration(model) => model.step(dt),
            AtmosphereModel::Layers(model) => model.step(dt),
        }
    }

    fn reset(&mut self) {
        match self {
            AtmosphereModel::Concentration(model) => model.reset(),
            AtmosphereModel::Layers(model) => model.reset(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LightRepresentation {
    Photons(PhotonCollection),
    Waves(WavesModel),
}

/// Serializable picture of everything the views read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreenhouseSnapshot {
    pub screen: Screen,
    pub elapsed_s: f64,
    pub surface_temperature_k: f64,
    pub layer_temperatures_k: Vec<f64>,
    pub layer_absorptions: Vec<f64>,
    pub active_layers: usize,
    pub flux: FluxReading,
    pub energy_in_w_per_m2: f64,
    pub energy_out_w_per_m2: f64,
    pub in_radiative_balance: bool,
    pub photons: Vec<Photon>,
    pub waves: Vec<Wave>,
}

pub struct GreenhouseModel {
    config: SimConfig,
    screen: Screen,
    rng: StdRng,
    atmosphere: AtmosphereModel,
    light: LightRepresentation,
    is_playing: bool,
    time_speed: TimeSpeed,
    temperature_units: TemperatureUnits,
    elapsed_s: f64,
}

impl GreenhouseModel {
    pub fn new(config: SimConfig, screen: Screen) -> Result<Self> {
        config.validate()?;
        let atmosphere = match screen {
            Screen::Waves | Screen::Photons => {
                let cloud = Cloud::new(
                    DVec2::new(DEFAULT_CLOUD_X_M, DEFAULT_CLOUD_ALTITUDE_M),
                    DEFAULT_CLOUD_WIDTH_M,
                    DEFAULT_CLOUD_HEIGHT_M,
                    DEFAULT_CLOUD_REFLECTIVITY,
                    false,
                )?;
                AtmosphereModel::Concentration(ConcentrationModel::new(&config, vec![cloud])?)
            }
            Screen::LayerModel => {
                let lm = &config.layer_model;
                AtmosphereModel::Layers(LayersModel::new(
                    &config,
                    LayersModelParams {
                        layer_count: lm.max_layers,
                        initially_active_layers: lm.initial_active_layers,
                        initial_absorption_proportion: lm.initial_absorption_proportion,
                        clouds: Vec::new(),
                    },
                )?)
            }
        };
        let light = match screen {
            Screen::Waves => LightRepresentation::Waves(WavesModel::new(&config)?),
            Screen::Photons | Screen::LayerModel => LightRepresentation::Photons(PhotonCollection::new(&config)),
        };
        log::info!("{} screen model created (seed {})", screen.as_str(), config.seed);

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            screen,
            atmosphere,
            light,
            is_playing: true,
            time_speed: TimeSpeed::Normal,
            temperature_units: TemperatureUnits::Kelvin,
            elapsed_s: 0.0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn atmosphere(&self) -> &AtmosphereModel {
        &self.atmosphere
    }

    pub fn layers(&self) -> &LayersModel {
        self.atmosphere.layers()
    }

    pub fn light(&self) -> &LightRepresentation {
        &self.light
    }

    pub fn photons(&self) -> &[Photon] {
        match &self.light {
            LightRepresentation::Photons(collection) => collection.photons(),
            LightRepresentation::Waves(_) => &[],
        }
    }

    pub fn waves(&self) -> &[Wave] {
        match &self.light {
            LightRepresentation::Waves(waves) => waves.waves(),
            LightRepresentation::Photons(_) => &[],
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn time_speed(&self) -> TimeSpeed {
        self.time_speed
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    pub fn surface_temperature_k(&self) -> f64 {
        self.layers().surface_temperature_k()
    }

    pub fn temperature_units(&self) -> TemperatureUnits {
        self.temperature_units
    }

    /// Ground temperature formatted in the selected display units.
    pub fn surface_temperature_display(&self) -> String {
        self.temperature_units.format(self.surface_temperature_k())
    }

    pub fn flux_reading(&self) -> FluxReading {
        self.layers().flux_reading()
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn set_time_speed(&mut self, speed: TimeSpeed) {
        self.time_speed = speed;
    }

    pub fn set_temperature_units(&mut self, units: TemperatureUnits) {
        self.temperature_units = units;
    }

    pub fn set_sun_shining(&mut self, shining: bool) {
        self.atmosphere.layers_mut().set_sun_shining(shining);
    }

    pub fn set_cloud_enabled(&mut self, index: usize, enabled: bool) -> Result<()> {
        self.atmosphere.layers_mut().set_cloud_enabled(index, enabled)
    }

    pub fn set_flux_sensor_altitude(&mut self, altitude: f64) -> Result<()> {
        self.atmosphere.layers_mut().set_flux_sensor_altitude(altitude)
    }

    fn concentration_model(&mut self) -> Result<&mut ConcentrationModel> {
        match &mut self.atmosphere {
            AtmosphereModel::Concentration(model) => Ok(model),
            AtmosphereModel::Layers(_) => Err(GreenhouseError::UnsupportedOnScreen("greenhouse gas concentration")),
        }
    }

    fn layer_model(&mut self, command: &'static str) -> Result<&mut LayersModel> {
        match &mut self.atmosphere {
            AtmosphereModel::Layers(model) => Ok(model),
            AtmosphereModel::Concentration(_) => Err(GreenhouseError::UnsupportedOnScreen(command)),
        }
    }

    pub fn set_concentration(&mut self, concentration: f64) -> Result<()> {
        self.concentration_model()?.set_concentration(concentration)
    }

    pub fn set_concentration_control_mode(&mut self, mode: ConcentrationControlMode) -> Result<()> {
        self.concentration_model()?.set_control_mode(mode)
    }

    pub fn set_concentration_date(&mut self, date: ConcentrationDate) -> Result<()> {
        self.concentration_model()?.set_date(date)
    }

    pub fn set_active_layer_count(&mut self, count: usize) -> Result<()> {
        self.layer_model("number of atmosphere layers")?.set_active_layer_count(count)
    }

    pub fn set_layer_absorption(&mut self, index: usize, proportion: f64) -> Result<()> {
        self.layer_model("per-layer absorption")?.set_layer_absorption(index, proportion)
    }

    pub fn set_all_layer_absorption(&mut self, proportion: f64) -> Result<()> {
        self.layer_model("layer absorption")?.set_all_layer_absorption(proportion)
    }

    pub fn set_sun_output_multiplier(&mut self, multiplier: f64) -> Result<()> {
        self.layer_model("sun output multiplier")?.set_sun_output_multiplier(multiplier)
    }

    pub fn set_ground_albedo(&mut self, albedo: f64) -> Result<()> {
        self.layer_model("ground albedo")?.set_ground_albedo(albedo)
    }

    /// Advance one fixed frame regardless of play state.
    pub fn step_once(&mut self) {
        self.step_model(self.config.single_step_dt);
    }

    fn step_model(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        self.elapsed_s += dt;
        self.atmosphere.step(dt);
        let layers = self.atmosphere.layers();
        match &mut self.light {
            LightRepresentation::Photons(collection) => collection.step(dt, layers, &mut self.rng),
            LightRepresentation::Waves(waves) => waves.step(dt, layers, &mut self.rng),
        }
    }

    pub fn snapshot(&self) -> GreenhouseSnapshot {
        let layers = self.layers();
        let area = layers.surface_area_m2();
        GreenhouseSnapshot {
            screen: self.screen,
            elapsed_s: self.elapsed_s,
            surface_temperature_k: layers.surface_temperature_k(),
            layer_temperatures_k: layers.atmosphere_layers().iter().map(|l| l.temperature_k()).collect(),
            layer_absorptions: layers
                .atmosphere_layers()
                .iter()
                .map(|l| l.energy_absorption_proportion())
                .collect(),
            active_layers: layers.active_layer_count(),
            flux: layers.flux_reading(),
            energy_in_w_per_m2: layers.energy_in_rate_w() / area,
            energy_out_w_per_m2: layers.energy_out_rate_w() / area,
            in_radiative_balance: layers.is_in_radiative_balance(),
            photons: self.photons().to_vec(),
            waves: self.waves().to_vec(),
        }
    }

    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}

impl Steppable for GreenhouseModel {
    fn step(&mut self, dt: f64) {
        if !self.is_playing {
            return;
        }
        let dt = clamp_dt(dt, self.config.max_dt) * self.time_speed.factor(self.config.slow_speed_factor);
        self.step_model(dt);
    }
}

impl Resettable for GreenhouseModel {
    fn reset(&mut self) {
        log::info!("{} screen model reset", self.screen.as_str());
        self.rng = StdRng::seed_from_u64(self.config.seed);
        self.atmosphere.reset();
        match &mut self.light {
            LightRepresentation::Photons(collection) => collection.reset(),
            LightRepresentation::Waves(waves) => waves.reset(),
        }
        self.is_playing = true;
        self.time_speed = TimeSpeed::Normal;
        self.temperature_units = TemperatureUnits::Kelvin;
        self.elapsed_s = 0.0;
    }
}
