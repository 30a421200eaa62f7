//! Immutable simulation configuration handed to the top-level model
//! constructors. Every section defaults to the tuned values in
//! `constants.rs`, so a JSON file only needs to list what it overrides.

use crate::constants::*;
use crate::error::{check_range, check_unit_interval, GreenhouseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the single generator that feeds every random draw.
    pub seed: u64,
    /// Frames longer than this are clamped before stepping.
    pub max_dt: f64,
    /// Time advanced by a single step while paused.
    pub single_step_dt: f64,
    pub slow_speed_factor: f64,
    pub atmosphere: AtmosphereConfig,
    pub photons: PhotonConfig,
    pub waves: WaveConfig,
    pub molecules: MoleculesConfig,
    pub layer_model: LayerModelConfig,
    pub concentration: ConcentrationConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_dt: MAX_DT_S,
            single_step_dt: SINGLE_STEP_DT_S,
            slow_speed_factor: SLOW_SPEED_FACTOR,
            atmosphere: AtmosphereConfig::default(),
            photons: PhotonConfig::default(),
            waves: WaveConfig::default(),
            molecules: MoleculesConfig::default(),
            layer_model: LayerModelConfig::default(),
            concentration: ConcentrationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereConfig {
    pub height_m: f64,
    pub sunlight_span_m: f64,
    pub surface_area_m2: f64,
    pub light_speed_m_per_s: f64,
    pub solar_constant_w_per_m2: f64,
    pub ground_minimum_temperature_k: f64,
    pub layer_minimum_temperature_k: f64,
    pub ground_albedo: f64,
    /// Averaging window for energy rate readings.
    pub energy_accumulation_period_s: f64,
    pub radiative_balance_threshold_w_per_m2: f64,
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            height_m: HEIGHT_OF_ATMOSPHERE_M,
            sunlight_span_m: SUNLIGHT_SPAN_M,
            surface_area_m2: SURFACE_AREA_M2,
            light_speed_m_per_s: LIGHT_SPEED_M_PER_S,
            solar_constant_w_per_m2: SOLAR_CONSTANT_W_PER_M2,
            ground_minimum_temperature_k: GROUND_MINIMUM_TEMPERATURE_K,
            layer_minimum_temperature_k: LAYER_MINIMUM_TEMPERATURE_K,
            ground_albedo: DEFAULT_GROUND_ALBEDO,
            energy_accumulation_period_s: ENERGY_ACCUMULATION_PERIOD_S,
            radiative_balance_threshold_w_per_m2: RADIATIVE_BALANCE_THRESHOLD_W_PER_M2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotonConfig {
    pub visible_creation_rate: f64,
    pub ir_emission_scale: f64,
    pub speed_m_per_s: f64,
    pub ir_angle_jitter_rad: f64,
}

impl Default for PhotonConfig {
    fn default() -> Self {
        Self {
            visible_creation_rate: VISIBLE_PHOTON_CREATION_RATE,
            ir_emission_scale: IR_PHOTON_EMISSION_SCALE,
            speed_m_per_s: LIGHT_SPEED_M_PER_S,
            ir_angle_jitter_rad: IR_PHOTON_ANGLE_JITTER_RAD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub speed_m_per_s: f64,
    pub lifetime_min_s: f64,
    pub lifetime_max_s: f64,
    pub time_between_waves_s: f64,
    pub phase_rate_rad_per_s: f64,
    /// Paired horizontal source positions for sunlight waves.
    pub sun_source_x_pairs: Vec<(f64, f64)>,
    /// Paired horizontal source positions for ground infrared waves.
    pub ground_source_x_pairs: Vec<(f64, f64)>,
    /// Ground temperature at which infrared waves reach full intensity.
    pub ir_full_intensity_temperature_k: f64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            speed_m_per_s: LIGHT_SPEED_M_PER_S,
            lifetime_min_s: WAVE_LIFETIME_MIN_S,
            lifetime_max_s: WAVE_LIFETIME_MAX_S,
            time_between_waves_s: TIME_BETWEEN_WAVES_S,
            phase_rate_rad_per_s: WAVE_PHASE_RATE_RAD_PER_S,
            sun_source_x_pairs: vec![(-12_000.0, -8_000.0), (6_000.0, 10_000.0)],
            ground_source_x_pairs: vec![(-16_000.0, -4_000.0), (2_000.0, 14_000.0)],
            ir_full_intensity_temperature_k: IR_WAVE_FULL_INTENSITY_TEMPERATURE_K,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoleculesConfig {
    pub photon_speed: f64,
    pub emitter_x: f64,
    pub container_half_width: f64,
    pub container_half_height: f64,
    pub capture_radius: f64,
    pub emission_frequency_hz: f64,
    pub max_emission_frequency_hz: f64,
    pub min_hold_time_s: f64,
    pub max_hold_time_s: f64,
    pub absorption_hysteresis_s: f64,
    pub break_apart_speed: f64,
}

impl Default for MoleculesConfig {
    fn default() -> Self {
        Self {
            photon_speed: MOLECULE_PHOTON_SPEED_PM_PER_S,
            emitter_x: PHOTON_EMITTER_X_PM,
            container_half_width: CONTAINER_HALF_WIDTH_PM,
            container_half_height: CONTAINER_HALF_HEIGHT_PM,
            capture_radius: PHOTON_CAPTURE_RADIUS_PM,
            emission_frequency_hz: DEFAULT_EMISSION_FREQUENCY_HZ,
            max_emission_frequency_hz: MAX_EMISSION_FREQUENCY_HZ,
            min_hold_time_s: MIN_PHOTON_HOLD_TIME_S,
            max_hold_time_s: MAX_PHOTON_HOLD_TIME_S,
            absorption_hysteresis_s: ABSORPTION_HYSTERESIS_TIME_S,
            break_apart_speed: BREAK_APART_SPEED_PM_PER_S,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerModelConfig {
    pub max_layers: usize,
    pub initial_active_layers: usize,
    pub initial_absorption_proportion: f64,
    pub sun_output_multiplier_range: (f64, f64),
    pub albedo_range: (f64, f64),
}

impl Default for LayerModelConfig {
    fn default() -> Self {
        Self {
            max_layers: LAYER_MODEL_MAX_LAYERS,
            initial_active_layers: 1,
            initial_absorption_proportion: DEFAULT_LAYER_ABSORPTION_PROPORTION,
            sun_output_multiplier_range: (MIN_SUN_OUTPUT_MULTIPLIER, MAX_SUN_OUTPUT_MULTIPLIER),
            albedo_range: (MIN_GROUND_ALBEDO, MAX_GROUND_ALBEDO),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcentrationConfig {
    pub layer_count: usize,
    pub max_layer_absorption: f64,
    pub initial_concentration: f64,
}

impl Default for ConcentrationConfig {
    fn default() -> Self {
        Self {
            layer_count: CONCENTRATION_LAYER_COUNT,
            max_layer_absorption: MAX_LAYER_ABSORPTION_PROPORTION,
            initial_concentration: DEFAULT_CONCENTRATION,
        }
    }
}

impl SimConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(GreenhouseError::InvalidParam(format!(
                    "{name} must be positive, got {value}"
                )))
            }
        }

        fn ordered(name: &str, (min, max): (f64, f64)) -> Result<()> {
            if min.is_finite() && max.is_finite() && min <= max {
                Ok(())
            } else {
                Err(GreenhouseError::InvalidParam(format!(
                    "{name} [{min}, {max}] is not an ordered range"
                )))
            }
        }

        positive("max_dt", self.max_dt)?;
        positive("single_step_dt", self.single_step_dt)?;
        positive("slow_speed_factor", self.slow_speed_factor)?;

        let atmo = &self.atmosphere;
        positive("atmosphere.height_m", atmo.height_m)?;
        positive("atmosphere.sunlight_span_m", atmo.sunlight_span_m)?;
        positive("atmosphere.surface_area_m2", atmo.surface_area_m2)?;
        positive("atmosphere.light_speed_m_per_s", atmo.light_speed_m_per_s)?;
        positive("atmosphere.energy_accumulation_period_s", atmo.energy_accumulation_period_s)?;
        positive("atmosphere.ground_minimum_temperature_k", atmo.ground_minimum_temperature_k)?;
        positive("atmosphere.layer_minimum_temperature_k", atmo.layer_minimum_temperature_k)?;
        check_unit_interval("atmosphere.ground_albedo", atmo.ground_albedo)?;

        let photons = &self.photons;
        positive("photons.speed_m_per_s", photons.speed_m_per_s)?;
        check_range(
            "photons.visible_creation_rate",
            photons.visible_creation_rate,
            0.0,
            MAX_VISIBLE_PHOTON_CREATION_RATE,
        )?;
        check_range(
            "photons.ir_emission_scale",
            photons.ir_emission_scale,
            0.0,
            MAX_IR_PHOTON_EMISSION_SCALE,
        )?;
        check_range(
            "photons.ir_angle_jitter_rad",
            photons.ir_angle_jitter_rad,
            0.0,
            std::f64::consts::FRAC_PI_2,
        )?;

        positive("waves.speed_m_per_s", self.waves.speed_m_per_s)?;
        positive("waves.time_between_waves_s", self.waves.time_between_waves_s)?;
        positive("waves.ir_full_intensity_temperature_k", self.waves.ir_full_intensity_temperature_k)?;
        if self.waves.lifetime_min_s <= 0.0 || self.waves.lifetime_max_s < self.waves.lifetime_min_s {
            return Err(GreenhouseError::InvalidParam(format!(
                "wave lifetime range [{}, {}] is empty",
                self.waves.lifetime_min_s, self.waves.lifetime_max_s
            )));
        }

        let mol = &self.molecules;
        positive("molecules.photon_speed", mol.photon_speed)?;
        positive("molecules.capture_radius", mol.capture_radius)?;
        positive("molecules.container_half_width", mol.container_half_width)?;
        positive("molecules.container_half_height", mol.container_half_height)?;
        positive("molecules.break_apart_speed", mol.break_apart_speed)?;
        positive("molecules.max_emission_frequency_hz", mol.max_emission_frequency_hz)?;
        check_range(
            "molecules.emission_frequency_hz",
            mol.emission_frequency_hz,
            0.0,
            mol.max_emission_frequency_hz,
        )?;
        check_range("molecules.absorption_hysteresis_s", mol.absorption_hysteresis_s, 0.0, f64::MAX)?;
        if mol.min_hold_time_s <= 0.0 || mol.max_hold_time_s < mol.min_hold_time_s {
            return Err(GreenhouseError::InvalidParam(format!(
                "photon hold time range [{}, {}] is empty",
                mol.min_hold_time_s, mol.max_hold_time_s
            )));
        }

        let lm = &self.layer_model;
        if lm.initial_active_layers > lm.max_layers {
            return Err(GreenhouseError::InvalidParam(format!(
                "initial_active_layers {} exceeds max_layers {}",
                lm.initial_active_layers, lm.max_layers
            )));
        }
        check_unit_interval(
            "layer_model.initial_absorption_proportion",
            lm.initial_absorption_proportion,
        )?;
        ordered("layer_model.sun_output_multiplier_range", lm.sun_output_multiplier_range)?;
        let (min_multiplier, max_multiplier) = lm.sun_output_multiplier_range;
        positive("layer_model.sun_output_multiplier_range min", min_multiplier)?;
        check_range(
            "default sun output multiplier",
            DEFAULT_SUN_OUTPUT_MULTIPLIER,
            min_multiplier,
            max_multiplier,
        )?;
        ordered("layer_model.albedo_range", lm.albedo_range)?;
        let (min_albedo, max_albedo) = lm.albedo_range;
        check_unit_interval("layer_model.albedo_range min", min_albedo)?;
        check_unit_interval("layer_model.albedo_range max", max_albedo)?;
        check_range("atmosphere.ground_albedo", atmo.ground_albedo, min_albedo, max_albedo)?;

        check_unit_interval(
            "concentration.max_layer_absorption",
            self.concentration.max_layer_absorption,
        )?;
        check_unit_interval(
            "concentration.initial_concentration",
            self.concentration.initial_concentration,
        )?;
        Ok(())
    }
}
