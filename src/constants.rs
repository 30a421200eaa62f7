pub const STEFAN_BOLTZMANN_CONSTANT: f64 = 5.670374419e-8; // W/(m²·K⁴)
pub const TO_KELVIN: f64 = 273.15;

// Modelled atmosphere geometry (meters)
pub const HEIGHT_OF_ATMOSPHERE_M: f64 = 50_000.0;
pub const SUNLIGHT_SPAN_M: f64 = 40_000.0;
pub const SURFACE_WIDTH_M: f64 = 100_000.0;
pub const SURFACE_DEPTH_M: f64 = 100_000.0;
pub const SURFACE_AREA_M2: f64 = SURFACE_WIDTH_M * SURFACE_DEPTH_M;

// Light travels far slower than c so transit across the atmosphere is visible.
pub const LIGHT_SPEED_M_PER_S: f64 = 30_000.0;

// Sunlight
pub const SOLAR_CONSTANT_W_PER_M2: f64 = 1361.0;
pub const SUNLIGHT_SPHERE_FRACTION: f64 = 0.25; // disc-to-sphere averaging
pub const DEFAULT_SUN_OUTPUT_MULTIPLIER: f64 = 1.0;
pub const MIN_SUN_OUTPUT_MULTIPLIER: f64 = 0.5;
pub const MAX_SUN_OUTPUT_MULTIPLIER: f64 = 2.0;

// Ground reflectivity for visible light
pub const DEFAULT_GROUND_ALBEDO: f64 = 0.3;
pub const MIN_GROUND_ALBEDO: f64 = 0.0;
pub const MAX_GROUND_ALBEDO: f64 = 0.9;

// Temperature floors
pub const GROUND_MINIMUM_TEMPERATURE_K: f64 = 125.0;
pub const LAYER_MINIMUM_TEMPERATURE_K: f64 = 125.0;

// Layer model screen
pub const LAYER_MODEL_MAX_LAYERS: usize = 3;
pub const DEFAULT_LAYER_ABSORPTION_PROPORTION: f64 = 1.0;

// Concentration screens
pub const CONCENTRATION_LAYER_COUNT: usize = 12;
pub const MAX_LAYER_ABSORPTION_PROPORTION: f64 = 0.2;
pub const DEFAULT_CONCENTRATION: f64 = 0.5;

// Cloud offered on the Waves and Photons screens (off until toggled)
pub const DEFAULT_CLOUD_X_M: f64 = -10_000.0;
pub const DEFAULT_CLOUD_ALTITUDE_M: f64 = 20_000.0;
pub const DEFAULT_CLOUD_WIDTH_M: f64 = 8_000.0;
pub const DEFAULT_CLOUD_HEIGHT_M: f64 = 2_000.0;
pub const DEFAULT_CLOUD_REFLECTIVITY: f64 = 0.4;

// Energy bookkeeping
pub const ENERGY_ACCUMULATION_PERIOD_S: f64 = 1.0;
pub const RADIATIVE_BALANCE_THRESHOLD_W_PER_M2: f64 = 1.0;
pub const MIN_PACKET_ENERGY_J: f64 = 1.0e-3;

// Discrete photons
pub const VISIBLE_PHOTON_CREATION_RATE: f64 = 4.0; // photons per second
pub const IR_PHOTON_EMISSION_SCALE: f64 = 0.05; // photons per second per kelvin above minimum
pub const MAX_VISIBLE_PHOTON_CREATION_RATE: f64 = 100.0;
pub const MAX_IR_PHOTON_EMISSION_SCALE: f64 = 10.0;
pub const IR_PHOTON_ANGLE_JITTER_RAD: f64 = std::f64::consts::PI / 10.0;

// Waves
pub const WAVE_LIFETIME_MIN_S: f64 = 8.0;
pub const WAVE_LIFETIME_MAX_S: f64 = 15.0;
pub const TIME_BETWEEN_WAVES_S: f64 = 0.5;
pub const WAVE_PHASE_RATE_RAD_PER_S: f64 = 3.0 * std::f64::consts::PI;
pub const IR_WAVE_FULL_INTENSITY_TEMPERATURE_K: f64 = 295.0;

// Molecules and Light (picometers and seconds)
pub const MOLECULE_PHOTON_SPEED_PM_PER_S: f64 = 2_000.0;
pub const PHOTON_EMITTER_X_PM: f64 = -1_200.0;
pub const CONTAINER_HALF_WIDTH_PM: f64 = 1_500.0;
pub const CONTAINER_HALF_HEIGHT_PM: f64 = 800.0;
pub const PHOTON_CAPTURE_RADIUS_PM: f64 = 100.0;
pub const DEFAULT_EMISSION_FREQUENCY_HZ: f64 = 1.0;
pub const MAX_EMISSION_FREQUENCY_HZ: f64 = 5.0;
pub const MIN_PHOTON_HOLD_TIME_S: f64 = 0.6;
pub const MAX_PHOTON_HOLD_TIME_S: f64 = 1.2;
pub const ABSORPTION_HYSTERESIS_TIME_S: f64 = 0.2;
pub const DEFAULT_ABSORPTION_PROBABILITY: f64 = 0.5;
pub const BREAK_APART_PROBABILITY: f64 = 0.5;
pub const BREAK_APART_SPEED_PM_PER_S: f64 = 1_000.0;
pub const VIBRATION_FREQUENCY_HZ: f64 = 5.0;
pub const ROTATION_RATE_RAD_PER_S: f64 = std::f64::consts::PI;
pub const VIBRATION_AMPLITUDE_PM: f64 = 15.0;

// Stepping
pub const MAX_DT_S: f64 = 0.1;
pub const SINGLE_STEP_DT_S: f64 = 1.0 / 60.0;
pub const SLOW_SPEED_FACTOR: f64 = 0.5;
