//! Utilities for converting model temperatures (always Kelvin) into the
//! units the displays offer.

use crate::constants::TO_KELVIN;
use serde::{Deserialize, Serialize};

/// Converts Celsius to Kelvin.
pub fn celsius_to_kelvin(temp_c: f64) -> f64 {
    temp_c + TO_KELVIN
}

/// Converts Kelvin to Celsius.
pub fn kelvin_to_celsius(temp_k: f64) -> f64 {
    temp_k - TO_KELVIN
}

/// Converts Kelvin to Fahrenheit.
pub fn kelvin_to_fahrenheit(temp_k: f64) -> f64 {
    kelvin_to_celsius(temp_k) * 9.0 / 5.0 + 32.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TemperatureUnits {
    #[default]
    Kelvin,
    Celsius,
    Fahrenheit,
}

impl TemperatureUnits {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnits::Kelvin => "K",
            TemperatureUnits::Celsius => "°C",
            TemperatureUnits::Fahrenheit => "°F",
        }
    }

    /// Express a Kelvin reading in these units.
    pub fn from_kelvin(&self, temp_k: f64) -> f64 {
        match self {
            TemperatureUnits::Kelvin => temp_k,
            TemperatureUnits::Celsius => kelvin_to_celsius(temp_k),
            TemperatureUnits::Fahrenheit => kelvin_to_fahrenheit(temp_k),
        }
    }

    pub fn format(&self, temp_k: f64) -> String {
        format!("{:.1}{}", self.from_kelvin(temp_k), self.as_str())
    }
}

/// Blackbody equilibrium temperature for a surface absorbing `absorbed_flux_w_m2`
/// and radiating from one face.
pub fn radiative_equilibrium_kelvin(absorbed_flux_w_m2: f64) -> f64 {
    (absorbed_flux_w_m2.max(0.0) / crate::constants::STEFAN_BOLTZMANN_CONSTANT).powf(0.25)
}
