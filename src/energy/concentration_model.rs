use crate::config::SimConfig;
use crate::energy::cloud::Cloud;
use crate::energy::layers_model::{LayersModel, LayersModelParams};
use crate::error::{check_unit_interval, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConcentrationControlMode {
    #[default]
    ByValue,
    ByDate,
}

/// Historical greenhouse gas levels offered by the date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcentrationDate {
    IceAge,
    Year1750,
    Year1950,
    Year2020,
}

// ppm of CO2 that corresponds to a concentration of 1.0
const FULL_SCALE_CO2_PPM: f64 = 1000.0;

impl ConcentrationDate {
    pub fn co2_ppm(&self) -> f64 {
        match self {
            ConcentrationDate::IceAge => 180.0,
            ConcentrationDate::Year1750 => 280.0,
            ConcentrationDate::Year1950 => 311.0,
            ConcentrationDate::Year2020 => 413.0,
        }
    }

    pub fn concentration(&self) -> f64 {
        self.co2_ppm() / FULL_SCALE_CO2_PPM
    }
}

/// Twelve always-on layers whose absorption follows one greenhouse gas
/// concentration value, as used by the Waves and Photons screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationModel {
    layers: LayersModel,
    concentration: f64,
    initial_concentration: f64,
    max_layer_absorption: f64,
    control_mode: ConcentrationControlMode,
    date: ConcentrationDate,
}

impl ConcentrationModel {
    pub fn new(config: &SimConfig, clouds: Vec<Cloud>) -> Result<Self> {
        let conc = &config.concentration;
        check_unit_interval("concentration", conc.initial_concentration)?;
        let layers = LayersModel::new(
            config,
            LayersModelParams {
                layer_count: conc.layer_count,
                initially_active_layers: conc.layer_count,
                initial_absorption_proportion: conc.initial_concentration * conc.max_layer_absorption,
                clouds,
            },
        )?;
        Ok(Self {
            layers,
            concentration: conc.initial_concentration,
            initial_concentration: conc.initial_concentration,
            max_layer_absorption: conc.max_layer_absorption,
            control_mode: ConcentrationControlMode::ByValue,
            date: ConcentrationDate::Year2020,
        })
    }

    pub fn step(&mut self, dt: f64) {
        self.layers.step(dt);
    }

    pub fn reset(&mut self) {
        self.layers.reset();
        self.concentration = self.initial_concentration;
        self.control_mode = ConcentrationControlMode::ByValue;
        self.date = ConcentrationDate::Year2020;
    }

    pub fn layers(&self) -> &LayersModel {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayersModel {
        &mut self.layers
    }

    pub fn control_mode(&self) -> ConcentrationControlMode {
        self.control_mode
    }

    pub fn date(&self) -> ConcentrationDate {
        self.date
    }

    /// Concentration currently driving the layers, whichever control is in use.
    pub fn concentration(&self) -> f64 {
        match self.control_mode {
            ConcentrationControlMode::ByValue => self.concentration,
            ConcentrationControlMode::ByDate => self.date.concentration(),
        }
    }

    pub fn set_concentration(&mut self, concentration: f64) -> Result<()> {
        check_unit_interval("concentration", concentration)?;
        self.concentration = concentration;
        self.apply_concentration()
    }

    pub fn set_control_mode(&mut self, mode: ConcentrationControlMode) -> Result<()> {
        self.control_mode = mode;
        self.apply_concentration()
    }

    pub fn set_date(&mut self, date: ConcentrationDate) -> Result<()> {
        self.date = date;
        self.apply_concentration()
    }

    fn apply_concentration(&mut self) -> Result<()> {
        let proportion = self.concentration() * self.max_layer_absorption;
        log::debug!("concentration {:.3} -> layer absorption {:.4}", self.concentration(), proportion);
        self.layers.set_all_layer_absorption(proportion)
    }
}
