pub mod cloud;
pub mod concentration_model;
pub mod energy_packet;
pub mod flux_meter;
pub mod layer;
pub mod layers_model;
pub mod rate_tracker;
pub mod substance;
pub mod sun;

pub use cloud::Cloud;
pub use concentration_model::{ConcentrationControlMode, ConcentrationDate, ConcentrationModel};
pub use energy_packet::{EnergyDirection, EnergyPacket};
pub use flux_meter::{FluxMeter, FluxReading};
pub use layer::{EnergyAbsorbingEmittingLayer, GroundLayer};
pub use layers_model::{LayersModel, LayersModelParams};
pub use rate_tracker::EnergyRateTracker;
pub use substance::{LayerSubstance, SubstanceProfile};
pub use sun::SunEnergySource;
