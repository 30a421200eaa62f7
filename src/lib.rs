pub mod config;
pub mod constants;
pub mod energy;
pub mod error;
pub mod model;
pub mod molecules;
pub mod photon;
pub mod photon_collection;
pub mod sim;
pub mod temp_utils;
pub mod waves;

pub use config::SimConfig;
pub use error::{GreenhouseError, Result};
pub use model::{GreenhouseModel, GreenhouseSnapshot, Screen};
pub use molecules::PhotonAbsorptionModel;
pub use sim::{Resettable, Steppable, TimeSpeed};
