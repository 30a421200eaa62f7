pub mod wave;
pub mod wave_source;
pub mod waves_model;

pub use wave::{AttenuatorSource, Wave, WaveAttenuator, WaveId};
pub use wave_source::EMWaveSource;
pub use waves_model::{LayerEmission, WavesModel};
