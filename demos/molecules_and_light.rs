// Fires every light source at every molecule and tallies what happens.

use greenhouse_sim::molecules::{ExcitationState, MoleculeKind};
use greenhouse_sim::photon::WavelengthClass;
use greenhouse_sim::{PhotonAbsorptionModel, SimConfig, Steppable};
use std::collections::BTreeMap;

const STEPS: usize = 1_200;
const DT_S: f64 = 0.05;

fn main() -> greenhouse_sim::Result<()> {
    let config = SimConfig::with_seed(7);
    for kind in MoleculeKind::ALL {
        println!("🧪 {}", kind.formula());
        for light in WavelengthClass::ALL {
            let mut model = PhotonAbsorptionModel::new(&config, kind)?;
            model.set_light_source(light);
            model.set_emission_frequency(5.0)?;
            model.set_emitter_on(true);

            let mut frames_in_state: BTreeMap<&'static str, usize> = BTreeMap::new();
            for _ in 0..STEPS {
                model.step(DT_S);
                let label = match model.excitation_state() {
                    ExcitationState::Idle => continue,
                    ExcitationState::Absorbing => "absorbing",
                    ExcitationState::Vibrating => "vibrating",
                    ExcitationState::Rotating => "rotating",
                    ExcitationState::Glowing => "glowing",
                    ExcitationState::Emitting => "emitting",
                    ExcitationState::BreakingApart => "breaking apart",
                };
                *frames_in_state.entry(label).or_default() += 1;
            }

            let outcome = if model.is_molecule_off_window() {
                "💥 broke apart".to_string()
            } else if frames_in_state.is_empty() {
                "🫥 transparent".to_string()
            } else {
                format!("✨ {:?}", frames_in_state)
            };
            println!("   {:<12} {}", light.as_str(), outcome);
        }
    }
    Ok(())
}
