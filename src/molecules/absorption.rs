// Which photons each molecule absorbs, and what the absorbed energy does.

use crate::constants::{BREAK_APART_PROBABILITY, DEFAULT_ABSORPTION_PROBABILITY};
use crate::molecules::molecule::MoleculeKind;
use crate::photon::WavelengthClass;
use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExcitationMode {
    Vibration,
    Rotation,
    Glow,
    BreakApart,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotonAbsorptionStrategy {
    pub mode: ExcitationMode,
    pub probability: f64,
}

impl PhotonAbsorptionStrategy {
    /// One draw from `rng` decides whether the photon is taken.
    pub fn accepts<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.random::<f64>() < self.probability
    }
}

pub static ABSORPTION_STRATEGIES: Lazy<HashMap<(MoleculeKind, WavelengthClass), PhotonAbsorptionStrategy>> =
    Lazy::new(|| {
        use ExcitationMode::*;
        use MoleculeKind::*;
        use WavelengthClass::*;

        let entries = [
            (CarbonMonoxide, Microwave, Rotation),
            (CarbonMonoxide, Infrared, Vibration),
            (CarbonDioxide, Infrared, Vibration),
            (Water, Microwave, Rotation),
            (Water, Infrared, Vibration),
            (Methane, Infrared, Vibration),
            (NitrogenDioxide, Microwave, Rotation),
            (NitrogenDioxide, Infrared, Vibration),
            (NitrogenDioxide, Visible, Glow),
            (NitrogenDioxide, Ultraviolet, BreakApart),
            (Ozone, Microwave, Rotation),
            (Ozone, Infrared, Vibration),
            (Ozone, Ultraviolet, BreakApart),
        ];

        let mut m = HashMap::new();
        for (kind, wavelength, mode) in entries {
            let probability = if mode == BreakApart {
                BREAK_APART_PROBABILITY
            } else {
                DEFAULT_ABSORPTION_PROBABILITY
            };
            m.insert((kind, wavelength), PhotonAbsorptionStrategy { mode, probability });
        }
        m
    });

/// The strategy a molecule applies to a photon, or `None` if it is transparent
/// to that wavelength (N2 and O2 are transparent to everything).
pub fn absorption_strategy(kind: MoleculeKind, wavelength: WavelengthClass) -> Option<&'static PhotonAbsorptionStrategy> {
    ABSORPTION_STRATEGIES.get(&(kind, wavelength))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn nitrogen_and_oxygen_are_transparent() {
        for wavelength in WavelengthClass::ALL {
            assert!(absorption_strategy(MoleculeKind::Nitrogen, wavelength).is_none());
            assert!(absorption_strategy(MoleculeKind::Oxygen, wavelength).is_none());
        }
    }

    #[test]
    fn mode_is_fixed_by_kind_and_wavelength() {
        let co2 = absorption_strategy(MoleculeKind::CarbonDioxide, WavelengthClass::Infrared).unwrap();
        assert_eq!(co2.mode, ExcitationMode::Vibration);
        assert!(absorption_strategy(MoleculeKind::CarbonDioxide, WavelengthClass::Visible).is_none());
        assert_eq!(
            absorption_strategy(MoleculeKind::Ozone, WavelengthClass::Ultraviolet).unwrap().mode,
            ExcitationMode::BreakApart
        );
        assert_eq!(
            absorption_strategy(MoleculeKind::NitrogenDioxide, WavelengthClass::Visible).unwrap().mode,
            ExcitationMode::Glow
        );
        assert_eq!(
            absorption_strategy(MoleculeKind::Water, WavelengthClass::Microwave).unwrap().mode,
            ExcitationMode::Rotation
        );
    }

    #[test]
    fn acceptance_rate_follows_probability() {
        let strategy = absorption_strategy(MoleculeKind::Methane, WavelengthClass::Infrared).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let accepted = (0..10_000).filter(|_| strategy.accepts(&mut rng)).count();
        assert!((4_500..5_500).contains(&accepted), "accepted {accepted}");
    }
}
