// Thermal properties of the bodies that absorb and emit energy.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerSubstance {
    Ground,
    Air,
}

impl LayerSubstance {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerSubstance::Ground => "ground",
            LayerSubstance::Air => "air",
        }
    }

    pub fn profile(&self) -> &'static SubstanceProfile {
        &SUBSTANCE_PROFILES[self]
    }
}

#[derive(Debug, Clone)]
pub struct SubstanceProfile {
    pub kind: LayerSubstance,
    pub density_kg_m3: f64,
    pub specific_heat_j_per_kg_k: f64,
    /// Slab thickness; kept thin so the body reaches equilibrium within
    /// a few minutes of simulated time.
    pub thickness_m: f64,
    /// Faces that radiate (the ground only radiates upward).
    pub radiating_faces: u8,
}

impl SubstanceProfile {
    /// Heat capacity in J/K of a slab of this substance covering `area_m2`.
    pub fn heat_capacity_j_per_k(&self, area_m2: f64) -> f64 {
        let mass_kg = area_m2 * self.thickness_m * self.density_kg_m3;
        mass_kg * self.specific_heat_j_per_kg_k
    }
}

pub static SUBSTANCE_PROFILES: Lazy<HashMap<LayerSubstance, SubstanceProfile>> = Lazy::new(|| {
    use LayerSubstance::*;
    let mut m = HashMap::new();

    m.insert(Ground, SubstanceProfile {
        kind: Ground,
        density_kg_m3: 1500.0,
        specific_heat_j_per_kg_k: 1000.0,
        thickness_m: 1.0e-4,
        radiating_faces: 1,
    });

    m.insert(Air, SubstanceProfile {
        kind: Air,
        density_kg_m3: 1.2,
        specific_heat_j_per_kg_k: 1000.0,
        thickness_m: 0.0625,
        radiating_faces: 2,
    });

    m
});

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn heat_capacity_scales_with_area() {
        let ground = LayerSubstance::Ground.profile();
        assert_relative_eq!(ground.heat_capacity_j_per_k(1.0), 150.0, max_relative = 1e-12);
        assert_relative_eq!(ground.heat_capacity_j_per_k(10.0), 1500.0, max_relative = 1e-12);
        assert_eq!(LayerSubstance::Air.profile().radiating_faces, 2);
    }
}
