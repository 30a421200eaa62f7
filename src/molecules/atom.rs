// Elements and atoms that make up the gas molecules.

use glam::DVec2;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Carbon,
    Hydrogen,
    Nitrogen,
    Oxygen,
}

impl Element {
    pub fn symbol(&self) -> &'static str {
        self.profile().symbol
    }

    pub fn profile(&self) -> &'static ElementProfile {
        &ELEMENT_PROFILES[self]
    }
}

#[derive(Debug, Clone)]
pub struct ElementProfile {
    pub kind: Element,
    pub symbol: &'static str,
    pub radius_pm: f64,
    /// Atomic mass in daltons.
    pub atomic_mass: f64,
}

pub static ELEMENT_PROFILES: Lazy<HashMap<Element, ElementProfile>> = Lazy::new(|| {
    use Element::*;
    let mut m = HashMap::new();

    m.insert(Carbon, ElementProfile {
        kind: Carbon,
        symbol: "C",
        radius_pm: 77.0,
        atomic_mass: 12.011,
    });

    m.insert(Hydrogen, ElementProfile {
        kind: Hydrogen,
        symbol: "H",
        radius_pm: 37.0,
        atomic_mass: 1.008,
    });

    m.insert(Nitrogen, ElementProfile {
        kind: Nitrogen,
        symbol: "N",
        radius_pm: 75.0,
        atomic_mass: 14.007,
    });

    m.insert(Oxygen, ElementProfile {
        kind: Oxygen,
        symbol: "O",
        radius_pm: 73.0,
        atomic_mass: 16.0,
    });

    m
});

/// One atom. Only `position` changes after construction; the owning
/// molecule drives it while animating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub element: Element,
    pub position: DVec2,
}

impl Atom {
    pub fn new(element: Element, position: DVec2) -> Self {
        Self { element, position }
    }

    pub fn radius_pm(&self) -> f64 {
        self.element.profile().radius_pm
    }

    pub fn mass(&self) -> f64 {
        self.element.profile().atomic_mass
    }
}

/// Mass-weighted center of a set of atoms.
pub fn center_of_mass(atoms: &[Atom]) -> DVec2 {
    let total_mass: f64 = atoms.iter().map(Atom::mass).sum();
    if total_mass <= 0.0 {
        return DVec2::ZERO;
    }
    atoms.iter().map(|a| a.position * a.mass()).sum::<DVec2>() / total_mass
}
