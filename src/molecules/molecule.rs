//! Structural description of the gas molecules and their animation.
//!
//! Positions are in picometers. Every molecule is built around its center of
//! mass, which stays fixed while the atoms vibrate or rotate around it.

use crate::constants::{ROTATION_RATE_RAD_PER_S, VIBRATION_AMPLITUDE_PM, VIBRATION_FREQUENCY_HZ};
use crate::molecules::atom::{center_of_mass, Atom, Element};
use crate::molecules::bond::AtomicBond;
use crate::molecules::excitation::ExcitationState;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoleculeKind {
    CarbonMonoxide,
    Nitrogen,
    Oxygen,
    CarbonDioxide,
    Methane,
    Water,
    NitrogenDioxide,
    Ozone,
}

impl MoleculeKind {
    pub const ALL: [MoleculeKind; 8] = [
        MoleculeKind::CarbonMonoxide,
        MoleculeKind::Nitrogen,
        MoleculeKind::Oxygen,
        MoleculeKind::CarbonDioxide,
        MoleculeKind::Methane,
        MoleculeKind::Water,
        MoleculeKind::NitrogenDioxide,
        MoleculeKind::Ozone,
    ];

    pub fn formula(&self) -> &'static str {
        match self {
            MoleculeKind::CarbonMonoxide => "CO",
            MoleculeKind::Nitrogen => "N2",
            MoleculeKind::Oxygen => "O2",
            MoleculeKind::CarbonDioxide => "CO2",
            MoleculeKind::Methane => "CH4",
            MoleculeKind::Water => "H2O",
            MoleculeKind::NitrogenDioxide => "NO2",
            MoleculeKind::Ozone => "O3",
        }
    }

    pub fn from_formula(formula: &str) -> Option<Self> {
        let upper = formula.to_ascii_uppercase();
        Self::ALL.into_iter().find(|kind| kind.formula() == upper)
    }

    pub fn geometry(&self) -> Geometry {
        match self {
            MoleculeKind::CarbonMonoxide | MoleculeKind::Nitrogen | MoleculeKind::Oxygen => Geometry::Diatomic,
            MoleculeKind::CarbonDioxide => Geometry::Linear,
            MoleculeKind::Methane => Geometry::Tetrahedral,
            MoleculeKind::Water | MoleculeKind::NitrogenDioxide | MoleculeKind::Ozone => Geometry::Bent,
        }
    }

    /// Atoms (element, offset from the central atom) and bonds of the resting molecule.
    fn template(&self) -> (Vec<(Element, DVec2)>, Vec<AtomicBond>) {
        use Element::*;
        match self {
            MoleculeKind::CarbonMonoxide => (
                vec![(Carbon, DVec2::new(-56.0, 0.0)), (Oxygen, DVec2::new(57.0, 0.0))],
                vec![AtomicBond::new(0, 1, 3)],
            ),
            MoleculeKind::Nitrogen => (
                vec![(Nitrogen, DVec2::new(-55.0, 0.0)), (Nitrogen, DVec2::new(55.0, 0.0))],
                vec![AtomicBond::new(0, 1, 3)],
            ),
            MoleculeKind::Oxygen => (
                vec![(Oxygen, DVec2::new(-60.0, 0.0)), (Oxygen, DVec2::new(60.0, 0.0))],
                vec![AtomicBond::new(0, 1, 2)],
            ),
            MoleculeKind::CarbonDioxide => (
                vec![
                    (Carbon, DVec2::ZERO),
                    (Oxygen, DVec2::new(-116.0, 0.0)),
                    (Oxygen, DVec2::new(116.0, 0.0)),
                ],
                vec![AtomicBond::new(0, 1, 2), AtomicBond::new(0, 2, 2)],
            ),
            MoleculeKind::Methane => (
                vec![
                    (Carbon, DVec2::ZERO),
                    (Hydrogen, DVec2::new(0.0, 109.0)),
                    (Hydrogen, DVec2::new(-103.0, -36.0)),
                    (Hydrogen, DVec2::new(103.0, -36.0)),
                    (Hydrogen, DVec2::new(0.0, -37.0)),
                ],
                (1..=4).map(|h| AtomicBond::new(0, h, 1)).collect(),
            ),
            MoleculeKind::Water => (
                vec![
                    (Oxygen, DVec2::ZERO),
                    (Hydrogen, DVec2::new(-76.0, -59.0)),
                    (Hydrogen, DVec2::new(76.0, -59.0)),
                ],
                vec![AtomicBond::new(0, 1, 1), AtomicBond::new(0, 2, 1)],
            ),
            MoleculeKind::NitrogenDioxide => (
                vec![
                    (Nitrogen, DVec2::ZERO),
                    (Oxygen, DVec2::new(-110.0, -47.0)),
                    (Oxygen, DVec2::new(110.0, -47.0)),
                ],
                vec![AtomicBond::new(0, 1, 2), AtomicBond::new(0, 2, 1)],
            ),
            MoleculeKind::Ozone => (
                vec![
                    (Oxygen, DVec2::ZERO),
                    (Oxygen, DVec2::new(-109.0, -67.0)),
                    (Oxygen, DVec2::new(109.0, -67.0)),
                ],
                vec![AtomicBond::new(0, 1, 2), AtomicBond::new(0, 2, 1)],
            ),
        }
    }
}

/// Display category for a molecule name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoleculeCategory {
    Known(MoleculeKind),
    Unknown,
}

impl MoleculeCategory {
    pub fn lookup(name: &str) -> Self {
        match MoleculeKind::from_formula(name) {
            Some(kind) => MoleculeCategory::Known(kind),
            None => MoleculeCategory::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoleculeCategory::Known(kind) => kind.formula(),
            MoleculeCategory::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Geometry {
    Linear,
    Bent,
    Tetrahedral,
    Diatomic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    kind: MoleculeKind,
    geometry: Geometry,
    center_of_mass: DVec2,
    rest_offsets: Vec<DVec2>,
    atoms: Vec<Atom>,
    bonds: Vec<AtomicBond>,
    rotation_rad: f64,
    vibration_phase_rad: f64,
}

impl Molecule {
    pub fn new(kind: MoleculeKind, center: DVec2) -> Self {
        let (template, bonds) = kind.template();
        let mut atoms: Vec<Atom> = template
            .into_iter()
            .map(|(element, offset)| Atom::new(element, offset))
            .collect();

        // Re-center the template on its own center of mass.
        let com = center_of_mass(&atoms);
        let rest_offsets: Vec<DVec2> = atoms.iter().map(|a| a.position - com).collect();
        for (atom, offset) in atoms.iter_mut().zip(&rest_offsets) {
            atom.position = center + *offset;
        }

        Self {
            kind,
            geometry: kind.geometry(),
            center_of_mass: center,
            rest_offsets,
            atoms,
            bonds,
            rotation_rad: 0.0,
            vibration_phase_rad: 0.0,
        }
    }

    pub fn kind(&self) -> MoleculeKind {
        self.kind
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn center_of_mass(&self) -> DVec2 {
        self.center_of_mass
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[AtomicBond] {
        &self.bonds
    }

    pub fn rotation_rad(&self) -> f64 {
        self.rotation_rad
    }

    pub fn vibration_phase_rad(&self) -> f64 {
        self.vibration_phase_rad
    }

    /// Advance the vibration or rotation that matches the excitation state.
    /// Any other state lets the bonds relax back to rest length.
    pub fn animate(&mut self, dt: f64, state: ExcitationState) {
        match state {
            ExcitationState::Vibrating => {
                self.vibration_phase_rad = (self.vibration_phase_rad + TAU * VIBRATION_FREQUENCY_HZ * dt) % TAU;
            }
            ExcitationState::Rotating => {
                self.vibration_phase_rad = 0.0;
                self.rotation_rad = (self.rotation_rad + ROTATION_RATE_RAD_PER_S * dt) % TAU;
            }
            _ => self.vibration_phase_rad = 0.0,
        }
        self.update_atom_positions();
    }

    fn update_atom_positions(&mut self) {
        let rotation = DVec2::from_angle(self.rotation_rad);
        let stretch = VIBRATION_AMPLITUDE_PM * self.vibration_phase_rad.sin();
        for (atom, rest) in self.atoms.iter_mut().zip(&self.rest_offsets) {
            let offset = *rest + rest.normalize_or_zero() * stretch;
            atom.position = self.center_of_mass + rotation.rotate(offset);
        }
    }

    /// Split into fragments flying apart along `direction`. Only the
    /// photolysable species (NO2, O3) break apart.
    pub fn break_apart(&self, direction: DVec2, speed: f64) -> Option<[MoleculeFragment; 2]> {
        let (heavy_kind, heavy_atoms, light_atoms) = match self.kind {
            MoleculeKind::NitrogenDioxide => (FragmentKind::NitricOxide, &self.atoms[..2], &self.atoms[2..]),
            MoleculeKind::Ozone => (FragmentKind::Dioxygen, &self.atoms[..2], &self.atoms[2..]),
            _ => return None,
        };
        let direction = direction.normalize_or_zero();
        Some([
            MoleculeFragment::new(heavy_kind, heavy_atoms.to_vec(), -direction * speed),
            MoleculeFragment::new(FragmentKind::AtomicOxygen, light_atoms.to_vec(), direction * speed),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FragmentKind {
    NitricOxide,
    Dioxygen,
    AtomicOxygen,
}

impl FragmentKind {
    pub fn formula(&self) -> &'static str {
        match self {
            FragmentKind::NitricOxide => "NO",
            FragmentKind::Dioxygen => "O2",
            FragmentKind::AtomicOxygen => "O",
        }
    }
}

/// Piece of a molecule that broke apart. Drifts in a straight line until it
/// leaves the container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeFragment {
    pub kind: FragmentKind,
    pub atoms: Vec<Atom>,
    pub velocity: DVec2,
}

impl MoleculeFragment {
    pub fn new(kind: FragmentKind, atoms: Vec<Atom>, velocity: DVec2) -> Self {
        Self { kind, atoms, velocity }
    }

    pub fn center_of_mass(&self) -> DVec2 {
        center_of_mass(&self.atoms)
    }

    pub fn step(&mut self, dt: f64) {
        let displacement = self.velocity * dt;
        for atom in self.atoms.iter_mut() {
            atom.position += displacement;
        }
    }

    /// Every atom is fully outside the `[-half_width, half_width] × [-half_height, half_height]` box.
    pub fn is_outside(&self, half_width: f64, half_height: f64) -> bool {
        self.atoms.iter().all(|atom| {
            let r = atom.radius_pm();
            atom.position.x.abs() - r > half_width || atom.position.y.abs() - r > half_height
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use more_asserts::assert_gt;

    #[test]
    fn structure_matches_kind() {
        for kind in MoleculeKind::ALL {
            let molecule = Molecule::new(kind, DVec2::new(10.0, -5.0));
            assert!(!molecule.atoms().is_empty());
            for bond in molecule.bonds() {
                assert!(bond.atom_a < molecule.atoms().len());
                assert!(bond.atom_b < molecule.atoms().len());
                assert_ne!(bond.atom_a, bond.atom_b);
            }
            let com = center_of_mass(molecule.atoms());
            assert_abs_diff_eq!(com.x, 10.0, epsilon = 1e-9);
            assert_abs_diff_eq!(com.y, -5.0, epsilon = 1e-9);
        }
        assert_eq!(Molecule::new(MoleculeKind::Methane, DVec2::ZERO).atoms().len(), 5);
        assert_eq!(MoleculeKind::Water.geometry(), Geometry::Bent);
        assert_eq!(MoleculeKind::CarbonDioxide.geometry(), Geometry::Linear);
    }

    #[test]
    fn formula_lookup() {
        assert_eq!(MoleculeKind::from_formula("co2"), Some(MoleculeKind::CarbonDioxide));
        assert_eq!(MoleculeCategory::lookup("H2O"), MoleculeCategory::Known(MoleculeKind::Water));
        assert_eq!(MoleculeCategory::lookup("SF6"), MoleculeCategory::Unknown);
        assert_eq!(MoleculeCategory::lookup("SF6").label(), "unknown");
    }

    #[test]
    fn rotation_keeps_bond_lengths() {
        let mut molecule = Molecule::new(MoleculeKind::Water, DVec2::ZERO);
        let before: Vec<f64> = molecule.atoms().iter().map(|a| a.position.length()).collect();
        for _ in 0..10 {
            molecule.animate(0.05, ExcitationState::Rotating);
        }
        assert_gt!(molecule.rotation_rad(), 0.0);
        for (atom, r) in molecule.atoms().iter().zip(before) {
            assert_abs_diff_eq!(atom.position.length(), r, epsilon = 1e-9);
        }
    }

    #[test]
    fn vibration_relaxes_when_idle() {
        let mut molecule = Molecule::new(MoleculeKind::CarbonDioxide, DVec2::ZERO);
        let rest = molecule.atoms().to_vec();
        molecule.animate(0.01, ExcitationState::Vibrating);
        assert_ne!(molecule.atoms(), &rest[..]);
        molecule.animate(0.01, ExcitationState::Idle);
        for (atom, original) in molecule.atoms().iter().zip(&rest) {
            assert_abs_diff_eq!(atom.position.x, original.position.x, epsilon = 1e-9);
        }
    }

    #[test]
    fn only_photolysable_molecules_break() {
        assert!(Molecule::new(MoleculeKind::CarbonDioxide, DVec2::ZERO).break_apart(DVec2::X, 100.0).is_none());
        let [no, o] = Molecule::new(MoleculeKind::NitrogenDioxide, DVec2::ZERO)
            .break_apart(DVec2::X, 100.0)
            .unwrap();
        assert_eq!(no.kind, FragmentKind::NitricOxide);
        assert_eq!(no.atoms.len(), 2);
        assert_eq!(o.kind.formula(), "O");
        assert_eq!(o.velocity, DVec2::new(100.0, 0.0));
    }

    #[test]
    fn fragment_leaves_the_box() {
        let [_, mut o] = Molecule::new(MoleculeKind::Ozone, DVec2::ZERO)
            .break_apart(DVec2::Y, 1_000.0)
            .unwrap();
        assert!(!o.is_outside(1_500.0, 800.0));
        for _ in 0..20 {
            o.step(0.1);
        }
        assert!(o.is_outside(1_500.0, 800.0));
    }
}
