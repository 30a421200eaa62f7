use serde::{Deserialize, Serialize};

/// Bond between two atoms of the same molecule, by index into its atom list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicBond {
    pub atom_a: usize,
    pub atom_b: usize,
    pub bond_order: u8,
}

impl AtomicBond {
    pub fn new(atom_a: usize, atom_b: usize, bond_order: u8) -> Self {
        Self {
            atom_a,
            atom_b,
            bond_order,
        }
    }

    pub fn connects(&self, index: usize) -> bool {
        self.atom_a == index || self.atom_b == index
    }
}
