pub mod absorption;
pub mod atom;
pub mod bond;
pub mod excitation;
pub mod molecule;
pub mod photon_absorption_model;

pub use absorption::{absorption_strategy, ExcitationMode, PhotonAbsorptionStrategy};
pub use atom::{Atom, Element};
pub use bond::AtomicBond;
pub use excitation::{ExcitationEvent, ExcitationState, MoleculeExcitationStateMachine};
pub use molecule::{FragmentKind, Geometry, Molecule, MoleculeCategory, MoleculeFragment, MoleculeKind};
pub use photon_absorption_model::PhotonAbsorptionModel;
