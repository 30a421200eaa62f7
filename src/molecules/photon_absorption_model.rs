//! Top-level model of the Molecules and Light screen: one emitter firing
//! photons to the right at a single target molecule.

use crate::config::{MoleculesConfig, SimConfig};
use crate::error::{check_range, Result};
use crate::molecules::absorption::absorption_strategy;
use crate::molecules::excitation::{ExcitationEvent, ExcitationState, MoleculeExcitationStateMachine};
use crate::molecules::molecule::{Molecule, MoleculeFragment, MoleculeKind};
use crate::photon::{Photon, PhotonId, WavelengthClass};
use crate::sim::{clamp_dt, Resettable, Steppable, TimeSpeed};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::f64::consts::FRAC_1_SQRT_2;

/// Re-emission directions: the four axes and the four diagonals.
pub const EMISSION_DIRECTIONS: [DVec2; 8] = [
    DVec2::new(1.0, 0.0),
    DVec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    DVec2::new(0.0, 1.0),
    DVec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    DVec2::new(-1.0, 0.0),
    DVec2::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    DVec2::new(0.0, -1.0),
    DVec2::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
];

pub struct PhotonAbsorptionModel {
    config: MoleculesConfig,
    max_dt: f64,
    single_step_dt: f64,
    slow_speed_factor: f64,
    seed: u64,
    rng: StdRng,

    light_source: WavelengthClass,
    emitter_on: bool,
    emission_frequency_hz: f64,
    emission_countdown_s: f64,
    photons: Vec<Photon>,
    next_photon_id: PhotonId,
    // Photons already offered to the current molecule.
    tested_photons: HashSet<PhotonId>,

    initial_target: MoleculeKind,
    target: MoleculeKind,
    molecule: Option<Molecule>,
    excitation: MoleculeExcitationStateMachine,
    fragments: Vec<MoleculeFragment>,

    is_playing: bool,
    time_speed: TimeSpeed,
    elapsed_s: f64,
}

impl PhotonAbsorptionModel {
    pub fn new(config: &SimConfig, target: MoleculeKind) -> Result<Self> {
        config.validate()?;
        let mol = config.molecules.clone();
        log::info!("molecules and light model created with {} target (seed {})", target.formula(), config.seed);
        Ok(Self {
            excitation: MoleculeExcitationStateMachine::new(
                mol.min_hold_time_s,
                mol.max_hold_time_s,
                mol.absorption_hysteresis_s,
            ),
            emission_frequency_hz: mol.emission_frequency_hz,
            config: mol,
            max_dt: config.max_dt,
            single_step_dt: config.single_step_dt,
            slow_speed_factor: config.slow_speed_factor,
            seed: config.seed,
            rng: StdRng::seed_from_u64(config.seed),
            light_source: WavelengthClass::Microwave,
            emitter_on: false,
            emission_countdown_s: 0.0,
            photons: Vec::new(),
            next_photon_id: 0,
            tested_photons: HashSet::new(),
            initial_target: target,
            target,
            molecule: Some(Molecule::new(target, DVec2::ZERO)),
            fragments: Vec::new(),
            is_playing: true,
            time_speed: TimeSpeed::Normal,
            elapsed_s: 0.0,
        })
    }

    pub fn photons(&self) -> &[Photon] {
        &self.photons
    }

    pub fn molecule(&self) -> Option<&Molecule> {
        self.molecule.as_ref()
    }

    pub fn fragments(&self) -> &[MoleculeFragment] {
        &self.fragments
    }

    pub fn target(&self) -> MoleculeKind {
        self.target
    }

    pub fn excitation_state(&self) -> ExcitationState {
        self.excitation.state()
    }

    pub fn light_source(&self) -> WavelengthClass {
        self.light_source
    }

    pub fn is_emitter_on(&self) -> bool {
        self.emitter_on
    }

    pub fn emission_frequency_hz(&self) -> f64 {
        self.emission_frequency_hz
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn time_speed(&self) -> TimeSpeed {
        self.time_speed
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    /// The molecule broke apart and every fragment has left the container.
    pub fn is_molecule_off_window(&self) -> bool {
        self.molecule.is_none() && self.fragments.is_empty()
    }

    pub fn set_light_source(&mut self, wavelength: WavelengthClass) {
        self.light_source = wavelength;
    }

    pub fn set_emitter_on(&mut self, on: bool) {
        if on && !self.emitter_on {
            self.emission_countdown_s = 0.0;
        }
        self.emitter_on = on;
    }

    pub fn set_emission_frequency(&mut self, frequency_hz: f64) -> Result<()> {
        check_range("emission frequency", frequency_hz, 0.0, self.config.max_emission_frequency_hz)?;
        self.emission_frequency_hz = frequency_hz;
        Ok(())
    }

    /// Swap in a fresh molecule of a different kind. Photons in flight stay.
    pub fn set_target_molecule(&mut self, kind: MoleculeKind) {
        self.target = kind;
        self.restore_molecule();
    }

    /// Bring back an intact target molecule, dropping any fragments.
    pub fn restore_molecule(&mut self) {
        self.molecule = Some(Molecule::new(self.target, DVec2::ZERO));
        self.excitation.reset();
        self.fragments.clear();
        self.tested_photons.clear();
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn set_time_speed(&mut self, speed: TimeSpeed) {
        self.time_speed = speed;
    }

    /// Advance by one fixed frame while paused.
    pub fn step_once(&mut self) {
        self.step_model(self.single_step_dt);
    }

    /// Send a photon out of the molecule in a random one of the eight
    /// directions. Without a molecule this does nothing.
    pub fn emit_photon_from_molecule(&mut self, wavelength: WavelengthClass) -> Option<PhotonId> {
        let center = self.molecule.as_ref()?.center_of_mass();
        let direction = EMISSION_DIRECTIONS[self.rng.random_range(0..EMISSION_DIRECTIONS.len())];
        let id = self.add_photon(center, direction * self.config.photon_speed, wavelength);
        // A re-emitted photon starts inside the capture radius; never offer it back.
        self.tested_photons.insert(id);
        Some(id)
    }

    fn add_photon(&mut self, position: DVec2, velocity: DVec2, wavelength: WavelengthClass) -> PhotonId {
        let id = self.next_photon_id;
        self.next_photon_id += 1;
        self.photons.push(Photon::new(id, position, velocity, wavelength));
        id
    }

    fn step_model(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        self.elapsed_s += dt;
        self.run_emitter(dt);
        for photon in self.photons.iter_mut() {
            photon.step(dt);
        }
        self.offer_photons_to_molecule();

        match self.excitation.step(dt, &mut self.rng) {
            ExcitationEvent::EmitPhoton(wavelength) => {
                self.emit_photon_from_molecule(wavelength);
            }
            ExcitationEvent::BreakApart => self.break_apart(),
            ExcitationEvent::None => {}
        }

        let state = self.excitation.state();
        if let Some(molecule) = self.molecule.as_mut() {
            molecule.animate(dt, state);
        }

        let (half_width, half_height) = (self.config.container_half_width, self.config.container_half_height);
        for fragment in self.fragments.iter_mut() {
            fragment.step(dt);
        }
        self.fragments.retain(|f| !f.is_outside(half_width, half_height));

        let tested = &mut self.tested_photons;
        self.photons.retain(|photon| {
            let inside = photon.position.x.abs() <= half_width && photon.position.y.abs() <= half_height;
            if !inside {
                tested.remove(&photon.id);
            }
            inside
        });
    }

    fn run_emitter(&mut self, dt: f64) {
        if !self.emitter_on || self.emission_frequency_hz <= 0.0 {
            return;
        }
        self.emission_countdown_s -= dt;
        while self.emission_countdown_s <= 0.0 {
            self.add_photon(
                DVec2::new(self.config.emitter_x, 0.0),
                DVec2::new(self.config.photon_speed, 0.0),
                self.light_source,
            );
            self.emission_countdown_s += 1.0 / self.emission_frequency_hz;
        }
    }

    /// Each photon gets one chance per molecule, on first entering the capture radius.
    fn offer_photons_to_molecule(&mut self) {
        let Some(molecule) = self.molecule.as_ref() else {
            return;
        };
        let center = molecule.center_of_mass();
        let kind = molecule.kind();
        let radius = self.config.capture_radius;

        let mut absorbed = None;
        for photon in &self.photons {
            if photon.position.distance(center) > radius || !self.tested_photons.insert(photon.id) {
                continue;
            }
            if !self.excitation.can_absorb() {
                continue;
            }
            let Some(strategy) = absorption_strategy(kind, photon.wavelength) else {
                continue;
            };
            if strategy.accepts(&mut self.rng) && self.excitation.begin_absorption(photon.wavelength, strategy.mode) {
                log::debug!("{} absorbed {} photon {} ({:?})", kind.formula(), photon.wavelength.as_str(), photon.id, strategy.mode);
                absorbed = Some(photon.id);
                break;
            }
        }
        if let Some(id) = absorbed {
            self.photons.retain(|p| p.id != id);
            self.tested_photons.remove(&id);
        }
    }

    fn break_apart(&mut self) {
        let Some(molecule) = self.molecule.take() else {
            return;
        };
        let angle = self.rng.random::<f64>() * std::f64::consts::TAU;
        match molecule.break_apart(DVec2::from_angle(angle), self.config.break_apart_speed) {
            Some(fragments) => {
                log::debug!("{} broke apart", molecule.kind().formula());
                self.fragments.extend(fragments);
            }
            // Not photolysable after all; keep it intact.
            None => self.molecule = Some(molecule),
        }
    }
}

impl Steppable for PhotonAbsorptionModel {
    fn step(&mut self, dt: f64) {
        if !self.is_playing {
            return;
        }
        let dt = clamp_dt(dt, self.max_dt) * self.time_speed.factor(self.slow_speed_factor);
        self.step_model(dt);
    }
}

impl Resettable for PhotonAbsorptionModel {
    fn reset(&mut self) {
        log::info!("molecules and light model reset");
        self.rng = StdRng::seed_from_u64(self.seed);
        self.light_source = WavelengthClass::Microwave;
        self.emitter_on = false;
        self.emission_frequency_hz = self.config.emission_frequency_hz;
        self.emission_countdown_s = 0.0;
        self.photons.clear();
        self.next_photon_id = 0;
        self.is_playing = true;
        self.time_speed = TimeSpeed::Normal;
        self.elapsed_s = 0.0;
        self.target = self.initial_target;
        self.restore_molecule();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::assert_gt;

    fn model(kind: MoleculeKind) -> PhotonAbsorptionModel {
        PhotonAbsorptionModel::new(&SimConfig::with_seed(9), kind).unwrap()
    }

    #[test]
    fn emitter_fires_at_frequency() {
        let mut model = model(MoleculeKind::Nitrogen);
        model.set_emission_frequency(2.0).unwrap();
        model.set_emitter_on(true);
        for _ in 0..9 {
            model.step(0.1);
        }
        // t = 0.1, 0.6 with a photon already on the way
        assert_eq!(model.photons().len(), 2);
        for photon in model.photons() {
            assert_eq!(photon.velocity.y, 0.0);
            assert_gt!(photon.velocity.x, 0.0);
        }
        assert!(model.set_emission_frequency(50.0).is_err());
    }

    #[test]
    fn transparent_molecule_lets_photons_through() {
        let mut model = model(MoleculeKind::Oxygen);
        model.set_light_source(WavelengthClass::Infrared);
        model.set_emitter_on(true);
        for _ in 0..400 {
            model.step(0.05);
            assert_eq!(model.excitation_state(), ExcitationState::Idle);
        }
    }

    #[test]
    fn emit_without_molecule_is_noop() {
        let mut model = model(MoleculeKind::Ozone);
        model.molecule = None;
        assert_eq!(model.emit_photon_from_molecule(WavelengthClass::Infrared), None);
        assert!(model.photons().is_empty());
    }

    #[test]
    fn paused_model_only_moves_on_single_step() {
        let mut model = model(MoleculeKind::CarbonDioxide);
        model.set_emitter_on(true);
        model.set_playing(false);
        model.step(0.1);
        assert_eq!(model.elapsed_s(), 0.0);
        model.step_once();
        assert_eq!(model.elapsed_s(), 1.0 / 60.0);
        assert_eq!(model.photons().len(), 1);
    }

    #[test]
    fn slow_speed_halves_time() {
        let mut model = model(MoleculeKind::Water);
        model.set_time_speed(TimeSpeed::Slow);
        model.step(0.1);
        assert_eq!(model.elapsed_s(), 0.05);
        model.step(5.0);
        assert_eq!(model.elapsed_s(), 0.1);
    }
}
