// Molecules and Light: one emitter, one target molecule.

use greenhouse_sim::molecules::photon_absorption_model::EMISSION_DIRECTIONS;
use greenhouse_sim::molecules::{ExcitationState, MoleculeCategory, MoleculeKind};
use greenhouse_sim::photon::{LightSourceCategory, WavelengthClass};
use greenhouse_sim::{GreenhouseError, PhotonAbsorptionModel, Resettable, SimConfig, Steppable};
use std::collections::HashSet;

fn model(kind: MoleculeKind, light: WavelengthClass) -> PhotonAbsorptionModel {
    let mut model = PhotonAbsorptionModel::new(&SimConfig::with_seed(21), kind).unwrap();
    model.set_light_source(light);
    model.set_emission_frequency(5.0).unwrap();
    model.set_emitter_on(true);
    model
}

#[test]
fn test_co2_vibrates_and_reemits_infrared() {
    println!("🎻 CO2 under infrared");
    let mut model = model(MoleculeKind::CarbonDioxide, WavelengthClass::Infrared);
    let mut vibrated = false;
    let mut settled_after_vibrating = false;
    for _ in 0..1_200 {
        model.step(0.05);
        match model.excitation_state() {
            ExcitationState::Vibrating => vibrated = true,
            ExcitationState::Idle if vibrated => settled_after_vibrating = true,
            ExcitationState::Rotating | ExcitationState::Glowing | ExcitationState::BreakingApart => {
                panic!("CO2 only vibrates under infrared")
            }
            _ => {}
        }
        assert!(model.photons().iter().all(|p| p.wavelength == WavelengthClass::Infrared));
    }
    assert!(vibrated);
    assert!(settled_after_vibrating);
    assert!(model.molecule().is_some());
    println!("   ✅ absorbed, vibrated, and re-emitted");
}

fn is_emission_direction(velocity: glam::DVec2) -> bool {
    let direction = velocity.normalize_or_zero();
    EMISSION_DIRECTIONS
        .iter()
        .any(|d| (direction - *d).length() < 1e-9)
}

#[test]
fn test_reemitted_photons_leave_along_eight_directions() {
    println!("🧭 Checking re-emission directions");
    let mut model = model(MoleculeKind::CarbonDioxide, WavelengthClass::Infrared);
    let mut seen: HashSet<u64> = HashSet::new();
    let mut reemitted = 0;
    let mut was_emitting = false;
    for _ in 0..1_200 {
        model.step(0.05);
        for photon in model.photons() {
            if !seen.insert(photon.id) {
                continue;
            }
            // emitter photons enter from the left edge; re-emitted ones start at the molecule
            if photon.position.length() < 50.0 {
                assert!(was_emitting, "photon {} appeared at the molecule outside emission", photon.id);
                assert!(is_emission_direction(photon.velocity), "velocity {}", photon.velocity);
                assert_eq!(photon.wavelength, WavelengthClass::Infrared);
                reemitted += 1;
            }
        }
        was_emitting = model.excitation_state() == ExcitationState::Emitting;
    }
    assert!(reemitted > 0);

    for _ in 0..32 {
        let id = model.emit_photon_from_molecule(WavelengthClass::Microwave).unwrap();
        let photon = model.photons().iter().find(|p| p.id == id).unwrap();
        assert!(is_emission_direction(photon.velocity));
    }
    println!("   ✅ {reemitted} re-emitted photons, all on the 8 directions");
}

#[test]
fn test_no2_glows_under_visible_light() {
    let mut model = model(MoleculeKind::NitrogenDioxide, WavelengthClass::Visible);
    let mut glowed = false;
    for _ in 0..1_200 {
        model.step(0.05);
        glowed |= model.excitation_state() == ExcitationState::Glowing;
    }
    assert!(glowed);
}

#[test]
fn test_ozone_breaks_apart_and_leaves_window() {
    println!("💥 Ozone under ultraviolet");
    let mut model = model(MoleculeKind::Ozone, WavelengthClass::Ultraviolet);
    let mut saw_fragments = false;
    for _ in 0..2_400 {
        model.step(0.05);
        if !model.fragments().is_empty() {
            saw_fragments = true;
            let formulas: Vec<&str> = model.fragments().iter().map(|f| f.kind.formula()).collect();
            assert!(formulas.contains(&"O2"));
            assert!(formulas.contains(&"O"));
        }
        if model.is_molecule_off_window() {
            break;
        }
    }
    assert!(saw_fragments);
    assert!(model.is_molecule_off_window());
    assert!(model.molecule().is_none());
    assert_eq!(model.emit_photon_from_molecule(WavelengthClass::Infrared), None);

    model.restore_molecule();
    assert!(!model.is_molecule_off_window());
    assert_eq!(model.excitation_state(), ExcitationState::Idle);
    println!("   ✅ fragments flew off and the molecule came back on request");
}

#[test]
fn test_nitrogen_is_transparent() {
    let mut model = model(MoleculeKind::Nitrogen, WavelengthClass::Ultraviolet);
    let mut passed = 0;
    for _ in 0..400 {
        model.step(0.05);
        assert_eq!(model.excitation_state(), ExcitationState::Idle);
        passed = passed.max(model.photons().iter().filter(|p| p.position.x > 200.0).count());
    }
    assert!(passed > 0);
}

#[test]
fn test_reset_restores_defaults() {
    let mut model = model(MoleculeKind::Water, WavelengthClass::Microwave);
    model.set_target_molecule(MoleculeKind::Ozone);
    for _ in 0..100 {
        model.step(0.05);
    }
    model.reset();
    assert_eq!(model.elapsed_s(), 0.0);
    assert!(model.photons().is_empty());
    assert!(!model.is_emitter_on());
    assert_eq!(model.light_source(), WavelengthClass::Microwave);
    assert_eq!(model.target(), MoleculeKind::Water);
    assert_eq!(model.molecule().map(|m| m.kind()), Some(MoleculeKind::Water));
    assert_eq!(model.excitation_state(), ExcitationState::Idle);
}

#[test]
fn test_config_frequency_above_maximum_is_rejected() {
    let config = SimConfig::from_json_str(r#"{ "molecules": { "emission_frequency_hz": 50.0 } }"#);
    assert!(matches!(config, Err(GreenhouseError::InvalidParam(_))));

    let mut config = SimConfig::with_seed(3);
    config.molecules.emission_frequency_hz = 50.0;
    assert!(PhotonAbsorptionModel::new(&config, MoleculeKind::CarbonDioxide).is_err());
}

#[test]
fn test_unknown_names_map_to_unknown_category() {
    assert_eq!(MoleculeCategory::lookup("Xe"), MoleculeCategory::Unknown);
    assert_eq!(MoleculeCategory::lookup("CO2"), MoleculeCategory::Known(MoleculeKind::CarbonDioxide));
    assert_eq!(LightSourceCategory::lookup("xray"), LightSourceCategory::Unknown);
}
