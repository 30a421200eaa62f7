// Photon and wave representations driven by the energy model.

use glam::DVec2;
use greenhouse_sim::energy::{LayersModel, LayersModelParams};
use greenhouse_sim::photon::WavelengthClass;
use greenhouse_sim::photon_collection::PhotonCollection;
use greenhouse_sim::{GreenhouseModel, Screen, SimConfig, Steppable};
use more_asserts::{assert_ge, assert_gt, assert_le};
use rand::RngCore;

/// Every draw is zero, so every probability check passes.
struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}

#[test]
fn test_forced_draw_reverses_infrared_at_layer() {
    println!("🔁 Forcing an absorption draw at the lowest layer");
    let config = SimConfig::default();
    let mut layers = LayersModel::new(
        &config,
        LayersModelParams {
            layer_count: 3,
            initially_active_layers: 1,
            initial_absorption_proportion: 0.3,
            clouds: Vec::new(),
        },
    )
    .unwrap();
    layers.set_sun_shining(false);

    let mut photons = PhotonCollection::new(&config);
    photons.add_photon(DVec2::new(0.0, 12_400.0), DVec2::new(0.0, 30_000.0), WavelengthClass::Infrared);
    photons.step(0.01, &layers, &mut ZeroRng);

    let photon = &photons.photons()[0];
    assert_eq!(photon.velocity.y, -30_000.0);
    assert_le!(photon.position.y, 12_500.0);
    println!("   ✅ photon turned back at {:.0} m", photon.position.y);
}

#[test]
fn test_zero_layers_never_reverse_infrared() {
    println!("🌫️ No active layers, no reversals");
    let mut model = GreenhouseModel::new(SimConfig::with_seed(5), Screen::LayerModel).unwrap();
    model.set_active_layer_count(0).unwrap();
    let mut saw_infrared = false;
    for _ in 0..3_000 {
        model.step(0.1);
        for photon in model.photons() {
            if photon.is_infrared() {
                saw_infrared = true;
                assert_gt!(photon.velocity.y, 0.0);
            } else {
                assert!(photon.velocity.y < 0.0);
            }
        }
    }
    assert!(saw_infrared);
    println!("   ✅ every infrared photon kept climbing");
}

#[test]
fn test_photons_stay_inside_atmosphere() {
    let mut model = GreenhouseModel::new(SimConfig::with_seed(6), Screen::Photons).unwrap();
    model.set_concentration(1.0).unwrap();
    model.set_cloud_enabled(0, true).unwrap();
    let height = model.layers().height_m();
    for _ in 0..2_000 {
        model.step(0.1);
        for photon in model.photons() {
            assert_ge!(photon.position.y, -1e-9);
            assert_le!(photon.position.y, height + 1e-9);
        }
    }
}

#[test]
fn test_wave_ends_never_pass_limits() {
    println!("〰️ Running the waves screen");
    let mut model = GreenhouseModel::new(SimConfig::with_seed(8), Screen::Waves).unwrap();
    model.set_concentration(0.8).unwrap();
    model.set_cloud_enabled(0, true).unwrap();
    let height = model.layers().height_m();
    let mut max_waves = 0;
    for _ in 0..3_000 {
        model.step(0.1);
        for wave in model.waves() {
            let end = wave.end_point().y;
            assert_ge!(end, -1e-6);
            assert_le!(end, height + 1e-6);
            assert_le!(wave.length(), wave.max_length() + 1e-6);
            assert!((0.0..=1.0).contains(&wave.intensity_at_start()));
        }
        max_waves = max_waves.max(model.waves().len());
    }
    assert!(model
        .waves()
        .iter()
        .any(|w| w.wavelength() == WavelengthClass::Infrared));
    println!("   ✅ at most {max_waves} waves alive, all within bounds");
}

#[test]
fn test_sun_off_drains_visible_waves() {
    let mut model = GreenhouseModel::new(SimConfig::with_seed(3), Screen::Waves).unwrap();
    for _ in 0..50 {
        model.step(0.1);
    }
    assert!(model.waves().iter().any(|w| w.wavelength() == WavelengthClass::Visible));
    model.set_sun_shining(false);
    // detached waves need height / speed to clear
    for _ in 0..200 {
        model.step(0.1);
    }
    assert!(model.waves().iter().all(|w| w.wavelength() != WavelengthClass::Visible));
}
