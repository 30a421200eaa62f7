// Runs the layer model to equilibrium for 0 to 3 active layers and compares
// each final ground temperature with the textbook n-layer result.

use greenhouse_sim::sim::{SimOpHandle, SimRunner, TemperatureReportingOp};
use greenhouse_sim::temp_utils::radiative_equilibrium_kelvin;
use greenhouse_sim::{GreenhouseModel, Screen, SimConfig};

const STEPS: u32 = 8_000;
const DT_S: f64 = 0.1;

fn main() -> greenhouse_sim::Result<()> {
    let bare_rock_k = radiative_equilibrium_kelvin(1361.0 * 0.25 * 0.7);
    println!("🪨 Bare rock equilibrium: {:.1}K", bare_rock_k);

    for layers in 0..=3usize {
        let mut model = GreenhouseModel::new(SimConfig::with_seed(42), Screen::LayerModel)?;
        model.set_active_layer_count(layers)?;
        model.set_all_layer_absorption(1.0)?;

        let mut runner = SimRunner::new(
            &format!("{layers} layer model"),
            model,
            DT_S,
            STEPS,
            vec![SimOpHandle::new(Box::new(TemperatureReportingOp::with_frequency(25.0)))],
        );
        runner.run();

        // Fully absorbing layers: Ts = (n + 1)^(1/4) · Te
        let expected = bare_rock_k * ((layers + 1) as f64).powf(0.25);
        let actual = runner.model.surface_temperature_k();
        println!(
            "📐 {} layers: ground {:.1}K, expected {:.1}K (off by {:+.1}K)",
            layers,
            actual,
            expected,
            actual - expected
        );
        runner.print_profile();
    }
    Ok(())
}
