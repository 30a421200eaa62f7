//! Temperature reporting operation
//! Reports ground and layer temperatures every N% of a run

use crate::model::GreenhouseModel;
use crate::sim::runner::{SimOp, SimRunner};
use crate::temp_utils::kelvin_to_celsius;
use colored::Colorize;

/// One line of the report, kept so callers can inspect the trend afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSample {
    pub step: u32,
    pub elapsed_s: f64,
    pub surface_temperature_k: f64,
    pub layer_temperatures_k: Vec<f64>,
}

pub struct TemperatureReportingOp {
    pub report_frequency_percent: f64,
    last_milestone: Option<i64>,
    samples: Vec<TemperatureSample>,
}

impl TemperatureReportingOp {
    pub fn new() -> Self {
        Self::with_frequency(10.0)
    }

    pub fn with_frequency(report_frequency_percent: f64) -> Self {
        Self {
            report_frequency_percent,
            last_milestone: None,
            samples: Vec::new(),
        }
    }

    pub fn samples(&self) -> &[TemperatureSample] {
        &self.samples
    }

    fn should_report(&mut self, sim: &SimRunner<GreenhouseModel>) -> bool {
        if sim.sim_steps == 0 || self.report_frequency_percent <= 0.0 {
            return false;
        }
        let milestone = (sim.progress_percent() / self.report_frequency_percent).floor() as i64;
        if self.last_milestone.is_some_and(|last| milestone <= last) {
            return false;
        }
        self.last_milestone = Some(milestone);
        true
    }

    fn sample(sim: &SimRunner<GreenhouseModel>) -> TemperatureSample {
        let layers = sim.model.layers();
        TemperatureSample {
            step: sim.step,
            elapsed_s: sim.model.elapsed_s(),
            surface_temperature_k: layers.surface_temperature_k(),
            layer_temperatures_k: layers
                .atmosphere_layers()
                .iter()
                .filter(|l| l.is_active())
                .map(|l| l.temperature_k())
                .collect(),
        }
    }

    fn print_sample(label: &str, sample: &TemperatureSample, model: &GreenhouseModel) {
        let ground = format!(
            "{:.1}K ({:.1}°C)",
            sample.surface_temperature_k,
            kelvin_to_celsius(sample.surface_temperature_k)
        );
        println!("🌡️  {} t={:.1}s ground {}", label, sample.elapsed_s, ground.as_str().yellow());
        for (i, temp) in sample.layer_temperatures_k.iter().enumerate() {
            println!("   ☁️ layer {}: {}", i, format!("{temp:.1}K").as_str().cyan());
        }
        let balance = if model.layers().is_in_radiative_balance() {
            "balanced".green()
        } else {
            "settling".red()
        };
        println!("   ⚖️  radiative balance: {}", balance);
    }
}

impl Default for TemperatureReportingOp {
    fn default() -> Self {
        Self::new()
    }
}

impl SimOp<GreenhouseModel> for TemperatureReportingOp {
    fn name(&self) -> &str {
        "TemperatureReporting"
    }

    fn init_sim(&mut self, sim: &mut SimRunner<GreenhouseModel>) {
        println!(
            "📊 Temperature reporting initialized (every {:.1}% of {})",
            self.report_frequency_percent, sim.name
        );
        let sample = Self::sample(sim);
        Self::print_sample("Initial", &sample, &sim.model);
        self.samples.push(sample);
        self.last_milestone = Some(0);
    }

    fn update_sim(&mut self, sim: &mut SimRunner<GreenhouseModel>) {
        if !self.should_report(sim) {
            return;
        }
        println!(
            "step {} of {}: {}% progress",
            sim.step,
            sim.sim_steps,
            sim.progress_percent().round() as i64
        );
        let sample = Self::sample(sim);
        Self::print_sample("Progress", &sample, &sim.model);
        self.samples.push(sample);
    }

    fn after_sim(&mut self, sim: &mut SimRunner<GreenhouseModel>) {
        println!("🏁 Final Temperature Report:");
        let sample = Self::sample(sim);
        Self::print_sample("Final", &sample, &sim.model);
        log::info!(
            "{} finished at {:.1}K after {} steps",
            sim.name,
            sample.surface_temperature_k,
            sim.step
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::model::Screen;
    use crate::sim::runner::SimOpHandle;

    #[test]
    fn reports_at_each_milestone() {
        let model = GreenhouseModel::new(SimConfig::default(), Screen::LayerModel).unwrap();
        let mut runner = SimRunner::new("reporting", model, 0.1, 100, Vec::new());
        let mut op = TemperatureReportingOp::with_frequency(25.0);
        op.init_sim(&mut runner);
        for _ in 0..100 {
            runner.step += 1;
            op.update_sim(&mut runner);
        }
        // initial plus 25%, 50%, 75%, 100%
        assert_eq!(op.samples().len(), 5);
        assert_eq!(op.samples()[1].step, 25);
        assert_eq!(op.samples()[0].layer_temperatures_k.len(), 1);
    }

    #[test]
    fn runs_inside_runner() {
        let model = GreenhouseModel::new(SimConfig::with_seed(9), Screen::LayerModel).unwrap();
        let mut runner = SimRunner::new(
            "layer model",
            model,
            0.1,
            50,
            vec![SimOpHandle::new(Box::new(TemperatureReportingOp::new()))],
        );
        runner.run();
        assert_eq!(runner.observer_costs[0].frames_seen, 50);
        assert!(runner.model.surface_temperature_k() >= 125.0);
    }
}
