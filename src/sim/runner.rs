use crate::sim::Steppable;
use std::time::{Duration, Instant};

/// Observer attached to a [`SimRunner`]. Ops run after the model has
/// stepped and may read or adjust it.
pub trait SimOp<M> {
    /// Label used in the run profile.
    fn name(&self) -> &str;

    fn init_sim(&mut self, _sim: &mut SimRunner<M>) {}

    /// Called after every model frame.
    fn update_sim(&mut self, _sim: &mut SimRunner<M>) {}

    fn after_sim(&mut self, _sim: &mut SimRunner<M>) {}
}

pub struct SimOpHandle<M> {
    pub op: Box<dyn SimOp<M>>,
}

impl<M> SimOpHandle<M> {
    pub fn new(op: Box<dyn SimOp<M>>) -> Self {
        SimOpHandle { op }
    }
}

/// Wall-clock cost of one observer over a run.
#[derive(Debug, Clone, Default)]
pub struct ObserverCost {
    pub observer: String,
    pub setup: Duration,
    pub during_frames: Duration,
    pub frames_seen: u32,
    pub wrap_up: Duration,
}

impl ObserverCost {
    fn for_observer(observer: &str) -> Self {
        Self {
            observer: observer.to_string(),
            ..Self::default()
        }
    }

    pub fn per_frame(&self) -> Duration {
        match self.frames_seen {
            0 => Duration::ZERO,
            n => self.during_frames / n,
        }
    }

    pub fn total(&self) -> Duration {
        self.setup + self.during_frames + self.wrap_up
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunPhase {
    Setup,
    Frame,
    WrapUp,
}

/// Drives a model for a fixed number of frames of constant `dt`, handing the
/// model to each observer around every frame and recording what they cost.
pub struct SimRunner<M> {
    pub model: M,
    pub name: String,
    pub dt: f64,
    pub step: u32,
    pub sim_steps: u32,
    pub observer_costs: Vec<ObserverCost>,
    pub physics_time: Duration,
    ops: Vec<Box<dyn SimOp<M>>>,
}

impl<M: Steppable> SimRunner<M> {
    pub fn new(name: &str, model: M, dt: f64, sim_steps: u32, ops: Vec<SimOpHandle<M>>) -> Self {
        let ops: Vec<Box<dyn SimOp<M>>> = ops.into_iter().map(|handle| handle.op).collect();
        let observer_costs = ops.iter().map(|op| ObserverCost::for_observer(op.name())).collect();
        Self {
            model,
            name: name.to_string(),
            dt,
            step: 0,
            sim_steps,
            observer_costs,
            physics_time: Duration::ZERO,
            ops,
        }
    }

    /// Simulated seconds covered so far.
    pub fn elapsed_s(&self) -> f64 {
        self.step as f64 * self.dt
    }

    pub fn progress_percent(&self) -> f64 {
        if self.sim_steps == 0 {
            100.0
        } else {
            self.step as f64 / self.sim_steps as f64 * 100.0
        }
    }

    pub fn run(&mut self) {
        log::info!("{}: running {} frames of {:.3}s", self.name, self.sim_steps, self.dt);
        self.notify(RunPhase::Setup);
        while self.step < self.sim_steps {
            let start = Instant::now();
            self.model.step(self.dt);
            self.physics_time += start.elapsed();
            self.step += 1;
            self.notify(RunPhase::Frame);
        }
        self.notify(RunPhase::WrapUp);
    }

    // Observers borrow the runner mutably, so they are lifted out for the call.
    fn notify(&mut self, phase: RunPhase) {
        let mut ops = std::mem::take(&mut self.ops);
        for (op, i) in ops.iter_mut().zip(0..) {
            let start = Instant::now();
            match phase {
                RunPhase::Setup => op.init_sim(self),
                RunPhase::Frame => op.update_sim(self),
                RunPhase::WrapUp => op.after_sim(self),
            }
            let spent = start.elapsed();
            let cost: &mut ObserverCost = &mut self.observer_costs[i];
            match phase {
                RunPhase::Setup => cost.setup += spent,
                RunPhase::Frame => {
                    cost.during_frames += spent;
                    cost.frames_seen += 1;
                }
                RunPhase::WrapUp => cost.wrap_up += spent,
            }
        }
        self.ops = ops;
    }

    /// Where the wall-clock time of the run went: the model's physics versus
    /// each observer.
    pub fn profile(&self) -> String {
        let ms = |d: Duration| d.as_secs_f64() * 1000.0;
        let observers: Duration = self.observer_costs.iter().map(ObserverCost::total).sum();
        let wall = observers + self.physics_time;

        let mut lines = vec![
            format!("🌍 {}: {} frames of {:.3}s, {:.1}s of model time", self.name, self.sim_steps, self.dt, self.elapsed_s()),
            format!("   ⚛️  physics        {:>9.2}ms", ms(self.physics_time)),
        ];
        for cost in &self.observer_costs {
            lines.push(format!(
                "   👁️  {:<14} {:>9.2}ms ({:.3}ms a frame over {} frames)",
                cost.observer,
                ms(cost.total()),
                ms(cost.per_frame()),
                cost.frames_seen
            ));
        }
        if wall > Duration::ZERO {
            lines.push(format!(
                "   ⏱️  {:.2}ms wall clock, {:.0} frames/s",
                ms(wall),
                self.sim_steps as f64 / wall.as_secs_f64()
            ));
        }
        lines.join("\n")
    }

    pub fn print_profile(&self) {
        println!("{}", self.profile());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        ticks: u32,
        time: f64,
    }

    impl Steppable for Counter {
        fn step(&mut self, dt: f64) {
            self.ticks += 1;
            self.time += dt;
        }
    }

    struct CountingOp {
        seen: u32,
    }

    impl SimOp<Counter> for CountingOp {
        fn name(&self) -> &str {
            "Counting"
        }

        fn init_sim(&mut self, sim: &mut SimRunner<Counter>) {
            assert_eq!(sim.step, 0);
        }

        fn update_sim(&mut self, sim: &mut SimRunner<Counter>) {
            self.seen += 1;
            assert_eq!(sim.model.ticks, sim.step);
        }

        fn after_sim(&mut self, sim: &mut SimRunner<Counter>) {
            assert_eq!(self.seen, sim.sim_steps);
        }
    }

    #[test]
    fn runs_ops_after_each_step() {
        let mut runner = SimRunner::new(
            "counter",
            Counter { ticks: 0, time: 0.0 },
            0.25,
            8,
            vec![SimOpHandle::new(Box::new(CountingOp { seen: 0 }))],
        );
        runner.run();
        assert_eq!(runner.model.ticks, 8);
        assert_eq!(runner.model.time, 2.0);
        assert_eq!(runner.observer_costs[0].frames_seen, 8);
        assert_eq!(runner.observer_costs[0].observer, "Counting");
        assert_eq!(runner.progress_percent(), 100.0);
        let profile = runner.profile();
        assert!(profile.starts_with("🌍 counter: 8 frames"));
        assert!(profile.contains("Counting"));
        runner.print_profile();
    }

    #[test]
    fn no_frames_means_no_frame_cost() {
        let mut runner = SimRunner::new(
            "idle",
            Counter { ticks: 0, time: 0.0 },
            0.1,
            0,
            vec![SimOpHandle::new(Box::new(CountingOp { seen: 0 }))],
        );
        runner.run();
        assert_eq!(runner.model.ticks, 0);
        assert_eq!(runner.observer_costs[0].frames_seen, 0);
        assert_eq!(runner.observer_costs[0].per_frame(), Duration::ZERO);
    }
}
