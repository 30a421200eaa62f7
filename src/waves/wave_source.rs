use crate::error::{check_unit_interval, Result};
use crate::waves::wave::clamp_unit;
use crate::photon::WavelengthClass;
use crate::waves::wave::{Wave, WaveId};
use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One emitter position pair. Consecutive waves alternate between the two
/// x locations so a newly sourced wave never overlaps its detached predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SourceSlot {
    x_pair: (f64, f64),
    use_second: bool,
    live_wave: Option<WaveId>,
    live_age_s: f64,
    live_lifetime_s: f64,
    // Time left before the next wave may start; `None` means immediately.
    restart_countdown_s: Option<f64>,
}

impl SourceSlot {
    fn new(x_pair: (f64, f64)) -> Self {
        Self {
            x_pair,
            use_second: false,
            live_wave: None,
            live_age_s: 0.0,
            live_lifetime_s: 0.0,
            restart_countdown_s: None,
        }
    }

    fn current_x(&self) -> f64 {
        if self.use_second { self.x_pair.1 } else { self.x_pair.0 }
    }
}

/// Emits sourced waves of one wavelength from a fixed altitude toward a
/// propagation limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EMWaveSource {
    wavelength: WavelengthClass,
    origin_y: f64,
    direction: DVec2,
    propagation_limit: f64,
    lifetime_range_s: (f64, f64),
    time_between_waves_s: f64,
    intensity: f64,
    producing: bool,
    slots: Vec<SourceSlot>,
}

impl EMWaveSource {
    /// Fails when waves leaving `origin_y` along `direction` would never reach
    /// `propagation_limit`, so stepping the source can always start new waves.
    pub fn new(
        wavelength: WavelengthClass,
        origin_y: f64,
        direction: DVec2,
        propagation_limit: f64,
        x_pairs: &[(f64, f64)],
        lifetime_range_s: (f64, f64),
        time_between_waves_s: f64,
    ) -> Result<Self> {
        Wave::check_path(origin_y, direction, propagation_limit)?;
        Ok(Self {
            wavelength,
            origin_y,
            direction,
            propagation_limit,
            lifetime_range_s,
            time_between_waves_s,
            intensity: 1.0,
            producing: false,
            slots: x_pairs.iter().copied().map(SourceSlot::new).collect(),
        })
    }

    pub fn wavelength(&self) -> WavelengthClass {
        self.wavelength
    }

    pub fn is_producing(&self) -> bool {
        self.producing
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn set_producing(&mut self, producing: bool) {
        self.producing = producing;
    }

    /// Intensity of new waves; applied to the live sourced waves on the next step.
    pub fn set_intensity(&mut self, intensity: f64) -> Result<()> {
        check_unit_interval("wave source intensity", intensity)?;
        self.drive_intensity(intensity);
        Ok(())
    }

    /// Intensity driven by the model each step; clamped instead of rejected.
    pub(crate) fn drive_intensity(&mut self, intensity: f64) {
        self.intensity = clamp_unit(intensity);
    }

    pub fn live_waves(&self) -> impl Iterator<Item = WaveId> + '_ {
        self.slots.iter().filter_map(|s| s.live_wave)
    }

    pub fn step<R: Rng + ?Sized>(&mut self, dt: f64, waves: &mut Vec<Wave>, next_id: &mut WaveId, rng: &mut R) {
        for slot in self.slots.iter_mut() {
            if let Some(id) = slot.live_wave {
                let Some(wave) = waves.iter_mut().find(|w| w.id() == id) else {
                    slot.live_wave = None;
                    continue;
                };
                slot.live_age_s += dt;
                if !self.producing || slot.live_age_s >= slot.live_lifetime_s {
                    wave.detach();
                    log::debug!("{} wave {} detached after {:.2}s", self.wavelength.as_str(), id, slot.live_age_s);
                    slot.live_wave = None;
                    slot.use_second = !slot.use_second;
                    slot.restart_countdown_s = Some(self.time_between_waves_s);
                } else {
                    wave.drive_intensity_at_start(self.intensity);
                }
                continue;
            }

            if let Some(countdown) = slot.restart_countdown_s.as_mut() {
                *countdown -= dt;
                if *countdown > 0.0 {
                    continue;
                }
            }
            if !self.producing {
                continue;
            }

            let id = *next_id;
            *next_id += 1;
            waves.push(Wave::on_checked_path(
                id,
                self.wavelength,
                DVec2::new(slot.current_x(), self.origin_y),
                self.direction,
                self.propagation_limit,
                self.intensity,
            ));
            let (min, max) = self.lifetime_range_s;
            slot.live_lifetime_s = if max > min { rng.random_range(min..max) } else { min };
            slot.live_age_s = 0.0;
            slot.live_wave = Some(id);
            slot.restart_countdown_s = None;
        }
    }

    pub fn reset(&mut self) {
        self.intensity = 1.0;
        self.producing = false;
        for slot in self.slots.iter_mut() {
            *slot = SourceSlot::new(slot.x_pair);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sun_source() -> EMWaveSource {
        EMWaveSource::new(
            WavelengthClass::Visible,
            50_000.0,
            DVec2::NEG_Y,
            0.0,
            &[(-10_000.0, -6_000.0), (6_000.0, 10_000.0)],
            (2.0, 3.0),
            0.5,
        )
        .unwrap()
    }

    #[test]
    fn one_sourced_wave_per_slot() {
        let mut source = sun_source();
        source.set_producing(true);
        let mut waves = Vec::new();
        let mut next_id = 0;
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            source.step(0.1, &mut waves, &mut next_id, &mut rng);
        }
        assert_eq!(waves.len(), 2);
        assert_eq!(source.live_waves().count(), 2);
        assert!(waves.iter().all(Wave::is_sourced));
    }

    #[test]
    fn lifetime_expiry_detaches_and_alternates_position() {
        let mut source = sun_source();
        source.set_producing(true);
        let mut waves = Vec::new();
        let mut next_id = 0;
        let mut rng = StdRng::seed_from_u64(2);
        // lifetime < 3 s, then 0.5 s gap
        for _ in 0..40 {
            source.step(0.1, &mut waves, &mut next_id, &mut rng);
        }
        assert_eq!(waves.len(), 4);
        assert_eq!(waves.iter().filter(|w| !w.is_sourced()).count(), 2);
        assert_eq!(waves[0].origin().x, -10_000.0);
        let replacement = waves.iter().find(|w| w.is_sourced() && w.origin().x < 0.0).unwrap();
        assert_eq!(replacement.origin().x, -6_000.0);
    }

    #[test]
    fn turning_off_detaches_live_waves() {
        let mut source = sun_source();
        source.set_producing(true);
        let mut waves = Vec::new();
        let mut next_id = 0;
        let mut rng = StdRng::seed_from_u64(3);
        source.step(0.1, &mut waves, &mut next_id, &mut rng);
        source.set_producing(false);
        for _ in 0..20 {
            source.step(0.1, &mut waves, &mut next_id, &mut rng);
        }
        assert_eq!(waves.len(), 2);
        assert!(waves.iter().all(|w| !w.is_sourced()));
        assert!(source.set_intensity(1.1).is_err());
    }

    #[test]
    fn rejects_a_path_that_never_reaches_its_limit() {
        let pairs = [(-1_000.0, 1_000.0)];
        let upward_to_ground = EMWaveSource::new(WavelengthClass::Infrared, 0.0, DVec2::Y, 0.0, &pairs, (1.0, 2.0), 0.5);
        assert!(upward_to_ground.is_err());
        let sideways = EMWaveSource::new(WavelengthClass::Visible, 100.0, DVec2::X, 0.0, &pairs, (1.0, 2.0), 0.5);
        assert!(sideways.is_err());
    }

    #[test]
    fn driven_intensity_is_clamped_into_live_waves() {
        let mut source = sun_source();
        source.set_producing(true);
        let mut waves = Vec::new();
        let mut next_id = 0;
        let mut rng = StdRng::seed_from_u64(4);
        source.drive_intensity(1.7);
        source.step(0.1, &mut waves, &mut next_id, &mut rng);
        assert_eq!(source.intensity(), 1.0);
        source.drive_intensity(f64::NAN);
        source.step(0.1, &mut waves, &mut next_id, &mut rng);
        assert_eq!(source.intensity(), 0.0);
        assert!(waves.iter().all(|w| w.intensity_at_start() == 0.0));
    }
}
