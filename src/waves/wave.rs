use crate::error::{check_unit_interval, GreenhouseError, Result};
use crate::photon::WavelengthClass;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

pub type WaveId = u64;

const UNIT_TOLERANCE: f64 = 1e-6;
const COMPLETE_LENGTH_M: f64 = 1e-6;

/// Clamp to [0, 1]; NaN becomes 0.
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Element of the atmosphere that dims a wave, by index into the owning
/// model's clouds or atmosphere layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttenuatorSource {
    Cloud(usize),
    Layer(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveAttenuator {
    /// Fraction of intensity removed past this point.
    pub attenuation: f64,
    /// Distance along the wave from its start point.
    pub distance_from_start: f64,
}

/// A straight run of electromagnetic wave between its start point and
/// `start + direction * length`.
///
/// A sourced wave keeps its start at the emitter and grows; a detached wave
/// slides forward and is consumed at its propagation limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    id: WaveId,
    wavelength: WavelengthClass,
    origin: DVec2,
    direction: DVec2,
    propagation_limit: f64,
    start_point: DVec2,
    length: f64,
    intensity_at_start: f64,
    phase_offset: f64,
    is_sourced: bool,
    attenuators: Vec<(AttenuatorSource, WaveAttenuator)>,
}

impl Wave {
    /// `propagation_limit` is the altitude at which the wave stops; it must lie
    /// ahead of `origin` along `direction`.
    pub fn new(
        id: WaveId,
        wavelength: WavelengthClass,
        origin: DVec2,
        direction: DVec2,
        propagation_limit: f64,
        intensity: f64,
    ) -> Result<Self> {
        Self::check_path(origin.y, direction, propagation_limit)?;
        check_unit_interval("wave intensity", intensity)?;
        Ok(Self::on_checked_path(id, wavelength, origin, direction, propagation_limit, intensity))
    }

    /// Checks that a wave leaving `origin_y` along `direction` reaches `propagation_limit`.
    pub fn check_path(origin_y: f64, direction: DVec2, propagation_limit: f64) -> Result<()> {
        if !direction.is_finite() || (direction.length() - 1.0).abs() > UNIT_TOLERANCE {
            return Err(GreenhouseError::InvalidWave(format!("direction {direction} is not a unit vector")));
        }
        if direction.y.abs() < UNIT_TOLERANCE {
            return Err(GreenhouseError::InvalidWave(format!(
                "direction {direction} never reaches an altitude limit"
            )));
        }
        let ahead = (propagation_limit - origin_y) * direction.y;
        if ahead.is_nan() || ahead <= 0.0 {
            return Err(GreenhouseError::InvalidWave(format!(
                "limit {propagation_limit} is not ahead of altitude {origin_y} along {direction}"
            )));
        }
        Ok(())
    }

    /// Builds a wave whose path already passed `check_path`; the intensity is clamped.
    pub(crate) fn on_checked_path(
        id: WaveId,
        wavelength: WavelengthClass,
        origin: DVec2,
        direction: DVec2,
        propagation_limit: f64,
        intensity: f64,
    ) -> Self {
        Self {
            id,
            wavelength,
            origin,
            direction,
            propagation_limit,
            start_point: origin,
            length: 0.0,
            intensity_at_start: clamp_unit(intensity),
            phase_offset: 0.0,
            is_sourced: true,
            attenuators: Vec::new(),
        }
    }

    pub fn id(&self) -> WaveId {
        self.id
    }

    pub fn wavelength(&self) -> WavelengthClass {
        self.wavelength
    }

    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    pub fn propagation_limit(&self) -> f64 {
        self.propagation_limit
    }

    pub fn start_point(&self) -> DVec2 {
        self.start_point
    }

    pub fn end_point(&self) -> DVec2 {
        self.start_point + self.direction * self.length
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn intensity_at_start(&self) -> f64 {
        self.intensity_at_start
    }

    pub fn phase_offset(&self) -> f64 {
        self.phase_offset
    }

    pub fn is_sourced(&self) -> bool {
        self.is_sourced
    }

    pub fn is_moving_up(&self) -> bool {
        self.direction.y > 0.0
    }

    pub fn attenuators(&self) -> &[(AttenuatorSource, WaveAttenuator)] {
        &self.attenuators
    }

    /// Distance from the start point to the propagation limit along the direction.
    pub fn max_length(&self) -> f64 {
        ((self.propagation_limit - self.start_point.y) / self.direction.y).max(0.0)
    }

    /// Fully propagated; the owner may drop it.
    pub fn is_complete(&self) -> bool {
        !self.is_sourced && self.length <= COMPLETE_LENGTH_M
    }

    /// Distance along the wave at which it reaches `altitude`, if it currently covers it.
    /// The start point itself does not count.
    pub fn distance_to_altitude(&self, altitude: f64) -> Option<f64> {
        let distance = (altitude - self.start_point.y) / self.direction.y;
        (distance > 0.0 && distance <= self.length).then_some(distance)
    }

    /// Horizontal position where the wave's line meets `altitude`.
    pub fn x_at_altitude(&self, altitude: f64) -> f64 {
        self.start_point.x + self.direction.x * (altitude - self.start_point.y) / self.direction.y
    }

    /// Intensity after every attenuator up to `distance` along the wave.
    pub fn intensity_at(&self, distance: f64) -> f64 {
        self.attenuators
            .iter()
            .filter(|(_, a)| a.distance_from_start <= distance)
            .fold(self.intensity_at_start, |intensity, (_, a)| intensity * (1.0 - a.attenuation))
    }

    /// Intensity arriving at `distance` from every attenuator except `exclude`,
    /// i.e. what reaches the element that owns `exclude`.
    pub fn intensity_reaching(&self, distance: f64, exclude: AttenuatorSource) -> f64 {
        self.attenuators
            .iter()
            .filter(|(s, a)| *s != exclude && a.distance_from_start <= distance)
            .fold(self.intensity_at_start, |intensity, (_, a)| intensity * (1.0 - a.attenuation))
    }

    pub fn set_intensity_at_start(&mut self, intensity: f64) -> Result<()> {
        check_unit_interval("wave intensity", intensity)?;
        self.drive_intensity_at_start(intensity);
        Ok(())
    }

    pub(crate) fn drive_intensity_at_start(&mut self, intensity: f64) {
        self.intensity_at_start = clamp_unit(intensity);
    }

    pub fn detach(&mut self) {
        self.is_sourced = false;
    }

    pub fn has_attenuator(&self, source: AttenuatorSource) -> bool {
        self.attenuators.iter().any(|(s, _)| *s == source)
    }

    /// Attach an attenuator, or update the attenuation of an existing one.
    pub fn set_attenuator(&mut self, source: AttenuatorSource, attenuation: f64, distance_from_start: f64) -> Result<()> {
        check_unit_interval("attenuation", attenuation)?;
        self.attenuate(source, attenuation, distance_from_start);
        Ok(())
    }

    pub(crate) fn attenuate(&mut self, source: AttenuatorSource, attenuation: f64, distance_from_start: f64) {
        let attenuation = clamp_unit(attenuation);
        match self.attenuators.iter_mut().find(|(s, _)| *s == source) {
            Some((_, existing)) => existing.attenuation = attenuation,
            None => self.attenuators.push((
                source,
                WaveAttenuator {
                    attenuation,
                    distance_from_start,
                },
            )),
        }
    }

    /// Drop an attenuator without folding it into the start intensity.
    pub fn remove_attenuator(&mut self, source: AttenuatorSource) {
        self.attenuators.retain(|(s, _)| *s != source);
    }

    pub fn step(&mut self, dt: f64, speed: f64, phase_rate: f64) {
        if dt <= 0.0 {
            return;
        }
        self.phase_offset = (self.phase_offset + phase_rate * dt) % TAU;
        let advance = speed * dt;

        if self.is_sourced {
            self.length = (self.length + advance).min(self.max_length());
            return;
        }

        let moved = advance.min(self.max_length());
        self.start_point += self.direction * moved;
        self.length = self.length.min(self.max_length());

        // Attenuators the start point has passed now apply to the whole wave.
        let mut intensity = self.intensity_at_start;
        self.attenuators.retain_mut(|(_, attenuator)| {
            attenuator.distance_from_start -= moved;
            if attenuator.distance_from_start <= 0.0 {
                intensity *= 1.0 - attenuator.attenuation;
                false
            } else {
                true
            }
        });
        self.intensity_at_start = intensity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use more_asserts::assert_le;

    fn down_wave() -> Wave {
        Wave::new(1, WavelengthClass::Visible, DVec2::new(0.0, 1_000.0), DVec2::NEG_Y, 0.0, 1.0).unwrap()
    }

    #[test]
    fn rejects_bad_construction() {
        let origin = DVec2::new(0.0, 100.0);
        assert!(Wave::new(1, WavelengthClass::Infrared, origin, DVec2::X, 500.0, 1.0).is_err());
        assert!(Wave::new(1, WavelengthClass::Infrared, origin, DVec2::new(0.0, 2.0), 500.0, 1.0).is_err());
        assert!(Wave::new(1, WavelengthClass::Infrared, origin, DVec2::Y, 50.0, 1.0).is_err());
        assert!(Wave::new(1, WavelengthClass::Infrared, origin, DVec2::Y, 500.0, 1.5).is_err());
        assert!(Wave::new(1, WavelengthClass::Infrared, origin, DVec2::Y, 500.0, 0.5).is_ok());
    }

    #[test]
    fn sourced_wave_grows_up_to_limit() {
        let mut wave = down_wave();
        wave.step(1.0, 300.0, 1.0);
        assert_abs_diff_eq!(wave.length(), 300.0);
        for _ in 0..10 {
            wave.step(1.0, 300.0, 1.0);
            assert_le!(wave.length(), wave.max_length());
        }
        assert_abs_diff_eq!(wave.end_point().y, 0.0);
        assert_eq!(wave.start_point().y, 1_000.0);
    }

    #[test]
    fn detached_wave_is_consumed_at_limit() {
        let mut wave = down_wave();
        wave.step(1.0, 400.0, 0.0);
        wave.detach();
        let mut steps = 0;
        while !wave.is_complete() {
            wave.step(1.0, 400.0, 0.0);
            assert!(wave.end_point().y >= -1e-9);
            assert_abs_diff_eq!(wave.length(), 400.0f64.min(wave.max_length()), epsilon = 1e-9);
            steps += 1;
            assert!(steps < 10);
        }
        assert_abs_diff_eq!(wave.start_point().y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn passed_attenuator_folds_into_intensity() {
        let mut wave = down_wave();
        wave.step(1.0, 500.0, 0.0);
        wave.set_attenuator(AttenuatorSource::Cloud(0), 0.4, 200.0).unwrap();
        assert_abs_diff_eq!(wave.intensity_at(100.0), 1.0);
        assert_abs_diff_eq!(wave.intensity_at(300.0), 0.6);
        assert!(wave.set_attenuator(AttenuatorSource::Cloud(0), 1.4, 200.0).is_err());
        assert_abs_diff_eq!(wave.intensity_reaching(200.0, AttenuatorSource::Cloud(0)), 1.0);

        wave.detach();
        wave.step(1.0, 150.0, 0.0);
        assert!(wave.has_attenuator(AttenuatorSource::Cloud(0)));
        wave.step(1.0, 150.0, 0.0);
        assert!(!wave.has_attenuator(AttenuatorSource::Cloud(0)));
        assert_abs_diff_eq!(wave.intensity_at_start(), 0.6);
    }

    #[test]
    fn removed_attenuator_is_not_folded() {
        let mut wave = down_wave();
        wave.step(1.0, 500.0, 0.0);
        wave.set_attenuator(AttenuatorSource::Layer(2), 0.5, 100.0).unwrap();
        wave.remove_attenuator(AttenuatorSource::Layer(2));
        wave.detach();
        wave.step(1.0, 200.0, 0.0);
        assert_eq!(wave.intensity_at_start(), 1.0);
    }

    #[test]
    fn phase_wraps() {
        let mut wave = down_wave();
        for _ in 0..100 {
            wave.step(0.1, 1.0, 3.0 * std::f64::consts::PI);
            assert!(wave.phase_offset() < TAU);
        }
    }
}
