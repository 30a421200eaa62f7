use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Band of the electromagnetic spectrum a photon or wave belongs to.
///
/// The greenhouse screens only produce `Visible` and `Infrared`; the
/// molecule screen also fires `Microwave` and `Ultraviolet` photons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavelengthClass {
    Microwave,
    Infrared,
    Visible,
    Ultraviolet,
}

impl WavelengthClass {
    pub const ALL: [WavelengthClass; 4] = [
        WavelengthClass::Microwave,
        WavelengthClass::Infrared,
        WavelengthClass::Visible,
        WavelengthClass::Ultraviolet,
    ];

    /// Representative wavelength in meters.
    pub fn wavelength_m(&self) -> f64 {
        match self {
            WavelengthClass::Microwave => 0.02,
            WavelengthClass::Infrared => 850.0e-9,
            WavelengthClass::Visible => 580.0e-9,
            WavelengthClass::Ultraviolet => 271.0e-9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WavelengthClass::Microwave => "microwave",
            WavelengthClass::Infrared => "infrared",
            WavelengthClass::Visible => "visible",
            WavelengthClass::Ultraviolet => "ultraviolet",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "microwave" => Some(WavelengthClass::Microwave),
            "infrared" => Some(WavelengthClass::Infrared),
            "visible" => Some(WavelengthClass::Visible),
            "ultraviolet" => Some(WavelengthClass::Ultraviolet),
            _ => None,
        }
    }
}

/// Display category for a light-source lookup. Narration lookups with names
/// this core does not know land on `Unknown` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightSourceCategory {
    Known(WavelengthClass),
    Unknown,
}

impl LightSourceCategory {
    pub fn lookup(name: &str) -> Self {
        match WavelengthClass::from_str(&name.to_ascii_lowercase()) {
            Some(wavelength) => LightSourceCategory::Known(wavelength),
            None => LightSourceCategory::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LightSourceCategory::Known(wavelength) => wavelength.as_str(),
            LightSourceCategory::Unknown => "unknown",
        }
    }
}

pub type PhotonId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photon {
    pub id: PhotonId,
    pub position: DVec2,
    pub velocity: DVec2,
    pub wavelength: WavelengthClass,
}

impl Photon {
    pub fn new(id: PhotonId, position: DVec2, velocity: DVec2, wavelength: WavelengthClass) -> Self {
        Self {
            id,
            position,
            velocity,
            wavelength,
        }
    }

    pub fn is_infrared(&self) -> bool {
        self.wavelength == WavelengthClass::Infrared
    }

    pub fn is_visible(&self) -> bool {
        self.wavelength == WavelengthClass::Visible
    }

    /// Move along the current velocity, returning the position before the move.
    pub fn step(&mut self, dt: f64) -> DVec2 {
        let previous = self.position;
        self.position += self.velocity * dt;
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_along_velocity() {
        let mut photon = Photon::new(1, DVec2::ZERO, DVec2::new(0.0, -10.0), WavelengthClass::Visible);
        let previous = photon.step(0.5);
        assert_eq!(previous, DVec2::ZERO);
        assert_eq!(photon.position, DVec2::new(0.0, -5.0));
    }

    #[test]
    fn unknown_light_source_falls_back() {
        assert_eq!(
            LightSourceCategory::lookup("Infrared"),
            LightSourceCategory::Known(WavelengthClass::Infrared)
        );
        assert_eq!(LightSourceCategory::lookup("x-ray"), LightSourceCategory::Unknown);
        assert_eq!(LightSourceCategory::lookup("gamma").label(), "unknown");
    }
}
