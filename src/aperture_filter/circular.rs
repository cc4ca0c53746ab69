use super::ApertureFilter;
use crate::math::jinc;
use std::f64::consts::PI;

/// Circular aperture, `jinc(πu)²`
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Circular;

impl ApertureFilter for Circular {
    fn eval(&self, u: f64) -> f64 {
        jinc(PI * u).powi(2)
    }
}

/// Circular aperture with a central obscuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annular {
    obscuration: f64,
}
impl Annular {
    /// `obscuration` is the ratio of the inner to the outer diameter
    pub fn new(obscuration: f64) -> Self {
        Self { obscuration }
    }
    pub fn obscuration(&self) -> f64 {
        self.obscuration
    }
    // normalized pupil amplitude, null at infinity
    fn amplitude(&self, u: f64) -> f64 {
        if u.is_infinite() {
            return 0f64;
        }
        let piu = PI * u;
        if self.obscuration == 0f64 {
            return jinc(piu);
        }
        let eps2 = self.obscuration * self.obscuration;
        (jinc(piu) - eps2 * jinc(self.obscuration * piu)) / (1f64 - eps2)
    }
}
impl ApertureFilter for Annular {
    fn eval(&self, u: f64) -> f64 {
        self.amplitude(u).powi(2)
    }
}

/// Cross filter of two concentric annular apertures
///
/// Used for the differential and cross scintillation indices of
/// multi-aperture detectors. The spatial frequency is in units of the first
/// aperture outer diameter, `ratio` is the outer diameters ratio of the second
/// to the first aperture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossAnnular {
    ratio: f64,
    first: Annular,
    second: Annular,
}
impl CrossAnnular {
    pub fn new(ratio: f64, first_obscuration: f64, second_obscuration: f64) -> Self {
        Self {
            ratio,
            first: Annular::new(first_obscuration),
            second: Annular::new(second_obscuration),
        }
    }
    pub fn ratio(&self) -> f64 {
        self.ratio
    }
}
impl ApertureFilter for CrossAnnular {
    fn eval(&self, u: f64) -> f64 {
        let first = self.first.amplitude(u);
        if first == 0f64 {
            return 0f64;
        }
        first * self.second.amplitude(self.ratio * u)
    }
}
