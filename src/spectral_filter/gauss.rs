use super::SpectralFilter;
use crate::math::sinc;
use std::f64::consts::{LN_2, PI};

/// Monochromatic filter with a Gaussian envelope
///
/// `S(x) = sin²(πx) exp(-(π Λ x)²/(8 ln 2))` where `Λ` is the relative full
/// width at half maximum of a Gaussian passband (Tokovinin 2003).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gauss {
    fwhm: f64,
}
impl Gauss {
    pub fn new(fwhm: f64) -> Self {
        Self { fwhm }
    }
    pub fn fwhm(&self) -> f64 {
        self.fwhm
    }
    fn envelope(&self, x: f64) -> f64 {
        (-(self.fwhm * PI * x).powi(2) / (8f64 * LN_2)).exp()
    }
}
impl SpectralFilter for Gauss {
    fn eval(&self, x: f64) -> f64 {
        let e = self.envelope(x);
        if e == 0f64 {
            return 0f64;
        }
        e * (PI * x).sin().powi(2)
    }
    fn regular(&self, x: f64) -> f64 {
        (PI * sinc(PI * x)).powi(2) * self.envelope(x)
    }
}
