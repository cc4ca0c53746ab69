//! Spectral filters
//!
//! A spectral filter `S(x)` is a function of `x = u²/λ`, the squared spatial
//! frequency over the wavelength. `regular(x)` is `S(x)/x²` with the removable
//! singularity at the origin taken care of.

mod gauss;
mod mono;
mod poly;
pub use gauss::Gauss;
pub use mono::Mono;
pub use poly::{Poly, SpectralFilterError};

pub trait SpectralFilter {
    /// Evaluates `S(x)`
    fn eval(&self, x: f64) -> f64;
    /// Evaluates `S(x)/x²`
    fn regular(&self, x: f64) -> f64;
    fn eval_slice(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&x| self.eval(x)).collect()
    }
    fn regular_slice(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&x| self.regular(x)).collect()
    }
}

/// Spectral filter derived from a measured spectral response
pub trait Polychromatic: SpectralFilter {
    /// Wavelength of the monochromatic filter with the same integral behavior
    fn equivalent_wavelength(&self) -> f64;
    /// Rescales the filter to a unit equivalent wavelength
    fn normalize(&mut self) -> &mut Self;
}
