//! Aperture filters
//!
//! An aperture filter is the squared modulus of the Fourier transform of the
//! pupil, as a function of the spatial frequency in units of the aperture
//! scale. Radial filters are also 2D filters of `hypot(ux, uy)`.

mod angle_averaged;
mod circular;
mod gaussian;
mod point;
mod square;
pub use angle_averaged::AngleAveraged;
pub use circular::{Annular, Circular, CrossAnnular};
pub use gaussian::Gaussian;
pub use point::Point;
pub use square::Square;

use crate::cubic_spline::SplineError;

#[derive(thiserror::Error, Debug)]
pub enum ApertureFilterError {
    #[error("Failed to interpolate the angle averaged aperture filter")]
    Spline(#[from] SplineError),
}

/// Axisymmetric aperture filter
pub trait ApertureFilter {
    fn eval(&self, u: f64) -> f64;
    fn eval_slice(&self, u: &[f64]) -> Vec<f64> {
        u.iter().map(|&u| self.eval(u)).collect()
    }
}

/// 2D aperture filter
pub trait ApertureFilter2d {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64;
}

impl<T: ApertureFilter> ApertureFilter2d for T {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        self.eval(ux.hypot(uy))
    }
}

/// Product of two 2D filters, e.g. a pupil filter and a digital filter
#[derive(Debug, Clone)]
pub struct Product<A, B> {
    left: A,
    right: B,
}
impl<A, B> Product<A, B> {
    pub fn new(left: A, right: B) -> Self {
        Self { left, right }
    }
}
impl<A: ApertureFilter2d, B: ApertureFilter2d> ApertureFilter2d for Product<A, B> {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        let left = self.left.eval_xy(ux, uy);
        if left == 0f64 {
            return 0f64;
        }
        left * self.right.eval_xy(ux, uy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn radial_as_2d() {
        let af = Circular;
        assert_relative_eq!(af.eval_xy(0.3, 0.4), af.eval(0.5), max_relative = 1e-14);
        assert_eq!(af.eval_slice(&[0.0, 0.5]), vec![1.0, af.eval(0.5)]);
    }

    #[test]
    fn product() {
        let af = Product::new(Square, Gaussian);
        assert_eq!(af.eval_xy(0.0, 0.0), 1.0);
        assert_relative_eq!(
            af.eval_xy(0.3, 0.2),
            Square.eval_xy(0.3, 0.2) * (-0.13f64).exp(),
            max_relative = 1e-14
        );
        assert_eq!(Product::new(Point, Point).eval_xy(0.3, 0.2), 1.0);
        assert_eq!(Product::new(Gaussian, Point).eval_xy(f64::INFINITY, 0.0), 0.0);
    }
}
