//! Scintillation weight functions
//!
//! The weight function `W(h)` gives the contribution of a thin turbulent layer
//! at altitude `h` to the scintillation index:
//! `s² = ∫ W(h) Cn²(h) dh`.
//! Units: altitudes in km, wavelengths in nm, aperture scales in mm.
//!
//! The dimensionless weight function is precomputed on a grid of `z = 1/(1+x)`
//! where `x` is the aperture scale over the Fresnel radius `sqrt(λh)`, the
//! weight function is then interpolated for any altitude.

mod dimensionless;
pub use dimensionless::{dimensionless, dimensionless_2d};

use crate::{
    aperture_filter::{ApertureFilter, ApertureFilter2d},
    cubic_spline::{Boundary, CubicSpline, SplineError},
    math::{linspace, KOLMOGOROV_CN2_SCALE},
    spectral_filter::SpectralFilter,
    uniform_grid::UniformGrid,
};
use rayon::prelude::*;
use std::{f64::consts::PI, time::Instant};

#[derive(thiserror::Error, Debug)]
pub enum WeightFunctionError {
    #[error("Failed to interpolate the dimensionless weight function")]
    Spline(#[from] SplineError),
}
type Result<T> = std::result::Result<T, WeightFunctionError>;

// 1e13 = (1e3)^(5/6) (1e9)^(7/6): km altitudes and nm wavelengths
const SCALE: f64 = KOLMOGOROV_CN2_SCALE * 16e13 * PI * PI;

/// Interpolated dimensionless weight function
#[derive(Debug, Clone)]
struct Interpolant {
    lambda: f64,
    aperture_scale: f64,
    grid: UniformGrid,
    spline: CubicSpline,
}
impl Interpolant {
    fn new<F>(lambda: f64, aperture_scale: f64, size: usize, dimensionless: F) -> Result<Self>
    where
        F: Fn(f64) -> f64 + Sync,
    {
        log::info!(
            "Computing weight function (λ={}nm, D={}mm) over {} nodes...",
            lambda,
            aperture_scale,
            size
        );
        let now = Instant::now();
        let values: Vec<f64> = linspace(0f64, 1f64, size)
            .into_par_iter()
            .map(|z| dimensionless(z))
            .collect();
        let this = Self {
            lambda,
            aperture_scale,
            grid: UniformGrid::new(0f64, 1f64 / (size as f64 - 1f64), size),
            spline: CubicSpline::new(values, Boundary::clamped())?,
        };
        log::info!("... computed in {:}ms", now.elapsed().as_millis());
        Ok(this)
    }
    fn eval(&self, altitude: f64) -> f64 {
        if altitude == 0f64 {
            return 0f64;
        }
        let fresnel_radius = (self.lambda * altitude).sqrt();
        let z = (1f64 / (1f64 + self.aperture_scale / fresnel_radius) - self.grid.origin())
            / self.grid.delta();
        SCALE * altitude.powf(5f64 / 6f64) / self.lambda.powf(7f64 / 6f64) * self.spline.eval(z)
    }
}

/// Weight function of an axisymmetric aperture
#[derive(Debug, Clone)]
pub struct WeightFunction {
    interpolant: Interpolant,
}
impl WeightFunction {
    /// Precomputes the weight function on `size` nodes
    ///
    /// `lambda` is the equivalent wavelength of the spectral filter [nm] and
    /// `aperture_scale` the aperture diameter [mm].
    pub fn new<S, A>(
        spectral_filter: &S,
        lambda: f64,
        aperture_filter: &A,
        aperture_scale: f64,
        size: usize,
    ) -> Result<Self>
    where
        S: SpectralFilter + Sync + ?Sized,
        A: ApertureFilter + Sync + ?Sized,
    {
        Ok(Self {
            interpolant: Interpolant::new(lambda, aperture_scale, size, |z| {
                dimensionless(spectral_filter, aperture_filter, z)
            })?,
        })
    }
    pub fn lambda(&self) -> f64 {
        self.interpolant.lambda
    }
    pub fn aperture_scale(&self) -> f64 {
        self.interpolant.aperture_scale
    }
    pub fn grid(&self) -> &UniformGrid {
        &self.interpolant.grid
    }
    /// Weight of a layer at `altitude` [km]
    pub fn eval(&self, altitude: f64) -> f64 {
        2f64 * PI * self.interpolant.eval(altitude)
    }
    pub fn eval_slice(&self, altitude: &[f64]) -> Vec<f64> {
        altitude.iter().map(|&h| self.eval(h)).collect()
    }
}

/// Weight function of a 2D aperture
#[derive(Debug, Clone)]
pub struct WeightFunction2d {
    interpolant: Interpolant,
}
impl WeightFunction2d {
    /// Precomputes the weight function on `size` nodes
    pub fn new<S, A>(
        spectral_filter: &S,
        lambda: f64,
        aperture_filter: &A,
        aperture_scale: f64,
        size: usize,
    ) -> Result<Self>
    where
        S: SpectralFilter + Sync + ?Sized,
        A: ApertureFilter2d + Sync + ?Sized,
    {
        Ok(Self {
            interpolant: Interpolant::new(lambda, aperture_scale, size, |z| {
                dimensionless_2d(spectral_filter, aperture_filter, z)
            })?,
        })
    }
    pub fn lambda(&self) -> f64 {
        self.interpolant.lambda
    }
    pub fn aperture_scale(&self) -> f64 {
        self.interpolant.aperture_scale
    }
    pub fn grid(&self) -> &UniformGrid {
        &self.interpolant.grid
    }
    pub fn eval(&self, altitude: f64) -> f64 {
        self.interpolant.eval(altitude)
    }
    pub fn eval_slice(&self, altitude: &[f64]) -> Vec<f64> {
        altitude.iter().map(|&h| self.eval(h)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        aperture_filter::{Annular, Circular, Point},
        spectral_filter::Mono,
    };
    use approx::assert_relative_eq;

    #[test]
    fn point() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let wf = WeightFunction::new(&Mono, 550.0, &Point, 10.0, 65)?;
        assert_eq!(wf.grid().size(), 65);
        for (altitude, weight) in [
            (0.5, 68_541_193_203.07),
            (1.0, 122_126_522_328.86),
            (2.0, 217_604_724_387.43),
            (32.0, 2_193_318_182_498.39),
        ] {
            assert_relative_eq!(wf.eval(altitude), weight, max_relative = 3e-4);
        }
        Ok(())
    }

    #[test]
    fn circular() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let wf = WeightFunction::new(&Mono, 550.0, &Circular, 10.0, 1024)?;
        assert_relative_eq!(wf.eval(1.0), 96_324_603_994.2, max_relative = 1e-6);
        assert_eq!(wf.lambda(), 550.0);
        assert_eq!(wf.aperture_scale(), 10.0);
        Ok(())
    }

    #[test]
    fn unobscured_annular() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let wf = WeightFunction::new(&Mono, 550.0, &Annular::new(0.0), 10.0, 65)?;
        let circular = WeightFunction::new(&Mono, 550.0, &Circular, 10.0, 65)?;
        for altitude in [0.5, 1.0, 8.0, 30.0] {
            let weight = wf.eval(altitude);
            assert!(weight.is_finite() && weight > 0.0);
            assert_relative_eq!(weight, circular.eval(altitude), max_relative = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn altitude_limits() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let wf = WeightFunction::new(&Mono, 500.0, &Circular, 20.0, 33)?;
        assert_eq!(wf.eval(0.0), 0.0);
        assert_eq!(wf.eval(f64::INFINITY), f64::INFINITY);
        let weights = wf.eval_slice(&[0.0, 1.0, 10.0]);
        assert_eq!(weights[0], 0.0);
        assert!(weights[1] > 0.0 && weights[1] < weights[2]);
        Ok(())
    }

    #[test]
    fn axisymmetric_2d() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let wf = WeightFunction::new(&Mono, 550.0, &Point, 10.0, 9)?;
        let wf_2d = WeightFunction2d::new(&Mono, 550.0, &Point, 10.0, 9)?;
        for altitude in [0.5, 1.0, 4.0] {
            assert_relative_eq!(wf_2d.eval(altitude) * 2.0 * PI, wf.eval(altitude), max_relative = 1e-8);
        }
        assert_eq!(wf_2d.eval(0.0), 0.0);
        Ok(())
    }

    #[test]
    fn too_few_nodes() {
        assert!(matches!(
            WeightFunction::new(&Mono, 550.0, &Point, 10.0, 1),
            Err(WeightFunctionError::Spline(SplineError::TooFewNodes(1)))
        ));
    }
}
