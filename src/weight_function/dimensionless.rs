//! Dimensionless scintillation weight functions
//!
//! `W(x) = ∫ u^(-8/3) S(u²) A(xu) du` over `(0, ∞)`, where `x` is the ratio of
//! the aperture scale to the Fresnel radius. The argument `z = 1/(1+x)` maps
//! `x` onto `[0, 1]`.

use crate::{
    aperture_filter::{ApertureFilter, ApertureFilter2d},
    quadrature::{default_tolerance, ExpSinh, TanhSinh},
    spectral_filter::SpectralFilter,
};
use std::f64::consts::PI;

// u^(-8/3) S(u²) with S/x² substituted below 1
fn spectral_factor<S>(spectral_filter: &S, u: f64) -> Option<f64>
where
    S: SpectralFilter + ?Sized,
{
    if u == 0f64 || u.is_infinite() {
        return None;
    }
    if u < 1f64 {
        return Some(u.powf(4f64 / 3f64) * spectral_filter.regular(u * u));
    }
    let t = u.powf(-8f64 / 3f64);
    if t == 0f64 {
        None
    } else {
        Some(t * spectral_filter.eval(u * u))
    }
}

/// Dimensionless weight function of an axisymmetric aperture at `z`
pub fn dimensionless<S, A>(spectral_filter: &S, aperture_filter: &A, z: f64) -> f64
where
    S: SpectralFilter + ?Sized,
    A: ApertureFilter + ?Sized,
{
    let x = (1f64 - z) / z;
    ExpSinh::default().integrate(
        |u| {
            let Some(spectrum) = spectral_factor(spectral_filter, u) else {
                return 0f64;
            };
            let a = aperture_filter.eval(x * u);
            if a == 0f64 {
                0f64
            } else {
                spectrum * a
            }
        },
        default_tolerance(),
    )
}

// ∫ A(xu cos πφ, xu sin πφ) dφ over [-1, 1]
fn axial<A>(aperture_filter: &A, xu: f64) -> f64
where
    A: ApertureFilter2d + ?Sized,
{
    if xu.is_infinite() {
        return 2f64 * aperture_filter.eval_xy(xu, 0f64);
    }
    TanhSinh::default().integrate(
        |phi, complement| {
            let (s, c) = if phi.abs() < 0.5 {
                (PI * phi).sin_cos()
            } else {
                // accurate near φ = ±1: cos πφ = -cos πc, sin πφ = sin πc
                let (s, c) = (PI * complement).sin_cos();
                (s, -c)
            };
            aperture_filter.eval_xy(xu * c, xu * s)
        },
        default_tolerance(),
    )
}

/// Dimensionless weight function of a 2D aperture at `z`
///
/// The aperture filter is integrated over the azimuth for each radial frequency.
pub fn dimensionless_2d<S, A>(spectral_filter: &S, aperture_filter: &A, z: f64) -> f64
where
    S: SpectralFilter + ?Sized,
    A: ApertureFilter2d + ?Sized,
{
    let x = (1f64 - z) / z;
    0.5 * ExpSinh::default().integrate(
        |u| {
            let Some(spectrum) = spectral_factor(spectral_filter, u) else {
                return 0f64;
            };
            let a = axial(aperture_filter, x * u);
            if a == 0f64 {
                0f64
            } else {
                spectrum * a
            }
        },
        default_tolerance(),
    )
}
